//! Pure geometry helpers extracted for testability.
//!
//! All functions in this module are free of Bevy ECS dependencies and operate
//! on plain numeric / `Vec2` inputs. Coordinates in "image space" have their
//! origin at the top-left corner of the rendered image with y pointing down,
//! matching the layout produced by [`crate::board::generate_hex_grid`].

use bevy::prelude::Vec2;

/// `√3`, the width of a pointy-top hexagon with unit circumradius.
pub const SQRT_3: f32 = 1.732_050_8;

/// Corner angles (degrees) of a pointy-top hexagon, starting at the lower-right
/// corner in y-down space and walking clockwise on screen.
pub const HEX_CORNER_ANGLES: [f32; 6] = [30.0, 90.0, 150.0, 210.0, 270.0, 330.0];

/// Derived measurements of a pointy-top hexagon with a given circumradius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HexMetrics {
    /// Center-to-vertex distance.
    pub size: f32,
    /// Flat-to-flat width (`√3 · size`).
    pub width: f32,
    /// Vertex-to-vertex height (`2 · size`).
    pub height: f32,
    /// Distance between the centers of two consecutive rows (`0.75 · height`).
    pub row_spacing: f32,
}

impl HexMetrics {
    /// Metrics for a hexagon of circumradius `size`.
    pub fn new(size: f32) -> Self {
        let height = 2.0 * size;
        Self {
            size,
            width: SQRT_3 * size,
            height,
            row_spacing: height * 0.75,
        }
    }

    /// Columns needed to span `width`, plus one for edge coverage.
    pub fn columns_for(&self, width: f32) -> u32 {
        padded_count(width / self.width)
    }

    /// Rows needed to span `height`, plus one for edge coverage.
    pub fn rows_for(&self, height: f32) -> u32 {
        padded_count(height / self.row_spacing)
    }
}

/// `true` for finite values strictly greater than zero.
pub fn is_positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

fn padded_count(span: f32) -> u32 {
    if span.is_finite() {
        (span.ceil() + 1.0).max(0.0) as u32
    } else {
        0
    }
}

/// The six corners of a pointy-top hexagon centred on the origin.
///
/// Corner `i` sits at angle [`HEX_CORNER_ANGLES`]`[i]` at distance `size`.
pub fn hex_corners(size: f32) -> [Vec2; 6] {
    HEX_CORNER_ANGLES.map(|deg| {
        let rad = deg.to_radians();
        Vec2::new(size * rad.cos(), size * rad.sin())
    })
}

/// Outline of a pointy-top hexagon as path commands:
/// `M x0,y0 L x1,y1 L ... L x5,y5 Z`.
pub fn hex_path(size: f32) -> String {
    let points: Vec<String> = hex_corners(size)
        .iter()
        .map(|p| format!("{},{}", p.x, p.y))
        .collect();
    format!("M {} L {} Z", points[0], points[1..].join(" L "))
}

/// Largest size with the aspect ratio of `natural` that fits inside `container`.
///
/// Mirrors CSS `object-fit: contain`. Returns `Vec2::ZERO` if either input has
/// a non-positive side.
pub fn fit_contain(natural: Vec2, container: Vec2) -> Vec2 {
    if natural.min_element() <= 0.0 || container.min_element() <= 0.0 {
        return Vec2::ZERO;
    }
    let image_aspect = natural.x / natural.y;
    let container_aspect = container.x / container.y;
    if image_aspect > container_aspect {
        Vec2::new(container.x, container.x / image_aspect)
    } else {
        Vec2::new(container.y * image_aspect, container.y)
    }
}

/// Converts an image-space point to world space for an image of `image_size`
/// centred on the world origin (y up).
pub fn image_to_world(point: Vec2, image_size: Vec2) -> Vec2 {
    Vec2::new(point.x - image_size.x / 2.0, image_size.y / 2.0 - point.y)
}

/// Inverse of [`image_to_world`].
pub fn world_to_image(point: Vec2, image_size: Vec2) -> Vec2 {
    Vec2::new(point.x + image_size.x / 2.0, image_size.y / 2.0 - point.y)
}

/// Cubic ease-out curve: fast start, gentle deceleration.
///
/// `t` should be in `[0, 1]`. Returns `1 - (1 - t)^3`.
pub fn ease_out_cubic(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(3)
}

/// Opacity of a tile cover `elapsed` seconds into a fade lasting `duration`.
///
/// Starts at `1.0`, reaches `0.0` at `duration` and stays there. A zero
/// duration hides the cover immediately.
pub fn fade_alpha(elapsed: f32, duration: f32) -> f32 {
    if duration <= 0.0 {
        return 0.0;
    }
    let t = (elapsed / duration).clamp(0.0, 1.0);
    1.0 - ease_out_cubic(t)
}
