//! Offset grid of pointy-top hexagons covering a rectangle.

use std::fmt;

use bevy::prelude::*;

use super::LayoutError;
use crate::math::{self, HexMetrics};

/// Row/column position of a tile in the offset grid.
///
/// Displays as `hex-{row}-{col}`; unique within one grid and stable across
/// regenerations with the same inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Reflect)]
pub struct TileId {
    /// Zero-based row, top to bottom.
    pub row: u32,
    /// Zero-based column, left to right.
    pub col: u32,
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hex-{}-{}", self.row, self.col)
    }
}

/// Upper bound on candidate positions in one grid.
pub const MAX_GRID_TILES: u64 = 1 << 20;

/// A tile's identity and its center in image space.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct TileLayout {
    /// Grid position.
    pub id: TileId,
    /// Hexagon center, origin at the image's top-left corner, y down.
    pub center: Vec2,
}

/// Lays out pointy-top hexagons of circumradius `hex_size` over a
/// `width × height` area.
///
/// Odd rows are shifted right by half a hex width. One extra row and column
/// cover the right and bottom edges; a candidate is kept when its bounding
/// square `[x ± size] × [y ± size]` touches the area, so every hexagon that
/// overlaps the image is present (plus a few corner ones that only touch the
/// square). Tiles come back row-major, top to bottom, left to right.
///
/// Grids with more than [`MAX_GRID_TILES`] candidates are rejected.
pub fn generate_hex_grid(
    width: f32,
    height: f32,
    hex_size: f32,
) -> Result<Vec<TileLayout>, LayoutError> {
    if !math::is_positive(hex_size) {
        return Err(LayoutError::InvalidHexSize(hex_size));
    }
    if !math::is_positive(width) || !math::is_positive(height) {
        return Ok(Vec::new());
    }

    let m = HexMetrics::new(hex_size);
    let cols = m.columns_for(width);
    let rows = m.rows_for(height);

    let candidates = u64::from(rows) * u64::from(cols);
    if candidates > MAX_GRID_TILES {
        return Err(LayoutError::TooManyTiles { rows, cols });
    }

    let mut tiles = Vec::with_capacity(candidates as usize);
    for row in 0..rows {
        let x_offset = if row % 2 == 1 { m.width / 2.0 } else { 0.0 };
        let y = row as f32 * m.row_spacing;
        for col in 0..cols {
            let x = col as f32 * m.width + x_offset;
            if overlaps_area(x, y, hex_size, width, height) {
                tiles.push(TileLayout {
                    id: TileId { row, col },
                    center: Vec2::new(x, y),
                });
            }
        }
    }

    debug!(
        "generated {} hex tiles for {width:.0}x{height:.0} at size {hex_size:.1}",
        tiles.len()
    );
    Ok(tiles)
}

fn overlaps_area(x: f32, y: f32, size: f32, width: f32, height: f32) -> bool {
    let (left, right) = (x - size, x + size);
    let (top, bottom) = (y - size, y + size);
    right >= 0.0 && left <= width && bottom >= 0.0 && top <= height
}
