//! Hexagon size solver: picks a circumradius for a target tile count.

use bevy::log::debug;

use crate::math::{self, HexMetrics};

/// Smallest hexagon circumradius the solver will return.
pub const MIN_HEX_SIZE: f32 = 20.0;
/// Hard cap on the hexagon circumradius, regardless of image size.
pub const MAX_HEX_SIZE: f32 = 500.0;
/// Fixed budget of bisection steps.
pub const SEARCH_ITERATIONS: u32 = 40;

/// Number of tiles a grid of `hex_size` hexagons would have over
/// `width × height`, before edge pruning.
///
/// Over-counts slightly compared to [`super::generate_hex_grid`], which keeps
/// the estimate cheap and monotonic in `hex_size`. Saturates at `u32::MAX`.
pub fn estimate_tile_count(width: f32, height: f32, hex_size: f32) -> u32 {
    let m = HexMetrics::new(hex_size);
    m.columns_for(width).saturating_mul(m.rows_for(height))
}

/// Searches for the hexagon size whose estimated tile count is closest to
/// `target`.
///
/// The search runs over `[MIN_HEX_SIZE, min(max(width, height) / 2, MAX_HEX_SIZE)]`
/// and returns the best midpoint seen, not the last one: the estimate only
/// moves in steps, so bisection can overshoot the optimum on its final steps.
/// Non-positive dimensions yield [`MIN_HEX_SIZE`].
pub fn optimal_hex_size(width: f32, height: f32, target: u32) -> f32 {
    if !math::is_positive(width) || !math::is_positive(height) {
        return MIN_HEX_SIZE;
    }

    let mut lo = MIN_HEX_SIZE;
    let mut hi = (width.max(height) / 2.0).min(MAX_HEX_SIZE).max(MIN_HEX_SIZE);
    let mut best_size = (lo + hi) / 2.0;
    let mut best_diff = u32::MAX;

    for i in 0..SEARCH_ITERATIONS {
        let mid = (lo + hi) / 2.0;
        let count = estimate_tile_count(width, height, mid);
        let diff = count.abs_diff(target);

        if diff < best_diff {
            best_diff = diff;
            best_size = mid;
        }

        if count > target {
            // Too many tiles: hexes are too small.
            lo = mid;
        } else {
            hi = mid;
        }

        if diff <= 1 {
            debug!("hex size search converged after {} iterations", i + 1);
            break;
        }
    }

    debug!(
        "selected hex size {best_size:.1}px for {width:.0}x{height:.0} ({} tiles, target {target})",
        estimate_tile_count(width, height, best_size)
    );
    best_size
}
