//! Hex board: size solver, grid layout, reveal rules and the cover meshes that
//! hide the image.
//!
//! The layout and reveal logic in [`hex_size`], [`hex_layout`] and [`reveal`]
//! is pure and ECS-free; the systems in this module only mirror a
//! [`RevealRound`] onto the screen.

mod entities;
pub mod hex_layout;
pub mod hex_size;
pub mod reveal;
mod systems;

pub use entities::{BoardRoot, CoverFade, HexCover};
pub use hex_layout::{MAX_GRID_TILES, TileId, TileLayout, generate_hex_grid};
pub use hex_size::{estimate_tile_count, optimal_hex_size};
pub use reveal::{
    HexTile, RevealRound, RoundPhase, random_reveal_sequence, reveal_sequence,
};

use bevy::prelude::*;
use thiserror::Error;

use crate::{AppSet, GamePhase};

/// Invalid arguments passed to the layout functions.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum LayoutError {
    /// The hexagon circumradius must be finite and strictly positive.
    #[error("hex size must be a positive number, got {0}")]
    InvalidHexSize(f32),
    /// The grid would exceed [`hex_layout::MAX_GRID_TILES`].
    #[error("a {rows}x{cols} hex grid exceeds the tile limit")]
    TooManyTiles {
        /// Rows the grid would need.
        rows: u32,
        /// Columns the grid would need.
        cols: u32,
    },
}

/// Look and feel of the tile covers.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct BoardConfig {
    /// Fill color of a covered tile.
    pub cover_color: Color,
    /// Fill color of a covered tile under the pointer.
    pub hover_color: Color,
    /// Outline color drawn around each tile.
    pub outline_color: Color,
    /// Outline thickness in pixels.
    pub outline_width: f32,
    /// Seconds a revealed tile takes to fade out.
    pub fade_duration: f32,
    /// Z depth of the board above the image.
    pub z: f32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            cover_color: Color::srgb_u8(0x1f, 0x29, 0x37),
            hover_color: Color::srgb_u8(0x37, 0x41, 0x51),
            outline_color: Color::srgb_u8(0x37, 0x41, 0x51),
            outline_width: 2.0,
            fade_duration: 0.3,
            z: 1.0,
        }
    }
}

/// Spawns cover meshes for every new round and animates reveals.
pub struct BoardPlugin(pub BoardConfig);

impl Plugin for BoardPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<BoardConfig>()
            .register_type::<HexCover>()
            .register_type::<CoverFade>()
            .insert_resource(self.0.clone())
            .add_systems(
                Update,
                (
                    systems::spawn_covers,
                    systems::mark_revealed_covers,
                    systems::highlight_hovered_cover,
                    systems::fade_covers,
                )
                    .chain()
                    .in_set(AppSet::Render),
            )
            .add_systems(
                Update,
                systems::reveal_clicked_cover
                    .in_set(AppSet::Input)
                    .run_if(in_state(GamePhase::Playing)),
            )
            .add_systems(
                Update,
                systems::clear_board
                    .in_set(AppSet::Render)
                    .run_if(systems::round_discarded),
            )
            .add_systems(OnEnter(GamePhase::Setup), systems::clear_board);
    }
}
