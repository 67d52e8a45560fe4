use bevy::prelude::*;

use super::TileId;

/// Parent of every cover entity for the current round.
///
/// Despawned with its children when a new round starts or the game returns
/// to setup.
#[derive(Component)]
pub struct BoardRoot;

/// Outline mesh of a single tile; its fill mesh is a child entity.
#[derive(Component, Clone, Reflect)]
pub struct HexCover {
    /// The tile this cover hides.
    pub id: TileId,
    /// Per-tile fill material, recolored on hover and faded on reveal.
    pub fill: Handle<ColorMaterial>,
    /// Per-tile outline material, faded together with the fill.
    pub stroke: Handle<ColorMaterial>,
}

/// Fade-out progress of a revealed cover.
#[derive(Component, Default, Reflect)]
pub struct CoverFade {
    /// Seconds since the tile was revealed.
    pub elapsed: f32,
}
