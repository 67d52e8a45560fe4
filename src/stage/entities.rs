use std::path::PathBuf;

use bevy::prelude::*;
use bevy::tasks::Task;

use crate::library::LibraryError;

/// Marker for the 2D camera.
#[derive(Component)]
pub struct StageCamera;

/// Marker for the sprite showing the current image.
#[derive(Component)]
pub struct StageImage;

/// The image currently decoded into the stage sprite.
#[derive(Resource, Default, Debug)]
pub struct ShownImage {
    /// File the sprite was decoded from, even if decoding failed.
    pub path: Option<PathBuf>,
    /// Decoded size in pixels; zero until a decode succeeds.
    pub native: Vec2,
}

impl ShownImage {
    /// `true` once the sprite holds a decoded image.
    pub fn is_loaded(&self) -> bool {
        self.native != Vec2::ZERO
    }
}

/// Background decode of [`ShownImage::path`], attached to the stage sprite.
#[derive(Component)]
pub struct ImageDecode(pub Task<Result<Image, LibraryError>>);
