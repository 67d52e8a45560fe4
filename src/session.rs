//! Game session: image list, difficulty, phase and the current round.
//!
//! Input and UI never touch [`GameSession`] directly; they write
//! [`GameCommand`] messages that [`apply_commands`] turns into session
//! transitions. Every new tile layout is announced with [`RoundStarted`].

mod entities;
mod systems;

pub use entities::{Difficulty, GameSession};
pub use systems::{announce_rounds, apply_commands, apply_launch_options, sync_game_phase};

use std::path::PathBuf;

use bevy::prelude::*;
use thiserror::Error;

use crate::board::{LayoutError, TileId};
use crate::{AppSet, LaunchOptions};

/// Requests from keyboard, mouse and HUD.
#[derive(Message, Debug, Clone, PartialEq)]
pub enum GameCommand {
    /// Load every supported image in a folder.
    OpenFolder(PathBuf),
    /// Choose the tile count for upcoming rounds.
    SetDifficulty(Difficulty),
    /// Leave setup and show the first image.
    StartGame,
    /// Reveal one random covered tile.
    RevealNext,
    /// Reveal every tile.
    RevealAll,
    /// Reveal a clicked tile.
    RevealTile(TileId),
    /// Go to the next image.
    NextImage,
    /// Go to the previous image.
    PreviousImage,
    /// Start over from the first image, keeping players and settings.
    RestartFromFirstImage,
    /// Drop everything and go back to setup.
    ResetToSetup,
    /// Give one point to the player in this zero-based slot.
    AwardPoint(usize),
    /// Zero every score.
    ResetScores,
    /// Switch between windowed and borderless fullscreen.
    ToggleFullscreen,
    /// Show or hide the shortcut overlay.
    ToggleHelp,
}

/// A fresh tile layout is available in [`GameSession::round`].
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct RoundStarted {
    /// Number of tiles in the new round.
    pub tiles: usize,
    /// Circumradius of every tile.
    pub hex_size: f32,
}

/// Failed session transitions.
#[derive(Debug, Error)]
pub enum SessionError {
    /// No image has been loaded.
    #[error("select a folder with images first")]
    NoImages,
    /// The grid could not be laid out.
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// Owns [`GameSession`] and the command/round message channels.
pub struct SessionPlugin;

impl Plugin for SessionPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<GameSession>()
            .add_message::<GameCommand>()
            .add_message::<RoundStarted>()
            .init_resource::<GameSession>()
            .init_resource::<LaunchOptions>()
            .add_systems(Startup, apply_launch_options)
            .add_systems(
                Update,
                (apply_commands, sync_game_phase)
                    .chain()
                    .in_set(AppSet::Apply),
            )
            .add_systems(Update, announce_rounds.in_set(AppSet::Render));
    }
}
