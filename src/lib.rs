#![warn(missing_docs)]
//! Hex Reveal: a picture guessing party game.
//!
//! An image from a folder is hidden under a grid of hexagonal tiles that are
//! uncovered one at a time, by clicking, or all at once while players guess
//! what is underneath and keep score.
//!
//! The tile layout and reveal rules ([`board`], [`math`]) are plain Rust with
//! no ECS dependency; the remaining modules are Bevy plugins around them.

pub mod board;
pub mod hud;
pub mod library;
pub mod math;
pub mod scoreboard;
pub mod session;
pub mod shortcuts;
pub mod stage;

use std::path::PathBuf;

use bevy::prelude::*;

use crate::session::Difficulty;

/// Application-wide game phase, used for system scheduling.
///
/// Follows [`session::GameSession::phase`].
#[derive(States, Default, Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum GamePhase {
    /// Choosing a folder, difficulty and players.
    #[default]
    Setup,
    /// An image is on screen with tiles still covered.
    Playing,
    /// Every tile of the current image is uncovered.
    Revealed,
}

/// Per-frame ordering of the plugins' systems.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppSet {
    /// Keyboard and mouse turned into [`session::GameCommand`]s.
    Input,
    /// Commands applied to the session and scoreboard.
    Apply,
    /// Image fitted to the window; new rounds laid out.
    Layout,
    /// Covers and sprites updated to match the session.
    Render,
}

/// Options given on the command line.
#[derive(Resource, Debug, Clone, Default)]
#[cfg_attr(feature = "native", derive(clap::Parser))]
#[cfg_attr(
    feature = "native",
    command(name = "hex-reveal", version, about = "Guess the picture under the hexagons")
)]
pub struct LaunchOptions {
    /// Folder of images to load on startup.
    #[cfg_attr(feature = "native", arg(long))]
    pub folder: Option<PathBuf>,
    /// Tile count preset.
    #[cfg_attr(feature = "native", arg(long, value_enum))]
    pub difficulty: Option<Difficulty>,
    /// Player name; repeat for several players.
    #[cfg_attr(feature = "native", arg(long = "player"))]
    pub players: Vec<String>,
    /// Skip the setup screen (requires --folder).
    #[cfg_attr(feature = "native", arg(long))]
    pub play: bool,
    /// Start in borderless fullscreen.
    #[cfg_attr(feature = "native", arg(long))]
    pub fullscreen: bool,
    /// Log this crate at debug level.
    #[cfg_attr(feature = "native", arg(short, long))]
    pub verbose: bool,
}

/// Orders [`AppSet`] within `Update`.
pub struct AppSetPlugin;

impl Plugin for AppSetPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            Update,
            (AppSet::Input, AppSet::Apply, AppSet::Layout, AppSet::Render).chain(),
        );
    }
}

/// Every gameplay plugin with default configuration.
///
/// Expects `DefaultPlugins` and `bevy_egui::EguiPlugin` to be added already.
pub struct HexRevealPlugins;

impl Plugin for HexRevealPlugins {
    fn build(&self, app: &mut App) {
        app.register_type::<GamePhase>()
            .init_state::<GamePhase>()
            .add_plugins(AppSetPlugin)
            .add_plugins(session::SessionPlugin)
            .add_plugins(scoreboard::ScoreboardPlugin)
            .add_plugins(shortcuts::ShortcutsPlugin)
            .add_plugins(stage::StagePlugin(stage::StageConfig::default()))
            .add_plugins(board::BoardPlugin(board::BoardConfig::default()))
            .add_plugins(hud::HudPlugin(hud::HudConfig::default()));
    }
}
