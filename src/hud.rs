//! egui overlays: setup screen, scoreboard, controls bar and shortcut help.

mod entities;
mod systems;

pub use entities::HudState;

use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;

use crate::session::GameSession;
use crate::{AppSet, GamePhase};

/// HUD sizing.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct HudConfig {
    /// Width of the setup form.
    pub setup_width: f32,
    /// Minimum width of the scoreboard window.
    pub scoreboard_width: f32,
    /// Gap between floating windows and the window edge.
    pub edge_gap: f32,
}

impl Default for HudConfig {
    fn default() -> Self {
        Self {
            setup_width: 420.0,
            scoreboard_width: 180.0,
            edge_gap: 12.0,
        }
    }
}

/// `Image 2 / 5 · beach.jpg`, or an empty string before anything is loaded.
pub fn image_label(session: &GameSession) -> String {
    match session.current_image() {
        Some(image) => format!(
            "Image {} / {} · {}",
            session.current_index() + 1,
            session.images().len(),
            image.filename
        ),
        None => String::new(),
    }
}

/// `Revealed 3 / 25`, or `Laying out…` while the round is being rebuilt.
pub fn progress_label(session: &GameSession) -> String {
    match (session.round(), session.rendered_dimensions()) {
        (Some(round), Some(_)) => format!(
            "Revealed {} / {}",
            round.revealed_count(),
            round.tiles().len()
        ),
        _ => "Laying out…".to_owned(),
    }
}

/// Setup screen, in-game panels and the help overlay.
pub struct HudPlugin(pub HudConfig);

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<HudConfig>()
            .insert_resource(self.0.clone())
            .init_resource::<HudState>()
            .add_systems(Update, systems::toggle_help.in_set(AppSet::Apply))
            .add_systems(
                EguiPrimaryContextPass,
                systems::setup_panel.run_if(in_state(GamePhase::Setup)),
            )
            .add_systems(
                EguiPrimaryContextPass,
                (systems::controls_bar, systems::scoreboard_window)
                    .run_if(not(in_state(GamePhase::Setup))),
            )
            .add_systems(
                EguiPrimaryContextPass,
                systems::help_overlay.run_if(|hud: Res<HudState>| hud.help_open),
            );
    }
}
