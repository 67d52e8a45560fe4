//! Stage: 2D camera, the current image sprite and window handling.
//!
//! The image is scaled to fit the window (minus margins) and its on-screen
//! size is fed back into the session, which lays out a new round for it.

mod entities;
mod systems;

pub use entities::{ImageDecode, ShownImage, StageCamera, StageImage};

use bevy::prelude::*;
use bevy::window::{MonitorSelection, WindowMode};

use crate::{AppSet, GamePhase};

/// Window layout settings.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct StageConfig {
    /// Free space kept around the image on every side, in logical pixels.
    pub margin: f32,
    /// Extra space kept below the image for the controls bar.
    pub controls_height: f32,
    /// Window background.
    pub clear_color: Color,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            margin: 16.0,
            controls_height: 56.0,
            clear_color: Color::srgb_u8(0x11, 0x18, 0x27),
        }
    }
}

impl StageConfig {
    /// Space available to the image in a window of `window` logical pixels.
    pub fn image_area(&self, window: Vec2) -> Vec2 {
        let reserved = Vec2::new(2.0 * self.margin, 2.0 * self.margin + self.controls_height);
        (window - reserved).max(Vec2::ZERO)
    }

    /// Vertical camera offset that centres the image in [`Self::image_area`].
    pub fn camera_offset(&self) -> f32 {
        -self.controls_height / 2.0
    }
}

/// Fullscreen when windowed, windowed otherwise.
pub fn toggled_window_mode(mode: WindowMode) -> WindowMode {
    match mode {
        WindowMode::Windowed => WindowMode::BorderlessFullscreen(MonitorSelection::Current),
        _ => WindowMode::Windowed,
    }
}

/// Camera, image sprite and fullscreen handling.
pub struct StagePlugin(pub StageConfig);

impl Plugin for StagePlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<StageConfig>()
            .insert_resource(self.0.clone())
            .insert_resource(ClearColor(self.0.clear_color))
            .init_resource::<ShownImage>()
            .add_systems(
                Startup,
                (systems::spawn_stage, systems::apply_fullscreen_option),
            )
            .add_systems(
                Update,
                systems::toggle_fullscreen.in_set(AppSet::Apply),
            )
            .add_systems(
                Update,
                (
                    systems::start_image_decode,
                    systems::finish_image_decode,
                    systems::layout_stage,
                )
                    .chain()
                    .in_set(AppSet::Layout)
                    .run_if(not(in_state(GamePhase::Setup))),
            )
            .add_systems(OnEnter(GamePhase::Setup), systems::hide_stage);
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use tempfile::TempDir;

    use super::*;
    use crate::library::{self, ImageMetadata};
    use crate::session::GameSession;

    // ── StageConfig ─────────────────────────────────────────────────

    #[test]
    fn image_area_subtracts_margins_and_controls() {
        let cfg = StageConfig {
            margin: 10.0,
            controls_height: 50.0,
            ..default()
        };
        assert_eq!(cfg.image_area(Vec2::new(800.0, 600.0)), Vec2::new(780.0, 530.0));
    }

    #[test]
    fn image_area_never_negative() {
        let cfg = StageConfig::default();
        assert_eq!(cfg.image_area(Vec2::new(10.0, 10.0)), Vec2::ZERO);
    }

    #[test]
    fn camera_offset_centres_above_controls() {
        let cfg = StageConfig {
            controls_height: 60.0,
            ..default()
        };
        assert_eq!(cfg.camera_offset(), -30.0);
    }

    // ── toggled_window_mode ─────────────────────────────────────────

    #[test]
    fn fullscreen_toggles_back_and_forth() {
        let full = toggled_window_mode(WindowMode::Windowed);
        assert_eq!(full, WindowMode::BorderlessFullscreen(MonitorSelection::Current));
        assert_eq!(toggled_window_mode(full), WindowMode::Windowed);
    }

    // ── show_decoded ────────────────────────────────────────────────

    fn playing_session() -> GameSession {
        let mut rng = StdRng::seed_from_u64(4);
        let mut session = GameSession::default();
        session.set_library(
            PathBuf::from("/pics"),
            vec![ImageMetadata {
                filename: "a.png".into(),
                path: PathBuf::from("/pics/a.png"),
                width: 400,
                height: 300,
            }],
        );
        session.start_game().unwrap();
        session
            .set_rendered_dimensions(Vec2::new(400.0, 300.0), &mut rng)
            .unwrap();
        session
    }

    #[test]
    fn failed_decode_drops_the_round() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"garbage").unwrap();

        let mut session = playing_session();
        assert!(session.round().is_some());
        let mut shown = ShownImage {
            path: Some(path.clone()),
            native: Vec2::ZERO,
        };
        let mut images = Assets::<Image>::default();
        let mut sprite = Sprite::default();
        let mut visibility = Visibility::Visible;

        systems::show_decoded(
            library::decode_image(&path),
            &mut session,
            &mut shown,
            &mut images,
            &mut sprite,
            &mut visibility,
        );
        assert!(session.round().is_none());
        assert!(session.notice().is_some());
        assert!(!shown.is_loaded());
        assert_eq!(visibility, Visibility::Hidden);
    }

    #[test]
    fn decoded_image_becomes_visible() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ok.png");
        image::RgbaImage::new(4, 2).save(&path).unwrap();

        let mut session = playing_session();
        let mut shown = ShownImage {
            path: Some(path.clone()),
            native: Vec2::ZERO,
        };
        let mut images = Assets::<Image>::default();
        let mut sprite = Sprite::default();
        let mut visibility = Visibility::Hidden;

        systems::show_decoded(
            library::decode_image(&path),
            &mut session,
            &mut shown,
            &mut images,
            &mut sprite,
            &mut visibility,
        );
        assert_eq!(shown.native, Vec2::new(4.0, 2.0));
        assert_eq!(visibility, Visibility::Visible);
        assert_eq!(images.len(), 1);
        assert!(session.round().is_some());
    }
}
