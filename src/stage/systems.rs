use bevy::prelude::*;
use bevy::tasks::futures_lite::future;
use bevy::tasks::{AsyncComputeTaskPool, TaskPool, block_on};
use bevy::window::{MonitorSelection, PrimaryWindow, WindowMode};

use super::entities::{ImageDecode, ShownImage, StageCamera, StageImage};
use super::{StageConfig, toggled_window_mode};
use crate::library::{self, LibraryError};
use crate::session::{GameCommand, GameSession};
use crate::{LaunchOptions, math};

// ── Startup ────────────────────────────────────────────────────────

/// Spawns the camera and the (hidden) image sprite.
pub fn spawn_stage(mut commands: Commands, cfg: Res<StageConfig>) {
    commands.spawn((
        Name::new("Stage Camera"),
        Camera2d,
        StageCamera,
        Transform::from_xyz(0.0, cfg.camera_offset(), 0.0),
    ));
    commands.spawn((
        Name::new("Stage Image"),
        Sprite::default(),
        StageImage,
        Transform::default(),
        Visibility::Hidden,
    ));
}

/// Honors `--fullscreen`.
pub fn apply_fullscreen_option(
    options: Res<LaunchOptions>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
) {
    if !options.fullscreen {
        return;
    }
    for mut window in &mut windows {
        window.mode = WindowMode::BorderlessFullscreen(MonitorSelection::Current);
    }
}

// ── Update ─────────────────────────────────────────────────────────

/// Handles [`GameCommand::ToggleFullscreen`].
pub fn toggle_fullscreen(
    mut commands_in: MessageReader<GameCommand>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
) {
    for _ in commands_in
        .read()
        .filter(|c| matches!(c, GameCommand::ToggleFullscreen))
    {
        for mut window in &mut windows {
            window.mode = toggled_window_mode(window.mode);
            info!("window mode: {:?}", window.mode);
        }
    }
}

/// Starts decoding the session's current image when it changes.
///
/// The sprite stays hidden until the decode finishes. A decode still running
/// for the previous image is dropped, which cancels it.
pub fn start_image_decode(
    mut commands: Commands,
    session: Res<GameSession>,
    mut shown: ResMut<ShownImage>,
    mut sprite_q: Query<(Entity, &mut Visibility), With<StageImage>>,
) {
    let Some(path) = session.current_image().map(|img| img.path.clone()) else {
        return;
    };
    if shown.path.as_ref() == Some(&path) {
        return;
    }
    let Ok((entity, mut visibility)) = sprite_q.single_mut() else {
        return;
    };

    *visibility = Visibility::Hidden;
    *shown = ShownImage {
        path: Some(path.clone()),
        native: Vec2::ZERO,
    };
    let task = AsyncComputeTaskPool::get_or_init(TaskPool::default)
        .spawn(async move { library::decode_image(&path) });
    commands.entity(entity).insert(ImageDecode(task));
}

/// Moves a finished decode into the stage sprite.
pub fn finish_image_decode(
    mut commands: Commands,
    mut session: ResMut<GameSession>,
    mut shown: ResMut<ShownImage>,
    mut images: ResMut<Assets<Image>>,
    mut decodes: Query<(Entity, &mut ImageDecode)>,
    mut sprite_q: Query<(&mut Sprite, &mut Visibility), With<StageImage>>,
) {
    for (entity, mut decode) in &mut decodes {
        let Some(result) = block_on(future::poll_once(&mut decode.0)) else {
            continue;
        };
        let Ok((mut sprite, mut visibility)) = sprite_q.get_mut(entity) else {
            continue;
        };
        commands.entity(entity).remove::<ImageDecode>();
        show_decoded(
            result,
            &mut session,
            &mut shown,
            &mut images,
            &mut sprite,
            &mut visibility,
        );
    }
}

/// Shows a decoded image, or drops the round when the image is unusable so
/// its covers do not linger over an empty stage.
pub fn show_decoded(
    result: Result<Image, LibraryError>,
    session: &mut GameSession,
    shown: &mut ShownImage,
    images: &mut Assets<Image>,
    sprite: &mut Sprite,
    visibility: &mut Visibility,
) {
    match result {
        Ok(decoded) => {
            shown.native = Vec2::new(decoded.width() as f32, decoded.height() as f32);
            sprite.image = images.add(decoded);
            *visibility = Visibility::Visible;
        }
        Err(e) => {
            shown.native = Vec2::ZERO;
            sprite.image = Handle::default();
            *visibility = Visibility::Hidden;
            session.discard_round();
            session.set_notice(e.to_string());
        }
    }
}

/// Fits the decoded image to the window.
///
/// Whenever the fitted size differs from the session's rendered size (new
/// image, resize, restart) the size is pushed into the session, which starts
/// a new round.
pub fn layout_stage(
    mut session: ResMut<GameSession>,
    shown: Res<ShownImage>,
    cfg: Res<StageConfig>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut sprite_q: Query<&mut Sprite, With<StageImage>>,
) {
    if !shown.is_loaded() {
        return;
    }
    let Ok(window) = windows.single() else { return };
    let Ok(mut sprite) = sprite_q.single_mut() else {
        return;
    };

    let area = cfg.image_area(Vec2::new(window.width(), window.height()));
    let fitted = math::fit_contain(shown.native, area);
    if !math::is_positive(fitted.x) || !math::is_positive(fitted.y) {
        return;
    }
    if sprite.custom_size != Some(fitted) {
        sprite.custom_size = Some(fitted);
    }
    if session.rendered_dimensions() != Some(fitted)
        && let Err(e) = session.set_rendered_dimensions(fitted, &mut rand::rng())
    {
        session.set_notice(e.to_string());
    }
}

// ── OnEnter(Setup) ─────────────────────────────────────────────────

/// Hides the image and forgets it so the next game decodes afresh.
pub fn hide_stage(
    mut commands: Commands,
    mut shown: ResMut<ShownImage>,
    mut sprite_q: Query<(Entity, &mut Sprite, &mut Visibility), With<StageImage>>,
) {
    *shown = ShownImage::default();
    for (entity, mut sprite, mut visibility) in &mut sprite_q {
        sprite.image = Handle::default();
        *visibility = Visibility::Hidden;
        commands.entity(entity).remove::<ImageDecode>();
    }
}
