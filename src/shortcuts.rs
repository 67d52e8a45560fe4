//! Keyboard shortcuts.

use bevy::prelude::*;
use bevy_egui::{EguiContext, PrimaryEguiContext};

use crate::scoreboard::Scoreboard;
use crate::session::{GameCommand, GameSession};
use crate::{AppSet, GamePhase};

/// Key legend shown by the help overlay.
pub const SHORTCUT_HELP: [(&str, &str); 10] = [
    ("Space", "Reveal next tile"),
    ("Enter", "Reveal all tiles"),
    ("Click", "Reveal a tile"),
    ("→", "Next image"),
    ("←", "Previous image"),
    ("R", "Restart from first image"),
    ("1 - 9", "Award a point to player 1 - 9"),
    ("F", "Toggle fullscreen"),
    ("Esc", "Back to setup"),
    ("?", "Toggle this help"),
];

const DIGIT_KEYS: [KeyCode; 9] = [
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
    KeyCode::Digit6,
    KeyCode::Digit7,
    KeyCode::Digit8,
    KeyCode::Digit9,
];

/// The command bound to `key` in `phase`, if any.
///
/// Help, fullscreen and escape work everywhere; everything else only once a
/// game is running. Digits award a point only to player slots that exist.
pub fn command_for_key(
    key: KeyCode,
    shift: bool,
    phase: GamePhase,
    player_count: usize,
) -> Option<GameCommand> {
    let in_game = phase != GamePhase::Setup;
    let playing = phase == GamePhase::Playing;

    match key {
        KeyCode::Slash if shift => Some(GameCommand::ToggleHelp),
        KeyCode::Escape => in_game.then_some(GameCommand::ResetToSetup),
        KeyCode::KeyF => Some(GameCommand::ToggleFullscreen),
        _ if !in_game => None,
        KeyCode::Space => playing.then_some(GameCommand::RevealNext),
        KeyCode::Enter | KeyCode::NumpadEnter => playing.then_some(GameCommand::RevealAll),
        KeyCode::ArrowRight => Some(GameCommand::NextImage),
        KeyCode::ArrowLeft => Some(GameCommand::PreviousImage),
        KeyCode::KeyR => Some(GameCommand::RestartFromFirstImage),
        _ => DIGIT_KEYS
            .iter()
            .position(|&digit| digit == key)
            .filter(|&slot| slot < player_count)
            .map(GameCommand::AwardPoint),
    }
}

/// Writes a [`GameCommand`] for every bound key pressed this frame.
///
/// Skipped while an egui text field has keyboard focus.
pub fn read_shortcuts(
    keys: Res<ButtonInput<KeyCode>>,
    session: Res<GameSession>,
    scoreboard: Res<Scoreboard>,
    mut egui_ctx: Query<&mut EguiContext, With<PrimaryEguiContext>>,
    mut commands_out: MessageWriter<GameCommand>,
) {
    if let Ok(mut ctx) = egui_ctx.single_mut()
        && ctx.get_mut().wants_keyboard_input()
    {
        return;
    }

    let shift = keys.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]);
    let players = scoreboard.players().len();
    for &key in keys.get_just_pressed() {
        if let Some(command) = command_for_key(key, shift, session.phase(), players) {
            debug!("{key:?} -> {command:?}");
            commands_out.write(command);
        }
    }
}

/// Maps keys to commands.
pub struct ShortcutsPlugin;

impl Plugin for ShortcutsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, read_shortcuts.in_set(AppSet::Input));
    }
}
