use std::path::Path;

use bevy::prelude::*;

use super::{GameCommand, GameSession, RoundStarted};
use crate::scoreboard::Scoreboard;
use crate::{GamePhase, LaunchOptions, library};

// ── Startup ────────────────────────────────────────────────────────

/// Applies command-line options: folder, difficulty, players, autostart.
pub fn apply_launch_options(
    options: Res<LaunchOptions>,
    mut session: ResMut<GameSession>,
    mut scoreboard: ResMut<Scoreboard>,
) {
    if let Some(difficulty) = options.difficulty {
        session.set_difficulty(difficulty);
    }
    for name in &options.players {
        scoreboard.add_player(name);
    }
    if let Some(folder) = &options.folder {
        open_folder(&mut session, folder);
    }
    if options.play
        && let Err(e) = session.start_game()
    {
        session.set_notice(e.to_string());
    }
}

// ── Update ─────────────────────────────────────────────────────────

/// Turns [`GameCommand`]s into session transitions.
///
/// Score, fullscreen and help commands are handled by their own plugins.
pub fn apply_commands(
    mut commands_in: MessageReader<GameCommand>,
    mut session: ResMut<GameSession>,
) {
    let mut rng = rand::rng();
    for command in commands_in.read() {
        match command {
            GameCommand::OpenFolder(path) => open_folder(&mut session, path),
            GameCommand::SetDifficulty(difficulty) => session.set_difficulty(*difficulty),
            GameCommand::StartGame => match session.start_game() {
                Ok(()) => session.clear_notice(),
                Err(e) => session.set_notice(e.to_string()),
            },
            GameCommand::RevealNext => {
                if let Some(id) = session.reveal_next(&mut rng) {
                    debug!("revealed {id}");
                }
            }
            GameCommand::RevealAll => {
                session.reveal_all();
            }
            GameCommand::RevealTile(id) => {
                if session.reveal_tile(*id) {
                    debug!("revealed {id} by click");
                }
            }
            GameCommand::NextImage => session.next_image(),
            GameCommand::PreviousImage => session.previous_image(),
            GameCommand::RestartFromFirstImage => session.restart_from_first_image(),
            GameCommand::ResetToSetup => session.reset_to_setup(),
            GameCommand::AwardPoint(_)
            | GameCommand::ResetScores
            | GameCommand::ToggleFullscreen
            | GameCommand::ToggleHelp => {}
        }
    }
}

/// Copies the session phase into the [`GamePhase`] state.
pub fn sync_game_phase(
    session: Res<GameSession>,
    state: Res<State<GamePhase>>,
    mut next: ResMut<NextState<GamePhase>>,
) {
    if session.phase() != *state.get() {
        next.set(session.phase());
    }
}

/// Writes a [`RoundStarted`] for every round the session has started since
/// the last frame.
pub fn announce_rounds(
    session: Res<GameSession>,
    mut announced: Local<u64>,
    mut rounds_out: MessageWriter<RoundStarted>,
) {
    if session.rounds_started() == *announced {
        return;
    }
    *announced = session.rounds_started();
    if let Some(round) = session.round() {
        rounds_out.write(RoundStarted {
            tiles: round.tiles().len(),
            hex_size: round.hex_size(),
        });
    }
}

// ── Helpers ────────────────────────────────────────────────────────

fn open_folder(session: &mut GameSession, folder: &Path) {
    match library::load_images_from_folder(folder) {
        Ok(images) => {
            session.set_library(folder.to_path_buf(), images);
            session.clear_notice();
        }
        Err(e) => session.set_notice(e.to_string()),
    }
}
