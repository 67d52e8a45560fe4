use std::path::PathBuf;

use bevy::prelude::*;
use bevy_egui::{EguiContext, PrimaryEguiContext, egui};

use super::entities::HudState;
use super::{HudConfig, image_label, progress_label};
use crate::GamePhase;
use crate::scoreboard::{Player, Scoreboard};
use crate::session::{Difficulty, GameCommand, GameSession};
use crate::shortcuts::SHORTCUT_HELP;

const NOTICE_COLOR: egui::Color32 = egui::Color32::from_rgb(0xf8, 0x71, 0x71);

// ── Update ─────────────────────────────────────────────────────────

/// Handles [`GameCommand::ToggleHelp`].
pub fn toggle_help(mut commands_in: MessageReader<GameCommand>, mut hud: ResMut<HudState>) {
    for _ in commands_in
        .read()
        .filter(|c| matches!(c, GameCommand::ToggleHelp))
    {
        hud.help_open = !hud.help_open;
    }
}

// ── EguiPrimaryContextPass ─────────────────────────────────────────

/// Folder, difficulty and player setup.
pub fn setup_panel(
    mut egui_ctx: Query<&mut EguiContext, With<PrimaryEguiContext>>,
    mut hud: ResMut<HudState>,
    mut scoreboard: ResMut<Scoreboard>,
    session: Res<GameSession>,
    cfg: Res<HudConfig>,
    mut commands_out: MessageWriter<GameCommand>,
) {
    let Ok(mut ctx) = egui_ctx.single_mut() else {
        return;
    };
    let hud = &mut *hud;

    egui::CentralPanel::default().show(ctx.get_mut(), |ui| {
        ui.vertical_centered(|ui| {
            ui.set_max_width(cfg.setup_width);
            ui.add_space(24.0);
            ui.heading("Hex Reveal");
            ui.label("Guess the picture before the last tile falls.");
            ui.add_space(16.0);

            // Folder
            ui.group(|ui| {
                ui.label(egui::RichText::new("Image folder").strong());
                ui.horizontal(|ui| {
                    let field = ui.text_edit_singleline(&mut hud.folder_input);
                    let submitted =
                        field.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                    let load = ui.button("Load").clicked();
                    if (load || submitted) && !hud.folder_input.trim().is_empty() {
                        commands_out.write(GameCommand::OpenFolder(PathBuf::from(
                            hud.folder_input.trim(),
                        )));
                    }
                });
                if let Some(folder) = session.folder() {
                    ui.label(format!(
                        "{} images in {}",
                        session.images().len(),
                        folder.display()
                    ));
                }
            });

            // Difficulty
            ui.group(|ui| {
                ui.label(egui::RichText::new("Difficulty").strong());
                ui.horizontal(|ui| {
                    let mut selected = session.difficulty();
                    for level in Difficulty::ALL {
                        let label = format!("{} ({} tiles)", level.label(), level.tile_count());
                        ui.radio_value(&mut selected, level, label);
                    }
                    if selected != session.difficulty() {
                        commands_out.write(GameCommand::SetDifficulty(selected));
                    }
                });
            });

            // Players
            ui.group(|ui| {
                ui.label(egui::RichText::new("Players").strong());
                player_list(ui, hud, &mut scoreboard);
                ui.horizontal(|ui| {
                    let field = ui.text_edit_singleline(&mut hud.new_player);
                    let submitted =
                        field.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                    if ui.button("Add").clicked() || submitted {
                        scoreboard.add_player(&hud.new_player);
                        hud.new_player.clear();
                    }
                });
            });

            ui.add_space(12.0);
            let can_start = !session.images().is_empty();
            if ui
                .add_enabled(can_start, egui::Button::new("Start game"))
                .clicked()
            {
                commands_out.write(GameCommand::StartGame);
            }
            if let Some(notice) = session.notice() {
                ui.colored_label(NOTICE_COLOR, notice);
            }
            ui.add_space(8.0);
            ui.weak("Press ? for keyboard shortcuts");
        });
    });
}

/// Bottom bar with navigation, reveal buttons and progress.
pub fn controls_bar(
    mut egui_ctx: Query<&mut EguiContext, With<PrimaryEguiContext>>,
    session: Res<GameSession>,
    mut commands_out: MessageWriter<GameCommand>,
) {
    let Ok(mut ctx) = egui_ctx.single_mut() else {
        return;
    };
    let playing = session.phase() == GamePhase::Playing;

    egui::TopBottomPanel::bottom("controls").show(ctx.get_mut(), |ui| {
        ui.horizontal_centered(|ui| {
            let mut send = |command| {
                commands_out.write(command);
            };
            if ui.button("◀ Prev").clicked() {
                send(GameCommand::PreviousImage);
            }
            if ui.button("Next ▶").clicked() {
                send(GameCommand::NextImage);
            }
            ui.separator();
            if ui
                .add_enabled(playing, egui::Button::new("Reveal next"))
                .clicked()
            {
                send(GameCommand::RevealNext);
            }
            if ui
                .add_enabled(playing, egui::Button::new("Reveal all"))
                .clicked()
            {
                send(GameCommand::RevealAll);
            }
            ui.separator();
            ui.label(image_label(&session));
            ui.label(progress_label(&session));
            if let Some(notice) = session.notice() {
                ui.colored_label(NOTICE_COLOR, notice);
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Setup").clicked() {
                    send(GameCommand::ResetToSetup);
                }
                if ui.button("Restart").clicked() {
                    send(GameCommand::RestartFromFirstImage);
                }
                if ui.button("Fullscreen").clicked() {
                    send(GameCommand::ToggleFullscreen);
                }
                if ui.button("?").clicked() {
                    send(GameCommand::ToggleHelp);
                }
            });
        });
    });
}

/// Floating scoreboard with a +1 button per player.
pub fn scoreboard_window(
    mut egui_ctx: Query<&mut EguiContext, With<PrimaryEguiContext>>,
    scoreboard: Res<Scoreboard>,
    cfg: Res<HudConfig>,
    mut commands_out: MessageWriter<GameCommand>,
) {
    if scoreboard.players().is_empty() {
        return;
    }
    let Ok(mut ctx) = egui_ctx.single_mut() else {
        return;
    };

    egui::Window::new("Scores")
        .anchor(egui::Align2::RIGHT_TOP, [-cfg.edge_gap, cfg.edge_gap])
        .resizable(false)
        .collapsible(true)
        .min_width(cfg.scoreboard_width)
        .show(ctx.get_mut(), |ui| {
            egui::Grid::new("scores").num_columns(3).show(ui, |ui| {
                for (slot, player) in scoreboard.players().iter().enumerate() {
                    ui.label(player_name(player));
                    ui.label(egui::RichText::new(player.score.to_string()).strong());
                    if ui
                        .small_button("+1")
                        .on_hover_text(format!("Key {}", slot + 1))
                        .clicked()
                    {
                        commands_out.write(GameCommand::AwardPoint(slot));
                    }
                    ui.end_row();
                }
            });
            if ui.small_button("Reset scores").clicked() {
                commands_out.write(GameCommand::ResetScores);
            }
        });
}

/// Keyboard shortcut legend.
pub fn help_overlay(
    mut egui_ctx: Query<&mut EguiContext, With<PrimaryEguiContext>>,
    mut hud: ResMut<HudState>,
) {
    let Ok(mut ctx) = egui_ctx.single_mut() else {
        return;
    };
    let mut open = hud.help_open;

    egui::Window::new("Keyboard shortcuts")
        .open(&mut open)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .resizable(false)
        .collapsible(false)
        .show(ctx.get_mut(), |ui| {
            egui::Grid::new("shortcuts").num_columns(2).show(ui, |ui| {
                for (key, action) in SHORTCUT_HELP {
                    ui.label(egui::RichText::new(key).monospace().strong());
                    ui.label(action);
                    ui.end_row();
                }
            });
        });

    if open != hud.help_open {
        hud.help_open = open;
    }
}

// ── Helpers ────────────────────────────────────────────────────────

fn player_name(player: &Player) -> egui::RichText {
    let [r, g, b] = player.rgb;
    egui::RichText::new(&player.name).color(egui::Color32::from_rgb(r, g, b))
}

/// Player rows with inline rename and remove.
fn player_list(ui: &mut egui::Ui, hud: &mut HudState, scoreboard: &mut Scoreboard) {
    let mut remove = None;
    let mut rename = None;

    for player in scoreboard.players() {
        ui.horizontal(|ui| {
            if let Some((id, buffer)) = hud.renaming.as_mut().filter(|(id, _)| *id == player.id) {
                if ui.text_edit_singleline(buffer).lost_focus() {
                    rename = Some((*id, buffer.clone()));
                }
            } else if ui
                .add(egui::Label::new(player_name(player)).sense(egui::Sense::click()))
                .on_hover_text("Click to rename")
                .clicked()
            {
                hud.renaming = Some((player.id, player.name.clone()));
            }
            if ui.small_button("✕").clicked() {
                remove = Some(player.id);
            }
        });
    }

    if let Some((id, name)) = rename {
        scoreboard.rename_player(id, &name);
        hud.renaming = None;
    }
    if let Some(id) = remove {
        scoreboard.remove_player(id);
    }
}
