use bevy::prelude::*;

use crate::scoreboard::PlayerId;

/// Transient UI state: overlay visibility and text field buffers.
#[derive(Resource, Default, Debug)]
pub struct HudState {
    /// Whether the shortcut overlay is shown.
    pub help_open: bool,
    /// Folder path typed on the setup screen.
    pub folder_input: String,
    /// Name typed into the "add player" field.
    pub new_player: String,
    /// Player being renamed and the name typed so far.
    pub renaming: Option<(PlayerId, String)>,
}
