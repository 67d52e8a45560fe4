//! Players, their colors and their scores.

use bevy::prelude::*;

use crate::AppSet;
use crate::session::GameCommand;

/// Display colors handed out to players in join order, wrapping after eight.
pub const PLAYER_COLORS: [[u8; 3]; 8] = [
    [0x3b, 0x82, 0xf6], // blue
    [0xef, 0x44, 0x44], // red
    [0x10, 0xb9, 0x81], // green
    [0xf5, 0x9e, 0x0b], // yellow
    [0x8b, 0x5c, 0xf6], // purple
    [0xf9, 0x73, 0x16], // orange
    [0xec, 0x48, 0x99], // pink
    [0x14, 0xb8, 0xa6], // teal
];

/// Stable player handle; never reused within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub struct PlayerId(pub u32);

/// A player entry.
#[derive(Debug, Clone, PartialEq, Reflect)]
pub struct Player {
    /// Handle used by rename, remove and award.
    pub id: PlayerId,
    /// Display name, never blank.
    pub name: String,
    /// Points collected so far.
    pub score: u32,
    /// sRGB color from [`PLAYER_COLORS`].
    pub rgb: [u8; 3],
}

impl Player {
    /// The player's color as a Bevy color.
    pub fn color(&self) -> Color {
        let [r, g, b] = self.rgb;
        Color::srgb_u8(r, g, b)
    }
}

/// Ordered list of players. Slot `i` is the `i`-th player in join order.
#[derive(Resource, Debug, Default, Reflect)]
pub struct Scoreboard {
    players: Vec<Player>,
    next_id: u32,
}

impl Scoreboard {
    /// Players in join order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Looks up a player.
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Adds a player with zero points. A blank `name` becomes `Player N`.
    pub fn add_player(&mut self, name: &str) -> PlayerId {
        let count = self.players.len();
        let name = match name.trim() {
            "" => format!("Player {}", count + 1),
            trimmed => trimmed.to_owned(),
        };
        let id = PlayerId(self.next_id);
        self.next_id += 1;
        self.players.push(Player {
            id,
            name,
            score: 0,
            rgb: PLAYER_COLORS[count % PLAYER_COLORS.len()],
        });
        id
    }

    /// Removes a player; remaining players keep their colors.
    pub fn remove_player(&mut self, id: PlayerId) -> bool {
        let before = self.players.len();
        self.players.retain(|p| p.id != id);
        self.players.len() != before
    }

    /// Renames a player. A blank `name` keeps the current one.
    pub fn rename_player(&mut self, id: PlayerId, name: &str) -> bool {
        let name = name.trim();
        match self.players.iter_mut().find(|p| p.id == id) {
            Some(player) if !name.is_empty() => {
                player.name = name.to_owned();
                true
            }
            _ => false,
        }
    }

    /// Adds `points` to a player's score.
    pub fn award(&mut self, id: PlayerId, points: u32) -> bool {
        let Some(player) = self.players.iter_mut().find(|p| p.id == id) else {
            return false;
        };
        player.score = player.score.saturating_add(points);
        true
    }

    /// Adds `points` to the player in zero-based `slot`, if there is one.
    pub fn award_slot(&mut self, slot: usize, points: u32) -> Option<PlayerId> {
        let player = self.players.get_mut(slot)?;
        player.score = player.score.saturating_add(points);
        Some(player.id)
    }

    /// Sets every score back to zero, keeping the players.
    pub fn reset_scores(&mut self) {
        for player in &mut self.players {
            player.score = 0;
        }
    }
}

/// Applies [`GameCommand::AwardPoint`] and [`GameCommand::ResetScores`].
pub fn apply_score_commands(
    mut commands_in: MessageReader<GameCommand>,
    mut scoreboard: ResMut<Scoreboard>,
) {
    for command in commands_in.read() {
        match command {
            GameCommand::AwardPoint(slot) => {
                if let Some(id) = scoreboard.award_slot(*slot, 1) {
                    debug!("point awarded to slot {slot} ({id:?})");
                }
            }
            GameCommand::ResetScores => scoreboard.reset_scores(),
            _ => {}
        }
    }
}

/// Owns the [`Scoreboard`] resource.
pub struct ScoreboardPlugin;

impl Plugin for ScoreboardPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<Scoreboard>()
            .init_resource::<Scoreboard>()
            .add_systems(Update, apply_score_commands.in_set(AppSet::Apply));
    }
}

#[cfg(test)]
mod tests {
    use bevy::ecs::system::RunSystemOnce;

    use super::*;

    // ── add / rename / remove ───────────────────────────────────────

    #[test]
    fn names_are_trimmed_and_blank_names_numbered() {
        let mut board = Scoreboard::default();
        board.add_player("  Ada ");
        board.add_player("   ");
        let names: Vec<&str> = board.players().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Ada", "Player 2"]);
    }

    #[test]
    fn colors_wrap_after_eight_players() {
        let mut board = Scoreboard::default();
        for i in 0..9 {
            board.add_player(&format!("p{i}"));
        }
        let players = board.players();
        assert_eq!(players[0].rgb, PLAYER_COLORS[0]);
        assert_eq!(players[7].rgb, PLAYER_COLORS[7]);
        assert_eq!(players[8].rgb, PLAYER_COLORS[0]);
    }

    #[test]
    fn ids_are_not_reused_after_removal() {
        let mut board = Scoreboard::default();
        let a = board.add_player("a");
        assert!(board.remove_player(a));
        assert!(!board.remove_player(a));
        let b = board.add_player("b");
        assert_ne!(a, b);
    }

    #[test]
    fn blank_rename_keeps_old_name() {
        let mut board = Scoreboard::default();
        let id = board.add_player("Ada");
        assert!(!board.rename_player(id, "  "));
        assert!(board.rename_player(id, " Grace "));
        assert_eq!(board.player(id).unwrap().name, "Grace");
    }

    // ── scoring ─────────────────────────────────────────────────────

    #[test]
    fn award_and_reset() {
        let mut board = Scoreboard::default();
        let a = board.add_player("a");
        let b = board.add_player("b");
        board.award(a, 2);
        board.award(b, 1);
        assert_eq!(board.player(a).unwrap().score, 2);
        board.reset_scores();
        assert!(board.players().iter().all(|p| p.score == 0));
        assert_eq!(board.players().len(), 2);
    }

    #[test]
    fn award_slot_ignores_missing_players() {
        let mut board = Scoreboard::default();
        let a = board.add_player("a");
        assert_eq!(board.award_slot(0, 1), Some(a));
        assert_eq!(board.award_slot(3, 1), None);
        assert_eq!(board.player(a).unwrap().score, 1);
    }

    // ── apply_score_commands ────────────────────────────────────────

    #[test]
    fn commands_update_scores() {
        let mut world = World::new();
        world.init_resource::<Messages<GameCommand>>();
        world.init_resource::<Scoreboard>();
        world.resource_mut::<Scoreboard>().add_player("a");
        world.resource_mut::<Scoreboard>().add_player("b");

        {
            let mut messages = world.resource_mut::<Messages<GameCommand>>();
            messages.write(GameCommand::AwardPoint(1));
            messages.write(GameCommand::AwardPoint(1));
            messages.write(GameCommand::AwardPoint(5));
        }
        let _ = world.run_system_once(apply_score_commands);

        let scores: Vec<u32> = world
            .resource::<Scoreboard>()
            .players()
            .iter()
            .map(|p| p.score)
            .collect();
        assert_eq!(scores, [0, 2]);

        {
            let mut messages = world.resource_mut::<Messages<GameCommand>>();
            messages.clear();
            messages.write(GameCommand::ResetScores);
        }
        let _ = world.run_system_once(apply_score_commands);
        assert!(
            world
                .resource::<Scoreboard>()
                .players()
                .iter()
                .all(|p| p.score == 0)
        );
    }
}
