use std::path::{Path, PathBuf};

use bevy::prelude::*;
use rand::Rng;

use super::SessionError;
use crate::GamePhase;
use crate::board::{RevealRound, RoundPhase, TileId};
use crate::library::ImageMetadata;

/// How many tiles cover each image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Reflect)]
#[cfg_attr(feature = "native", derive(clap::ValueEnum))]
pub enum Difficulty {
    /// About 10 large tiles.
    Easy,
    /// About 25 tiles.
    #[default]
    Medium,
    /// About 50 small tiles.
    Hard,
}

impl Difficulty {
    /// Every level, easiest first.
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Target tile count handed to the hex size solver.
    pub fn tile_count(self) -> u32 {
        match self {
            Difficulty::Easy => 10,
            Difficulty::Medium => 25,
            Difficulty::Hard => 50,
        }
    }

    /// Human-readable name.
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

/// Everything about the game in progress except the players.
///
/// Mutated only through the transition methods below; the `GamePhase` state
/// is kept in sync by [`super::sync_game_phase`].
#[derive(Resource, Debug, Default, Reflect)]
pub struct GameSession {
    phase: GamePhase,
    folder: Option<PathBuf>,
    images: Vec<ImageMetadata>,
    current: usize,
    difficulty: Difficulty,
    rendered: Option<Vec2>,
    round: Option<RevealRound>,
    rounds_started: u64,
    notice: Option<String>,
}

impl GameSession {
    /// Current phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Folder the images were loaded from.
    pub fn folder(&self) -> Option<&Path> {
        self.folder.as_deref()
    }

    /// Loaded images, sorted by file name.
    pub fn images(&self) -> &[ImageMetadata] {
        &self.images
    }

    /// Index of the image on screen.
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The image on screen, if any are loaded.
    pub fn current_image(&self) -> Option<&ImageMetadata> {
        self.images.get(self.current)
    }

    /// Selected difficulty.
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// On-screen size of the current image, once the stage has laid it out.
    pub fn rendered_dimensions(&self) -> Option<Vec2> {
        self.rendered
    }

    /// Tiles for the current image.
    pub fn round(&self) -> Option<&RevealRound> {
        self.round.as_ref()
    }

    /// Number of rounds started so far; bumps with every new tile layout.
    pub fn rounds_started(&self) -> u64 {
        self.rounds_started
    }

    /// Last user-facing error message.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Replaces the notice and logs it.
    pub fn set_notice(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!("{message}");
        self.notice = Some(message);
    }

    /// Dismisses the notice.
    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    /// Replaces the image list and goes back to the first image.
    pub fn set_library(&mut self, folder: PathBuf, images: Vec<ImageMetadata>) {
        self.folder = Some(folder);
        self.images = images;
        self.current = 0;
        self.rendered = None;
        self.round = None;
    }

    /// Selects the difficulty used by the next round.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
    }

    /// Leaves setup. The first round starts once the stage reports the
    /// rendered size of the first image.
    pub fn start_game(&mut self) -> Result<(), SessionError> {
        if self.images.is_empty() {
            return Err(SessionError::NoImages);
        }
        self.phase = GamePhase::Playing;
        self.rendered = None;
        self.round = None;
        info!(
            "game started with {} images on {}",
            self.images.len(),
            self.difficulty.label()
        );
        Ok(())
    }

    /// Lays out a fresh, fully covered grid over the current image.
    ///
    /// Uses the rendered size if known, the native size otherwise.
    pub fn start_round<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), SessionError> {
        let image = self.current_image().ok_or(SessionError::NoImages)?;
        let area = self.rendered.unwrap_or_else(|| image.size());
        info!(
            "round {} on image {} ({}) at {:.0}x{:.0}",
            self.rounds_started + 1,
            self.current + 1,
            image.filename,
            area.x,
            area.y
        );

        let round = RevealRound::generate(area, self.difficulty.tile_count(), rng)?;
        debug!(
            "{} tiles at hex size {:.1}",
            round.tiles().len(),
            round.hex_size()
        );
        self.round = Some(round);
        self.rendered = Some(area);
        self.rounds_started += 1;
        self.phase = GamePhase::Playing;
        Ok(())
    }

    /// Records the on-screen size of the current image and, outside setup,
    /// starts a new round for it.
    pub fn set_rendered_dimensions<R: Rng + ?Sized>(
        &mut self,
        size: Vec2,
        rng: &mut R,
    ) -> Result<(), SessionError> {
        if self.images.is_empty() {
            return Ok(());
        }
        self.rendered = Some(size);
        if self.phase == GamePhase::Setup {
            return Ok(());
        }
        self.start_round(rng)
    }

    /// Reveals one random covered tile.
    pub fn reveal_next<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<TileId> {
        let revealed = self.round.as_mut()?.reveal_next(rng);
        self.mirror_round_phase();
        revealed
    }

    /// Reveals the tile `id`; ignored unless the phase is `Playing`.
    pub fn reveal_tile(&mut self, id: TileId) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        let Some(round) = self.round.as_mut() else {
            return false;
        };
        let changed = round.reveal_tile(id);
        self.mirror_round_phase();
        changed
    }

    /// Uncovers the whole image.
    pub fn reveal_all(&mut self) -> usize {
        let Some(round) = self.round.as_mut() else {
            return 0;
        };
        let newly = round.reveal_all();
        self.mirror_round_phase();
        newly
    }

    /// Moves to the next image, wrapping to the first.
    pub fn next_image(&mut self) {
        if self.images.is_empty() {
            return;
        }
        self.current = (self.current + 1) % self.images.len();
        self.rendered = None;
    }

    /// Moves to the previous image, wrapping to the last.
    pub fn previous_image(&mut self) {
        if self.images.is_empty() {
            return;
        }
        self.current = self.current.checked_sub(1).unwrap_or(self.images.len() - 1);
        self.rendered = None;
    }

    /// Drops the current round, e.g. when its image cannot be shown. Reveal
    /// commands are no-ops until the next layout.
    pub fn discard_round(&mut self) {
        self.rendered = None;
        self.round = None;
    }

    /// Starts over on the first image, keeping settings and players.
    pub fn restart_from_first_image(&mut self) {
        self.current = 0;
        self.rendered = None;
        self.round = None;
        self.phase = GamePhase::Playing;
    }

    /// Clears everything and returns to the setup screen.
    pub fn reset_to_setup(&mut self) {
        *self = Self {
            rounds_started: self.rounds_started,
            ..Self::default()
        };
    }

    fn mirror_round_phase(&mut self) {
        if let Some(round) = &self.round
            && self.phase != GamePhase::Setup
        {
            self.phase = match round.phase() {
                RoundPhase::Playing => GamePhase::Playing,
                RoundPhase::Revealed => GamePhase::Revealed,
            };
        }
    }
}
