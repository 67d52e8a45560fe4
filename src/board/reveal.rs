//! Reveal order and per-round tile state.

use bevy::prelude::*;
use rand::Rng;

use super::{LayoutError, TileId, TileLayout, generate_hex_grid, optimal_hex_size};

/// Uniformly random permutation of `0..n` (Fisher–Yates).
pub fn reveal_sequence<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<usize> {
    let mut sequence: Vec<usize> = (0..n).collect();
    for i in (1..n).rev() {
        let j = rng.random_range(0..=i);
        sequence.swap(i, j);
    }
    sequence
}

/// [`reveal_sequence`] drawn from the thread-local generator.
pub fn random_reveal_sequence(n: usize) -> Vec<usize> {
    reveal_sequence(n, &mut rand::rng())
}

/// Whether a round still has covered tiles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Reflect)]
pub enum RoundPhase {
    /// At least one tile is still covered.
    #[default]
    Playing,
    /// Every tile has been revealed.
    Revealed,
}

/// A tile record for one round: layout, reveal rank and revealed flag.
#[derive(Debug, Clone, PartialEq, Reflect)]
pub struct HexTile {
    /// Position and identity in the grid.
    pub layout: TileLayout,
    /// Rank assigned by the round's reveal sequence.
    pub reveal_order: usize,
    /// `true` once the tile no longer hides the image.
    pub revealed: bool,
}

impl HexTile {
    /// Shorthand for `self.layout.id`.
    pub fn id(&self) -> TileId {
        self.layout.id
    }
}

/// Tile state for the image currently on screen.
///
/// Created fresh for every round and never carried over: a resize, a new
/// image or a restart all build a new `RevealRound`.
#[derive(Debug, Clone, PartialEq, Reflect)]
pub struct RevealRound {
    area: Vec2,
    hex_size: f32,
    tiles: Vec<HexTile>,
    phase: RoundPhase,
}

impl RevealRound {
    /// Solves the hex size for `target` tiles over `area`, lays out the grid
    /// and assigns a fresh reveal order.
    pub fn generate<R: Rng + ?Sized>(
        area: Vec2,
        target: u32,
        rng: &mut R,
    ) -> Result<Self, LayoutError> {
        let hex_size = optimal_hex_size(area.x, area.y, target);
        let layouts = generate_hex_grid(area.x, area.y, hex_size)?;
        Ok(Self::from_layouts(area, hex_size, layouts, rng))
    }

    /// Builds a round over already laid-out tiles; all start covered.
    pub fn from_layouts<R: Rng + ?Sized>(
        area: Vec2,
        hex_size: f32,
        layouts: Vec<TileLayout>,
        rng: &mut R,
    ) -> Self {
        let order = reveal_sequence(layouts.len(), rng);
        let tiles = layouts
            .into_iter()
            .zip(order)
            .map(|(layout, reveal_order)| HexTile {
                layout,
                reveal_order,
                revealed: false,
            })
            .collect();
        Self {
            area,
            hex_size,
            tiles,
            phase: RoundPhase::Playing,
        }
    }

    /// Image-space size the grid was laid out for.
    pub fn area(&self) -> Vec2 {
        self.area
    }

    /// Circumradius shared by every tile.
    pub fn hex_size(&self) -> f32 {
        self.hex_size
    }

    /// Tiles in grid order.
    pub fn tiles(&self) -> &[HexTile] {
        &self.tiles
    }

    /// Current phase.
    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    /// Number of revealed tiles.
    pub fn revealed_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.revealed).count()
    }

    /// Looks up a tile by id.
    pub fn tile(&self, id: TileId) -> Option<&HexTile> {
        self.tiles.iter().find(|t| t.id() == id)
    }

    /// The tile whose hexagon contains `point` (image space), if any.
    ///
    /// Hex cells are the Voronoi cells of their centers, so the nearest
    /// center wins; points farther than the circumradius from every center
    /// are outside the grid.
    pub fn tile_at(&self, point: Vec2) -> Option<&HexTile> {
        self.tiles
            .iter()
            .map(|t| (t, t.layout.center.distance_squared(point)))
            .filter(|(_, d2)| *d2 <= self.hex_size * self.hex_size)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(t, _)| t)
    }

    /// Reveals one covered tile chosen uniformly at random.
    ///
    /// Re-rolls among the remaining covered tiles on every call instead of
    /// walking the stored reveal order. Returns `None` when nothing is left.
    pub fn reveal_next<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<TileId> {
        let covered: Vec<usize> = self
            .tiles
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.revealed)
            .map(|(i, _)| i)
            .collect();
        if covered.is_empty() {
            return None;
        }
        let pick = covered[rng.random_range(0..covered.len())];
        self.tiles[pick].revealed = true;
        self.update_phase();
        Some(self.tiles[pick].id())
    }

    /// Reveals the tile `id` while the round is in play.
    ///
    /// Returns `false` (and changes nothing) if the round is already fully
    /// revealed, the tile is unknown, or it was already revealed.
    pub fn reveal_tile(&mut self, id: TileId) -> bool {
        if self.phase != RoundPhase::Playing {
            return false;
        }
        let Some(tile) = self.tiles.iter_mut().find(|t| t.layout.id == id) else {
            return false;
        };
        if tile.revealed {
            return false;
        }
        tile.revealed = true;
        self.update_phase();
        true
    }

    /// Reveals every tile and ends the round. Returns how many were covered.
    pub fn reveal_all(&mut self) -> usize {
        let mut newly = 0;
        for tile in self.tiles.iter_mut().filter(|t| !t.revealed) {
            tile.revealed = true;
            newly += 1;
        }
        self.phase = RoundPhase::Revealed;
        newly
    }

    fn update_phase(&mut self) {
        if self.tiles.iter().all(|t| t.revealed) {
            self.phase = RoundPhase::Revealed;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn is_permutation(seq: &[usize]) -> bool {
        let mut sorted = seq.to_vec();
        sorted.sort_unstable();
        sorted.iter().enumerate().all(|(i, &v)| i == v)
    }

    fn round_with(n: u32, rng: &mut StdRng) -> RevealRound {
        let layouts = (0..n)
            .map(|i| TileLayout {
                id: TileId { row: i / 5, col: i % 5 },
                center: Vec2::new((i % 5) as f32 * 100.0, (i / 5) as f32 * 100.0),
            })
            .collect();
        RevealRound::from_layouts(Vec2::splat(500.0), 50.0, layouts, rng)
    }

    // ── reveal_sequence ─────────────────────────────────────────────

    #[test]
    fn sequence_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(7);
        for n in [2, 10, 25, 50] {
            let seq = reveal_sequence(n, &mut rng);
            assert_eq!(seq.len(), n);
            assert!(is_permutation(&seq));
        }
    }

    #[test]
    fn sequence_edge_cases() {
        assert!(random_reveal_sequence(0).is_empty());
        assert_eq!(random_reveal_sequence(1), vec![0]);
        let two = random_reveal_sequence(2);
        assert!(two == vec![0, 1] || two == vec![1, 0]);
    }

    #[test]
    fn successive_sequences_are_each_valid() {
        let a = random_reveal_sequence(20);
        let b = random_reveal_sequence(20);
        assert!(is_permutation(&a));
        assert!(is_permutation(&b));
    }

    #[test]
    fn identity_never_shows_up_for_twenty_tiles() {
        let mut rng = StdRng::seed_from_u64(2024);
        let identity: Vec<usize> = (0..20).collect();
        let mut seen: HashMap<Vec<usize>, u32> = HashMap::new();
        for _ in 0..1000 {
            let seq = reveal_sequence(20, &mut rng);
            assert_ne!(seq, identity);
            *seen.entry(seq).or_default() += 1;
        }
        // 20! permutations: any repeat in 1000 draws would indicate bias.
        assert!(seen.values().all(|&c| c == 1));
    }

    #[test]
    fn small_permutations_are_uniform() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut counts: HashMap<Vec<usize>, u32> = HashMap::new();
        let draws = 6000;
        for _ in 0..draws {
            *counts.entry(reveal_sequence(3, &mut rng)).or_default() += 1;
        }
        assert_eq!(counts.len(), 6);
        // Expected 1000 each; chi-square with 5 dof stays far below 30
        // for an unbiased shuffle.
        let expected = draws as f64 / 6.0;
        let chi2: f64 = counts
            .values()
            .map(|&c| (c as f64 - expected).powi(2) / expected)
            .sum();
        assert!(chi2 < 30.0, "chi-square {chi2}");
    }

    // ── RevealRound construction ────────────────────────────────────

    #[test]
    fn new_round_starts_covered_and_playing() {
        let mut rng = StdRng::seed_from_u64(1);
        let round = round_with(25, &mut rng);
        assert_eq!(round.phase(), RoundPhase::Playing);
        assert_eq!(round.revealed_count(), 0);
        let orders: Vec<usize> = round.tiles().iter().map(|t| t.reveal_order).collect();
        assert!(is_permutation(&orders));
    }

    #[test]
    fn generate_hits_target_roughly() {
        let mut rng = StdRng::seed_from_u64(3);
        let round = RevealRound::generate(Vec2::new(1000.0, 800.0), 50, &mut rng).unwrap();
        let n = round.tiles().len();
        assert!((30..=60).contains(&n), "{n} tiles");
        assert!(round.hex_size() >= 20.0);
        assert_eq!(round.area(), Vec2::new(1000.0, 800.0));
    }

    #[test]
    fn generate_on_empty_area_has_no_tiles() {
        let mut rng = StdRng::seed_from_u64(3);
        let round = RevealRound::generate(Vec2::ZERO, 25, &mut rng).unwrap();
        assert!(round.tiles().is_empty());
    }

    // ── reveal transitions ──────────────────────────────────────────

    #[test]
    fn reveal_next_exhausts_all_tiles_without_repeats() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut round = round_with(25, &mut rng);
        let mut revealed = Vec::new();
        for i in 0..25 {
            assert_eq!(round.phase(), RoundPhase::Playing, "ended early at {i}");
            let id = round.reveal_next(&mut rng).unwrap();
            assert!(!revealed.contains(&id));
            revealed.push(id);
        }
        assert_eq!(round.phase(), RoundPhase::Revealed);
        assert!(round.tiles().iter().all(|t| t.revealed));
        assert_eq!(round.reveal_next(&mut rng), None);
    }

    #[test]
    fn reveal_all_uncovers_fresh_round_in_one_call() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut round = round_with(10, &mut rng);
        assert_eq!(round.revealed_count(), 0);
        assert_eq!(round.reveal_all(), 10);
        assert_eq!(round.phase(), RoundPhase::Revealed);
        assert!(round.tiles().iter().all(|t| t.revealed));
        assert_eq!(round.reveal_all(), 0);
    }

    #[test]
    fn reveal_all_after_partial_reveal() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut round = round_with(10, &mut rng);
        round.reveal_tile(TileId { row: 0, col: 0 });
        assert_eq!(round.reveal_all(), 9);
        assert_eq!(round.phase(), RoundPhase::Revealed);
        assert_eq!(round.revealed_count(), 10);
    }

    #[test]
    fn reveal_tile_marks_only_that_tile() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut round = round_with(10, &mut rng);
        let id = TileId { row: 1, col: 2 };
        assert!(round.reveal_tile(id));
        assert!(round.tile(id).unwrap().revealed);
        assert_eq!(round.revealed_count(), 1);
        assert!(!round.reveal_tile(id), "second reveal is a no-op");
        assert!(!round.reveal_tile(TileId { row: 9, col: 9 }));
    }

    #[test]
    fn revealing_last_tile_by_id_ends_round() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut round = round_with(3, &mut rng);
        for col in 0..3 {
            round.reveal_tile(TileId { row: 0, col });
        }
        assert_eq!(round.phase(), RoundPhase::Revealed);
    }

    #[test]
    fn reveal_tile_ignored_after_round_ends() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut round = RevealRound::from_layouts(Vec2::splat(100.0), 50.0, Vec::new(), &mut rng);
        round.reveal_all();
        assert!(!round.reveal_tile(TileId { row: 0, col: 0 }));
    }

    // ── tile_at ─────────────────────────────────────────────────────

    #[test]
    fn tile_at_picks_nearest_center() {
        let mut rng = StdRng::seed_from_u64(2);
        let round = round_with(10, &mut rng);
        let hit = round.tile_at(Vec2::new(110.0, 95.0)).unwrap();
        assert_eq!(hit.id(), TileId { row: 1, col: 1 });
    }

    #[test]
    fn tile_at_misses_far_points() {
        let mut rng = StdRng::seed_from_u64(2);
        let round = round_with(10, &mut rng);
        assert!(round.tile_at(Vec2::new(2000.0, 2000.0)).is_none());
    }

    #[test]
    fn tile_at_agrees_with_generated_centers() {
        let mut rng = StdRng::seed_from_u64(4);
        let round = RevealRound::generate(Vec2::new(900.0, 600.0), 25, &mut rng).unwrap();
        for tile in round.tiles() {
            let nudged = tile.layout.center + Vec2::splat(round.hex_size() * 0.3);
            assert_eq!(round.tile_at(nudged).unwrap().id(), tile.id());
        }
    }
}
