//! Run state and core simulation types
//!
//! Everything the render/audio collaborators read each frame lives here.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::{Bonus, BonusKind, Enemy, EntityId, Platform, PlatformKind, Player};
use super::quiz::QuizState;
use super::world::World;
use crate::clamp;
use crate::tuning::Tuning;

/// Current phase of the game flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for start
    Menu,
    /// Simulation running
    Playing,
    /// Simulation frozen
    Paused,
    /// Simulation frozen, a revival question is open
    Quiz,
    /// Run ended
    GameOver,
}

/// Why a life was lost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifeLossCause {
    /// Energy emptied by an enemy hit
    Energy,
    /// Dropped below the screen
    Fall,
}

/// Things that happened during a tick (consumed by audio/HUD/persistence)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Started,
    Paused,
    Resumed,
    Landed { kind: PlatformKind },
    EnemyHit { shielded: bool },
    BonusCollected { kind: BonusKind },
    LifeLost { cause: LifeLossCause, lives: i32 },
    QuizAnswered { correct: bool },
    Revived,
    NewHighScore(u64),
    GameOver { score: u64 },
    ReturnedToMenu,
    ExitRequested,
}

/// Hand-placed ladder at run start
const LADDER_STEPS: u32 = 10;
const LADDER_SPACING: f32 = 70.0;
const LADDER_JITTER: i32 = 90;

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Seed of the current run
    pub seed: u64,
    /// Generator, RNG and ascended distance
    pub world: World,
    pub player: Player,
    /// Insertion order: older (lower) platforms first
    pub platforms: Vec<Platform>,
    pub enemies: Vec<Enemy>,
    pub bonuses: Vec<Bonus>,
    pub phase: GamePhase,
    /// Monotonic within a run
    pub score: u64,
    /// Best score across runs
    pub high_score: u64,
    /// `high_score` as it stood when this run was laid out
    #[serde(default)]
    pub best_at_start: u64,
    /// Open question while in `Quiz`
    pub quiz: Option<QuizState>,
    /// Ticks simulated in `Playing` this run
    pub time_ticks: u64,
    /// Events emitted by the last tick
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    next_id: EntityId,
}

impl GameState {
    /// Create a state sitting at the menu with a fresh run laid out
    pub fn new(seed: u64, high_score: u64, tuning: &Tuning) -> Self {
        let player = Player::new(
            tuning.viewport.width / 2.0,
            tuning.viewport.height - 140.0,
            tuning,
        );
        let mut state = Self {
            seed,
            world: World::new(seed, tuning),
            player,
            platforms: Vec::new(),
            enemies: Vec::new(),
            bonuses: Vec::new(),
            phase: GamePhase::Menu,
            score: 0,
            high_score,
            best_at_start: high_score,
            quiz: None,
            time_ticks: 0,
            events: Vec::new(),
            next_id: 1,
        };
        state.lay_out_start(tuning);
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Throw the run away and start a new one (high score survives)
    pub fn reset(&mut self, tuning: &Tuning) {
        let seed = self.world.rng.random::<u64>();
        let events = std::mem::take(&mut self.events);
        *self = Self::new(seed, self.high_score, tuning);
        self.events = events;
        log::info!("Run reset (seed {})", seed);
    }

    /// True once this run has scored above the best it started against
    pub fn beat_best(&self) -> bool {
        self.score > self.best_at_start
    }

    /// Look up a live platform
    pub fn platform(&self, id: EntityId) -> Option<&Platform> {
        self.platforms.iter().find(|p| p.id == id)
    }

    /// Top edge of the player's safe platform, if it still exists
    pub fn safe_platform_top(&self) -> Option<f32> {
        self.player
            .safe_platform
            .and_then(|id| self.platform(id))
            .map(|p| p.top())
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Starting ladder (first step guarantees energy) plus a safety net
    fn lay_out_start(&mut self, tuning: &Tuning) {
        let t = &tuning.platforms;
        let min_x = t.x_margin;
        let max_x = tuning.viewport.width - t.width - t.x_margin;
        let base_y = tuning.viewport.height - 80.0;
        let mut prev_x = self.player.center_x() - t.width / 2.0;

        for i in 0..LADDER_STEPS {
            let kind = if i == 0 {
                PlatformKind::Solar
            } else {
                PlatformKind::Normal
            };
            let jitter = self.world.rng.random_range(-LADDER_JITTER..=LADDER_JITTER) as f32;
            let x = clamp(prev_x + jitter, min_x, max_x);
            let y = base_y - i as f32 * LADDER_SPACING;
            let id = self.next_entity_id();
            self.platforms.push(Platform::new(id, x, y, kind, tuning));
            self.world.spawn_y = y;
            prev_x = x;
        }

        let id = self.next_entity_id();
        let x = self.player.center_x() - t.width / 2.0;
        let y = self.player.bottom() + 60.0;
        self.platforms
            .push(Platform::new(id, x, y, PlatformKind::Normal, tuning));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_run_layout() {
        let tuning = Tuning::default();
        let state = GameState::new(7, 0, &tuning);
        assert_eq!(state.phase, GamePhase::Menu);
        assert_eq!(state.platforms.len(), 11);
        assert_eq!(state.platforms[0].kind, PlatformKind::Solar);
        assert!(state.platforms[1..].iter().all(|p| p.kind == PlatformKind::Normal));
        assert_eq!(state.world.spawn_y, 640.0 - 9.0 * 70.0);
        assert_eq!(state.player.lives, 2);
        assert_eq!(state.player.energy, 100.0);

        // Safety net directly beneath the player
        let net = state.platforms.last().unwrap();
        assert_eq!(net.top(), state.player.bottom() + 60.0);
        assert_eq!(net.center_x(), state.player.center_x());

        let max_x = tuning.viewport.width - tuning.platforms.width - tuning.platforms.x_margin;
        for p in &state.platforms {
            assert!(p.pos.x >= tuning.platforms.x_margin && p.pos.x <= max_x);
        }
    }

    #[test]
    fn test_same_seed_same_layout() {
        let tuning = Tuning::default();
        let a = GameState::new(42, 0, &tuning);
        let b = GameState::new(42, 0, &tuning);
        let xs = |s: &GameState| s.platforms.iter().map(|p| p.pos.x).collect::<Vec<_>>();
        assert_eq!(xs(&a), xs(&b));
    }

    #[test]
    fn test_reset_keeps_high_score() {
        let tuning = Tuning::default();
        let mut state = GameState::new(3, 50, &tuning);
        state.score = 90;
        state.high_score = 90;
        state.world.distance = 1500.0;
        state.platforms.clear();
        state.reset(&tuning);
        assert_eq!(state.score, 0);
        assert_eq!(state.high_score, 90);
        assert_eq!(state.world.distance, 0.0);
        assert_eq!(state.platforms.len(), 11);
    }

    #[test]
    fn test_safe_platform_lookup_survives_removal() {
        let tuning = Tuning::default();
        let mut state = GameState::new(3, 0, &tuning);
        let id = state.platforms[2].id;
        state.player.safe_platform = Some(id);
        assert_eq!(state.safe_platform_top(), Some(state.platforms[2].top()));
        state.platforms.retain(|p| p.id != id);
        assert_eq!(state.safe_platform_top(), None);
    }
}
