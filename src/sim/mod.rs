//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (one call to `tick` is one frame)
//! - Seeded RNG only (one `Pcg32` per run, owned by the world)
//! - Stable iteration order (insertion order, IDs never reused)
//! - No rendering, storage or platform dependencies

pub mod collision;
pub mod entity;
pub mod quiz;
pub mod state;
pub mod tick;
pub mod world;

pub use collision::Rect;
pub use entity::{
    Bonus, BonusKind, Enemy, EnemyKind, EntityId, HitOutcome, Platform, PlatformKind, Player,
    Steer,
};
pub use quiz::{QuizFeedback, QuizState};
pub use state::{GameEvent, GamePhase, GameState, LifeLossCause};
pub use tick::{TickInput, tick};
pub use world::{World, spawn_next};
