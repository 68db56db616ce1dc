//! Eco Jump - an endless energy-saving vertical platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (world generation, physics, game flow, quiz)
//! - `platform`: Host abstraction (input translation, fixed-step scheduler)
//! - `persistence`: High score storage backends
//! - `tuning`: Data-driven game balance
//!
//! Rendering, audio and fonts are host concerns: they read `&GameState`
//! after each tick and never feed back into the simulation.

pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod quiz_bank;
pub mod sim;
pub mod tuning;

pub use highscores::HighScoreRecord;
pub use platform::Game;
pub use tuning::Tuning;

/// Fixed engine constants (everything tweakable lives in [`Tuning`])
pub mod consts {
    /// Reference simulation rate (all frame-counted timers assume this)
    pub const FPS: u32 = 60;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / FPS as f32;
    /// Maximum substeps per host frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest host frame delta fed to the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;
}

/// Clamp helper used for energy and spawn positions
#[inline]
pub fn clamp(v: f32, lo: f32, hi: f32) -> f32 {
    v.max(lo).min(hi)
}

/// Linear interpolation
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_and_lerp() {
        assert_eq!(clamp(120.0, 0.0, 100.0), 100.0);
        assert_eq!(clamp(-3.0, 0.0, 100.0), 0.0);
        assert_eq!(lerp(0.0, 10.0, 0.35), 3.5);
    }
}
