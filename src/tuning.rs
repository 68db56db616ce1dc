//! Data-driven game balance
//!
//! Every gameplay constant lives here. A `Tuning` is built once at start-up
//! (defaults, or a JSON file layered over the defaults) and passed by
//! reference into the simulation.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::FPS;

/// Visible world size in pixels
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewportTuning {
    pub width: f32,
    pub height: f32,
    /// Camera holds the player's top edge at this fraction of the height
    pub scroll_trigger: f32,
    /// Entities whose top passes `height + cleanup_margin` are destroyed
    pub cleanup_margin: f32,
    /// Player whose top passes `height + fall_margin` has fallen off
    pub fall_margin: f32,
}

impl Default for ViewportTuning {
    fn default() -> Self {
        Self {
            width: 460.0,
            height: 720.0,
            scroll_trigger: 0.40,
            cleanup_margin: 120.0,
            fall_margin: 60.0,
        }
    }
}

impl ViewportTuning {
    /// Scroll trigger line in pixels from the top
    pub fn scroll_line(&self) -> f32 {
        (self.height * self.scroll_trigger).floor()
    }
}

/// Player body and movement
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlayerTuning {
    pub width: f32,
    pub height: f32,
    /// Gravity per tick (scaled by the speed factor)
    pub gravity: f32,
    /// Horizontal speed per tick (scaled by the speed factor)
    pub move_speed: f32,
    /// Jump impulse (negative is up; scaled by the speed factor)
    pub jump_velocity: f32,
    /// Vertical velocity forced while the jetpack runs
    pub jet_velocity: f32,
    /// Fastest upward velocity kept after an enemy hit
    pub hit_max_rise: f32,
    pub starting_lives: i32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            width: 50.0,
            height: 50.0,
            gravity: 0.50,
            move_speed: 6.2,
            jump_velocity: -14.0,
            jet_velocity: -9.5,
            hit_max_rise: -8.0,
            starting_lives: 2,
        }
    }
}

/// Energy economy
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EnergyTuning {
    pub initial: f32,
    pub max: f32,
    /// Drain per tick
    pub passive_drain: f32,
    /// Drain multiplier while the LED effect runs
    pub led_drain_multiplier: f32,
    pub enemy_hit_loss: f32,
    pub solar: f32,
    pub wind: f32,
    pub hydro: f32,
    pub cell: f32,
    /// Energy floor restored on quiz revival
    pub revive_floor: f32,
}

impl Default for EnergyTuning {
    fn default() -> Self {
        Self {
            initial: 100.0,
            max: 100.0,
            passive_drain: 0.048,
            led_drain_multiplier: 0.6,
            enemy_hit_loss: 22.0,
            solar: 14.0,
            wind: 7.0,
            hydro: 9.0,
            cell: 22.0,
            revive_floor: 55.0,
        }
    }
}

/// Timed effects, in seconds at the reference frame rate
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EffectTuning {
    pub led_secs: f32,
    pub shield_secs: f32,
    pub jet_secs: f32,
    pub invincible_secs: f32,
    /// Extra jump multiplier on hydro platforms
    pub hydro_jump_boost: f32,
    /// Spring bonus jump multiplier (on the unscaled base impulse)
    pub spring_jump_multiplier: f32,
}

impl Default for EffectTuning {
    fn default() -> Self {
        Self {
            led_secs: 14.0,
            shield_secs: 12.0,
            jet_secs: 2.0,
            invincible_secs: 2.0,
            hydro_jump_boost: 1.07,
            spring_jump_multiplier: 1.55,
        }
    }
}

/// Platform geometry and spawning
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlatformTuning {
    pub width: f32,
    pub height: f32,
    pub min_gap: f32,
    pub max_gap: f32,
    pub x_margin: f32,
    /// Safety valve against unbounded growth
    pub max_count: usize,
    /// How far new platforms are pulled toward the player's column
    pub player_pull: f32,
    /// Spring bonus chance on normal/moving platforms
    pub spring_chance: f32,
    pub moving_amplitude: f32,
    pub moving_phase_rate: f32,
    pub disappearing_fade: f32,
    pub fade_step: f32,
}

impl Default for PlatformTuning {
    fn default() -> Self {
        Self {
            width: 104.0,
            height: 16.0,
            min_gap: 90.0,
            max_gap: 170.0,
            x_margin: 24.0,
            max_count: 22,
            player_pull: 0.35,
            spring_chance: 0.10,
            moving_amplitude: 80.0,
            moving_phase_rate: 0.02,
            disappearing_fade: 0.85,
            fade_step: 0.06,
        }
    }
}

/// Enemy motion and spawn odds
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EnemyTuning {
    pub size: f32,
    pub base_spawn_chance: f32,
    /// Added to the spawn chance at full progress
    pub progress_spawn_chance: f32,
    pub patrol_speed: f32,
    pub sine_speed: f32,
    pub chaser_speed: f32,
    pub chaser_deadzone: f32,
    /// Horizontal nudge applied after contact
    pub contact_nudge: f32,
    pub spawn_spread: f32,
    pub spawn_lift: f32,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            size: 36.0,
            base_spawn_chance: 0.06,
            progress_spawn_chance: 0.18,
            patrol_speed: 1.3,
            sine_speed: 0.03,
            chaser_speed: 2.0,
            chaser_deadzone: 4.0,
            contact_nudge: 10.0,
            spawn_spread: 70.0,
            spawn_lift: 28.0,
        }
    }
}

/// Bonus geometry and odds
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BonusTuning {
    pub size: f32,
    pub base_chance: f32,
    pub bob_rate: f32,
    pub bob_amplitude: f32,
    pub spawn_spread: f32,
    pub min_lift: f32,
    pub max_lift: f32,
    /// Height of a spring sitting on a platform
    pub spring_lift: f32,
}

impl Default for BonusTuning {
    fn default() -> Self {
        Self {
            size: 28.0,
            base_chance: 0.22,
            bob_rate: 0.06,
            bob_amplitude: 0.5,
            spawn_spread: 28.0,
            min_lift: 20.0,
            max_lift: 40.0,
            spring_lift: 16.0,
        }
    }
}

/// Difficulty ramp and scoring
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProgressionTuning {
    /// Ascended distance at which difficulty saturates
    pub full_progress_distance: f32,
    /// Speed factor gained at full progress
    pub speed_ramp: f32,
    pub score_per_pixel: f32,
}

impl Default for ProgressionTuning {
    fn default() -> Self {
        Self {
            full_progress_distance: 4000.0,
            speed_ramp: 0.5,
            score_per_pixel: 0.06,
        }
    }
}

/// Quiz pacing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct QuizTuning {
    pub feedback_secs: f32,
    /// Autopilot answers correctly with this probability
    pub autopilot_accuracy: f32,
}

impl Default for QuizTuning {
    fn default() -> Self {
        Self {
            feedback_secs: 0.9,
            autopilot_accuracy: 0.5,
        }
    }
}

/// Complete balance table
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Tuning {
    pub viewport: ViewportTuning,
    pub player: PlayerTuning,
    pub energy: EnergyTuning,
    pub effects: EffectTuning,
    pub platforms: PlatformTuning,
    pub enemies: EnemyTuning,
    pub bonuses: BonusTuning,
    pub progression: ProgressionTuning,
    pub quiz: QuizTuning,
}

impl Tuning {
    /// Convert seconds to whole frames at the reference rate
    pub fn frames(secs: f32) -> u32 {
        (secs * FPS as f32).round().max(0.0) as u32
    }

    pub fn led_frames(&self) -> u32 {
        Self::frames(self.effects.led_secs)
    }

    pub fn shield_frames(&self) -> u32 {
        Self::frames(self.effects.shield_secs)
    }

    pub fn jet_frames(&self) -> u32 {
        Self::frames(self.effects.jet_secs)
    }

    pub fn invincible_frames(&self) -> u32 {
        Self::frames(self.effects.invincible_secs)
    }

    pub fn quiz_feedback_frames(&self) -> u32 {
        Self::frames(self.quiz.feedback_secs)
    }

    /// Parse a tuning file; missing sections keep their defaults
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str::<Self>(json).map(Self::sanitized)
    }

    /// Repair bounds the spawner samples from: inverted pairs are swapped,
    /// negative spreads zeroed and platforms squeezed inside the viewport.
    pub fn sanitized(mut self) -> Self {
        let pt = &mut self.platforms;
        if pt.min_gap > pt.max_gap {
            log::warn!(
                "Tuning: platforms.min_gap {} > max_gap {}, swapping",
                pt.min_gap,
                pt.max_gap
            );
            std::mem::swap(&mut pt.min_gap, &mut pt.max_gap);
        }
        let width = self.viewport.width.max(1.0);
        if self.viewport.width != width {
            log::warn!("Tuning: viewport.width {} raised to 1", self.viewport.width);
            self.viewport.width = width;
        }
        if !(pt.width > 0.0 && pt.width <= width) {
            log::warn!("Tuning: platforms.width {} clamped into (0, {}]", pt.width, width);
            pt.width = pt.width.max(1.0).min(width);
        }
        let max_margin = (width - pt.width) / 2.0;
        if !(pt.x_margin >= 0.0 && pt.x_margin <= max_margin) {
            log::warn!(
                "Tuning: platforms.x_margin {} clamped into [0, {}]",
                pt.x_margin,
                max_margin
            );
            pt.x_margin = pt.x_margin.max(0.0).min(max_margin);
        }

        if self.enemies.spawn_spread < 0.0 {
            log::warn!("Tuning: enemies.spawn_spread {} zeroed", self.enemies.spawn_spread);
            self.enemies.spawn_spread = 0.0;
        }
        let bt = &mut self.bonuses;
        if bt.spawn_spread < 0.0 {
            log::warn!("Tuning: bonuses.spawn_spread {} zeroed", bt.spawn_spread);
            bt.spawn_spread = 0.0;
        }
        if bt.min_lift > bt.max_lift {
            log::warn!(
                "Tuning: bonuses.min_lift {} > max_lift {}, swapping",
                bt.min_lift,
                bt.max_lift
            );
            std::mem::swap(&mut bt.min_lift, &mut bt.max_lift);
        }

        if !(self.progression.full_progress_distance > 0.0) {
            log::warn!(
                "Tuning: progression.full_progress_distance {} reset to default",
                self.progression.full_progress_distance
            );
            self.progression.full_progress_distance =
                ProgressionTuning::default().full_progress_distance;
        }
        self
    }

    /// Load tuning from disk, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path.display());
                    tuning
                }
                Err(e) => {
                    log::warn!("Malformed tuning file {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read tuning file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}
