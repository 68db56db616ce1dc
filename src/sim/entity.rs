//! Entity records and their per-tick update rules
//!
//! Entities are plain tagged records (kind enum + fields). Rendering lives
//! with the host; nothing here knows how an entity is drawn.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::clamp;
use crate::tuning::Tuning;

/// Stable identifier for spawned entities
pub type EntityId = u32;

/// Discrete horizontal control for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Steer {
    Left,
    Right,
    #[default]
    None,
}

impl Steer {
    /// -1, 0 or +1
    pub fn axis(self) -> f32 {
        match self {
            Steer::Left => -1.0,
            Steer::Right => 1.0,
            Steer::None => 0.0,
        }
    }
}

/// What an enemy contact did to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Invincibility window absorbed it
    Ignored,
    /// Shield consumed
    Shielded,
    /// Energy lost
    Damaged,
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    /// Bounding box at the start of the current tick
    pub prev_rect: Rect,
    /// Always within [0, max]
    pub energy: f32,
    /// Drops to -1 on the final life loss
    pub lives: i32,
    /// Mirror of the run score
    pub score: u64,
    /// Frames of reduced drain (LED)
    pub drain_slow: u32,
    /// Frames of shield
    pub shield: u32,
    /// Frames of jetpack thrust
    pub jet: u32,
    /// Frames of damage immunity
    pub invincible: u32,
    /// Last horizontal direction (-1 or 1), for sprites
    pub facing: f32,
    /// Last platform landed on; resolved against the live set when needed
    pub safe_platform: Option<EntityId>,
}

impl Player {
    /// Create a player centred on (x, y)
    pub fn new(center_x: f32, center_y: f32, tuning: &Tuning) -> Self {
        let size = Vec2::new(tuning.player.width, tuning.player.height);
        let pos = Vec2::new(center_x, center_y) - size / 2.0;
        Self {
            pos,
            size,
            vel: Vec2::ZERO,
            prev_rect: Rect::new(pos, size),
            energy: tuning.energy.initial,
            lives: tuning.player.starting_lives,
            score: 0,
            drain_slow: 0,
            shield: 0,
            jet: 0,
            invincible: 0,
            facing: 1.0,
            safe_platform: None,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    pub fn center_x(&self) -> f32 {
        self.pos.x + self.size.x / 2.0
    }

    pub fn top(&self) -> f32 {
        self.pos.y
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Put the bottom edge at `y`
    pub fn set_bottom(&mut self, y: f32) {
        self.pos.y = y - self.size.y;
    }

    /// Add (or remove) energy, keeping it in range
    pub fn add_energy(&mut self, amount: f32, tuning: &Tuning) {
        self.energy = clamp(self.energy + amount, 0.0, tuning.energy.max);
    }

    /// Advance one tick: steering, wrap, gravity or jet, drain, timers
    pub fn update(&mut self, steer: Steer, tuning: &Tuning, speed_factor: f32) {
        self.prev_rect = self.rect();

        let dir = steer.axis();
        self.vel.x = dir * tuning.player.move_speed * speed_factor;
        if dir != 0.0 {
            self.facing = dir;
        }

        // Horizontal wrap: leaving one edge re-enters the other
        let width = tuning.viewport.width;
        self.pos.x += self.vel.x;
        if self.pos.x + self.size.x < 0.0 {
            self.pos.x = width;
        } else if self.pos.x > width {
            self.pos.x = -self.size.x;
        }

        if self.jet > 0 {
            self.vel.y = tuning.player.jet_velocity;
            self.jet -= 1;
        } else {
            self.vel.y += tuning.player.gravity * speed_factor;
        }
        self.pos.y += self.vel.y;

        let drain = if self.drain_slow > 0 {
            tuning.energy.passive_drain * tuning.energy.led_drain_multiplier
        } else {
            tuning.energy.passive_drain
        };
        self.add_energy(-drain, tuning);

        self.drain_slow = self.drain_slow.saturating_sub(1);
        self.shield = self.shield.saturating_sub(1);
        self.invincible = self.invincible.saturating_sub(1);
    }

    /// Jump. `power` overrides the default speed-scaled impulse.
    pub fn bounce(&mut self, power: Option<f32>, tuning: &Tuning, speed_factor: f32) {
        self.vel.y = power.unwrap_or(tuning.player.jump_velocity * speed_factor);
    }

    pub fn take_enemy_hit(&mut self, tuning: &Tuning) -> HitOutcome {
        if self.invincible > 0 {
            return HitOutcome::Ignored;
        }
        if self.shield > 0 {
            self.shield = 0;
            return HitOutcome::Shielded;
        }
        self.add_energy(-tuning.energy.enemy_hit_loss, tuning);
        // Cap the rise so the player drifts off the enemy instead of re-hitting
        if self.vel.y < tuning.player.hit_max_rise {
            self.vel.y = tuning.player.hit_max_rise;
        }
        HitOutcome::Damaged
    }

    /// Respawn above the safe platform (top edge `safe_top`) or mid-screen
    pub fn revive_on_safe(&mut self, safe_top: Option<f32>, tuning: &Tuning) {
        let center_y = match safe_top {
            Some(top) => top - self.size.y / 2.0 - 2.0,
            None => tuning.viewport.height / 2.0,
        };
        let center = Vec2::new(tuning.viewport.width / 2.0, center_y);
        self.pos = center - self.size / 2.0;
        self.prev_rect = self.rect();
        self.vel = Vec2::ZERO;
        self.energy = self.energy.max(tuning.energy.revive_floor);
        self.invincible = tuning.invincible_frames();
    }
}

/// Platform kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlatformKind {
    #[default]
    Normal,
    Solar,
    Wind,
    Hydro,
    Moving,
    Breaking,
    Disappearing,
}

impl PlatformKind {
    /// Energy granted on landing
    pub fn energy_gain(self, tuning: &Tuning) -> f32 {
        match self {
            PlatformKind::Solar => tuning.energy.solar,
            PlatformKind::Wind => tuning.energy.wind,
            PlatformKind::Hydro => tuning.energy.hydro,
            _ => 0.0,
        }
    }

    /// Kinds that fade away once triggered
    pub fn fades(self) -> bool {
        matches!(self, PlatformKind::Breaking | PlatformKind::Disappearing)
    }
}

/// A platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    pub id: EntityId,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub kind: PlatformKind,
    /// False once triggered; never landable again
    pub active: bool,
    /// Opacity in [0, 1]
    pub fade: f32,
    /// Oscillation phase (moving kind)
    pub phase: f32,
    /// Oscillation centre x (moving kind)
    pub anchor_x: f32,
}

impl Platform {
    pub fn new(id: EntityId, x: f32, y: f32, kind: PlatformKind, tuning: &Tuning) -> Self {
        Self {
            id,
            pos: Vec2::new(x, y),
            size: Vec2::new(tuning.platforms.width, tuning.platforms.height),
            kind,
            active: true,
            fade: 1.0,
            phase: 0.0,
            anchor_x: x,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    pub fn top(&self) -> f32 {
        self.pos.y
    }

    pub fn center_x(&self) -> f32 {
        self.pos.x + self.size.x / 2.0
    }

    pub fn update(&mut self, tuning: &Tuning, speed_factor: f32) {
        if self.kind == PlatformKind::Moving && self.active {
            self.phase += tuning.platforms.moving_phase_rate * speed_factor;
            self.pos.x = self.anchor_x + self.phase.sin() * tuning.platforms.moving_amplitude;
        }
    }

    /// Step the fade-out of a triggered platform. Returns true when gone.
    pub fn fade_out(&mut self, step: f32) -> bool {
        if self.active || !self.kind.fades() {
            return false;
        }
        self.fade = (self.fade - step).max(0.0);
        self.fade <= 0.0
    }
}

/// Enemy kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Horizontal sine patrol
    Bulb,
    /// Vertical bob
    Pipe,
    /// Slow rising cloud
    Smoke,
    /// Drifts toward the player
    Chaser,
}

/// An enemy (never destroyed by contact)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EntityId,
    pub pos: Vec2,
    pub size: Vec2,
    pub kind: EnemyKind,
    pub phase: f32,
}

impl Enemy {
    /// Create an enemy centred on (x, y)
    pub fn new(id: EntityId, center: Vec2, kind: EnemyKind, phase: f32, tuning: &Tuning) -> Self {
        let size = Vec2::splat(tuning.enemies.size);
        Self {
            id,
            pos: center - size / 2.0,
            size,
            kind,
            phase,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    pub fn center_x(&self) -> f32 {
        self.pos.x + self.size.x / 2.0
    }

    pub fn update(&mut self, player_center_x: f32, tuning: &Tuning, speed_factor: f32) {
        let t = &tuning.enemies;
        self.phase += t.sine_speed * speed_factor;
        match self.kind {
            EnemyKind::Bulb => {
                self.pos.x += self.phase.sin() * t.patrol_speed * 1.4 * speed_factor;
            }
            EnemyKind::Pipe => {
                self.pos.y += (self.phase * 0.9).sin() * speed_factor;
            }
            EnemyKind::Smoke => {
                self.pos.y += (-0.5 + self.phase.sin() * 0.25) * speed_factor;
            }
            EnemyKind::Chaser => {
                let dx = player_center_x - self.center_x();
                if dx.abs() > t.chaser_deadzone {
                    self.pos.x += dx.signum() * t.chaser_speed * speed_factor;
                }
                self.pos.y += self.phase.sin() * 0.6 * speed_factor;
            }
        }
    }
}

/// Bonus kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BonusKind {
    /// Instant energy
    Cell,
    /// Reduced drain for a while
    Led,
    /// Absorbs one enemy hit
    Shield,
    /// Sustained thrust
    Jetpack,
    /// Instant strong jump
    Spring,
}

/// A collectible bonus
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bonus {
    pub id: EntityId,
    pub pos: Vec2,
    pub size: Vec2,
    pub kind: BonusKind,
    pub phase: f32,
}

impl Bonus {
    /// Create a bonus centred on (x, y)
    pub fn new(id: EntityId, center: Vec2, kind: BonusKind, phase: f32, tuning: &Tuning) -> Self {
        let size = Vec2::splat(tuning.bonuses.size);
        Self {
            id,
            pos: center - size / 2.0,
            size,
            kind,
            phase,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    pub fn update(&mut self, tuning: &Tuning) {
        self.phase += tuning.bonuses.bob_rate;
        self.pos.y += self.phase.sin() * tuning.bonuses.bob_amplitude;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn player() -> (Player, Tuning) {
        let tuning = Tuning::default();
        (Player::new(230.0, 580.0, &tuning), tuning)
    }

    #[test]
    fn test_player_drain_and_led() {
        let (mut p, tuning) = player();
        p.update(Steer::None, &tuning, 1.0);
        assert!((p.energy - (100.0 - 0.048)).abs() < 1e-4);

        p.energy = 50.0;
        p.drain_slow = 10;
        p.update(Steer::None, &tuning, 1.0);
        assert!((p.energy - (50.0 - 0.048 * 0.6)).abs() < 1e-4);
        assert_eq!(p.drain_slow, 9);
    }

    #[test]
    fn test_player_horizontal_speed_scaled_once() {
        let (mut p, tuning) = player();
        let x0 = p.pos.x;
        p.update(Steer::Right, &tuning, 1.5);
        assert!((p.pos.x - (x0 + 6.2 * 1.5)).abs() < 1e-4);
        assert_eq!(p.facing, 1.0);
    }

    #[test]
    fn test_player_wraps_horizontally() {
        let (mut p, tuning) = player();
        p.pos.x = -p.size.x + 1.0;
        p.update(Steer::Left, &tuning, 1.0);
        assert_eq!(p.pos.x, tuning.viewport.width);

        p.pos.x = tuning.viewport.width - 1.0;
        p.update(Steer::Right, &tuning, 1.0);
        assert_eq!(p.pos.x, -p.size.x);
    }

    #[test]
    fn test_jet_overrides_gravity() {
        let (mut p, tuning) = player();
        p.jet = 2;
        p.vel.y = 5.0;
        p.update(Steer::None, &tuning, 1.0);
        assert_eq!(p.vel.y, -9.5);
        assert_eq!(p.jet, 1);
        p.update(Steer::None, &tuning, 1.0);
        p.update(Steer::None, &tuning, 1.0);
        assert_eq!(p.jet, 0);
        assert_eq!(p.vel.y, -9.5 + 0.5);
    }

    #[test]
    fn test_gravity_scales_with_speed() {
        let (mut p, tuning) = player();
        p.update(Steer::None, &tuning, 1.5);
        assert!((p.vel.y - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_shield_absorbs_hit() {
        let (mut p, tuning) = player();
        p.shield = 300;
        p.energy = 40.0;
        assert_eq!(p.take_enemy_hit(&tuning), HitOutcome::Shielded);
        assert_eq!(p.shield, 0);
        assert_eq!(p.energy, 40.0);
    }

    #[test]
    fn test_hit_clamps_energy_and_rise() {
        let (mut p, tuning) = player();
        p.energy = 5.0;
        p.vel.y = -14.0;
        assert_eq!(p.take_enemy_hit(&tuning), HitOutcome::Damaged);
        assert_eq!(p.energy, 0.0);
        assert_eq!(p.vel.y, -8.0);
    }

    #[test]
    fn test_invincible_ignores_hit() {
        let (mut p, tuning) = player();
        p.invincible = 3;
        p.shield = 3;
        assert_eq!(p.take_enemy_hit(&tuning), HitOutcome::Ignored);
        assert_eq!(p.shield, 3);
        assert_eq!(p.energy, 100.0);
    }

    #[test]
    fn test_revive_positions_and_restores() {
        let (mut p, tuning) = player();
        p.energy = 0.0;
        p.vel = Vec2::new(3.0, 9.0);
        p.revive_on_safe(Some(400.0), &tuning);
        assert_eq!(p.bottom(), 398.0);
        assert_eq!(p.center_x(), 230.0);
        assert_eq!(p.vel, Vec2::ZERO);
        assert_eq!(p.energy, 55.0);
        assert_eq!(p.invincible, 120);

        p.energy = 80.0;
        p.revive_on_safe(None, &tuning);
        assert_eq!(p.pos.y + p.size.y / 2.0, 360.0);
        assert_eq!(p.energy, 80.0);
    }

    #[test]
    fn test_moving_platform_oscillates_around_anchor() {
        let tuning = Tuning::default();
        let mut platform = Platform::new(1, 100.0, 300.0, PlatformKind::Moving, &tuning);
        for _ in 0..200 {
            platform.update(&tuning, 1.5);
            assert!((platform.pos.x - 100.0).abs() <= 80.0 + 1e-3);
            assert_eq!(platform.pos.y, 300.0);
        }

        let mut still = Platform::new(2, 100.0, 300.0, PlatformKind::Solar, &tuning);
        still.update(&tuning, 1.0);
        assert_eq!(still.pos.x, 100.0);
    }

    #[test]
    fn test_chaser_moves_toward_player() {
        let tuning = Tuning::default();
        let mut enemy = Enemy::new(1, Vec2::new(100.0, 100.0), EnemyKind::Chaser, 0.0, &tuning);
        enemy.update(300.0, &tuning, 1.0);
        assert_eq!(enemy.center_x(), 102.0);
        enemy.update(102.0, &tuning, 1.0);
        assert_eq!(enemy.center_x(), 102.0);
    }

    #[test]
    fn test_smoke_drifts_up() {
        let tuning = Tuning::default();
        let mut enemy = Enemy::new(1, Vec2::new(100.0, 100.0), EnemyKind::Smoke, 0.0, &tuning);
        let y0 = enemy.pos.y;
        for _ in 0..60 {
            enemy.update(0.0, &tuning, 1.0);
        }
        assert!(enemy.pos.y < y0);
    }

    #[test]
    fn test_bonus_bobs_in_place() {
        let tuning = Tuning::default();
        let mut bonus = Bonus::new(1, Vec2::new(50.0, 50.0), BonusKind::Cell, 0.0, &tuning);
        let x0 = bonus.pos.x;
        for _ in 0..100 {
            bonus.update(&tuning);
            assert_eq!(bonus.pos.x, x0);
            assert!((bonus.pos.y - 36.0).abs() < 20.0);
        }
    }

    proptest! {
        #[test]
        fn prop_energy_stays_in_range(
            start in 0.0f32..=100.0,
            deltas in prop::collection::vec(-60.0f32..60.0, 0..50),
        ) {
            let (mut p, tuning) = player();
            p.energy = start;
            for d in deltas {
                p.add_energy(d, &tuning);
                prop_assert!((0.0..=100.0).contains(&p.energy));
                p.update(Steer::None, &tuning, 1.0);
                prop_assert!((0.0..=100.0).contains(&p.energy));
            }
        }
    }
}
