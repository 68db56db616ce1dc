//! Collision detection and response
//!
//! Axis-aligned boxes only. The interesting part is the landing rule: a
//! straddle test against the previous frame so fast falls can't tunnel
//! through 16px platforms and jumps from below pass straight through.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::{BonusKind, HitOutcome, Platform, PlatformKind, Player};
use super::state::{GameEvent, GameState};
use crate::tuning::Tuning;

/// Axis-aligned rectangle (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    pub fn left(&self) -> f32 {
        self.pos.x
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    pub fn top(&self) -> f32 {
        self.pos.y
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Overlap test; touching edges do not count
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    pub fn translated(&self, offset: Vec2) -> Rect {
        Rect::new(self.pos + offset, self.size)
    }
}

/// Landing rule: not ascending, bottom was at or above the platform top last
/// frame, and the boxes overlap now.
pub fn lands_on(prev: &Rect, now: &Rect, vel_y: f32, platform: &Rect) -> bool {
    vel_y >= 0.0 && prev.bottom() <= platform.top() && now.intersects(platform)
}

/// Land on at most one active platform. Platforms are scanned in insertion
/// order (older and lower first) and the first match wins; two overlapping
/// landing candidates in one tick do not occur with the spawn gaps in use.
pub fn resolve_landing(
    state: &mut GameState,
    tuning: &Tuning,
    speed_factor: f32,
) -> Option<PlatformKind> {
    let player = &mut state.player;
    if player.vel.y < 0.0 {
        return None;
    }
    let prev = player.prev_rect;
    let now = player.rect();
    let vel_y = player.vel.y;
    let platform = state
        .platforms
        .iter_mut()
        .find(|p| p.active && lands_on(&prev, &now, vel_y, &p.rect()))?;

    player.set_bottom(platform.top());
    player.bounce(None, tuning, speed_factor);
    player.safe_platform = Some(platform.id);
    apply_platform_effect(player, platform, tuning);

    let kind = platform.kind;
    log::debug!("Landed on {:?} #{} (energy {:.1})", kind, platform.id, player.energy);
    state.events.push(GameEvent::Landed { kind });
    Some(kind)
}

/// Kind-specific landing effect (the jump itself is already applied)
pub fn apply_platform_effect(player: &mut Player, platform: &mut Platform, tuning: &Tuning) {
    match platform.kind {
        PlatformKind::Solar | PlatformKind::Wind => {
            player.add_energy(platform.kind.energy_gain(tuning), tuning);
        }
        PlatformKind::Hydro => {
            player.add_energy(platform.kind.energy_gain(tuning), tuning);
            player.vel.y *= tuning.effects.hydro_jump_boost;
        }
        PlatformKind::Breaking => {
            platform.active = false;
            platform.fade = 1.0;
        }
        PlatformKind::Disappearing => {
            platform.active = false;
            platform.fade = tuning.platforms.disappearing_fade;
        }
        PlatformKind::Normal | PlatformKind::Moving => {}
    }
}

/// Fade triggered platforms; fully faded ones are destroyed
pub fn fade_platforms(state: &mut GameState, tuning: &Tuning) {
    let step = tuning.platforms.fade_step;
    state.platforms.retain_mut(|p| !p.fade_out(step));
}

/// Move every enemy, then resolve contact. Returns true when a hit empties
/// the player's energy (the remaining enemies are left for the next tick).
pub fn resolve_enemies(state: &mut GameState, tuning: &Tuning, speed_factor: f32) -> bool {
    let player_center_x = state.player.center_x();
    for enemy in state.enemies.iter_mut() {
        enemy.update(player_center_x, tuning, speed_factor);
        if !enemy.rect().intersects(&state.player.rect()) {
            continue;
        }

        let outcome = state.player.take_enemy_hit(tuning);
        let nudge = tuning.enemies.contact_nudge;
        enemy.pos.x += if state.world.rng.random_bool(0.5) {
            nudge
        } else {
            -nudge
        };

        match outcome {
            HitOutcome::Ignored => {}
            HitOutcome::Shielded => {
                log::debug!("Shield absorbed {:?} #{}", enemy.kind, enemy.id);
                state.events.push(GameEvent::EnemyHit { shielded: true });
            }
            HitOutcome::Damaged => {
                log::debug!(
                    "Hit by {:?} #{} (energy {:.1})",
                    enemy.kind,
                    enemy.id,
                    state.player.energy
                );
                state.events.push(GameEvent::EnemyHit { shielded: false });
                if state.player.energy <= 0.0 {
                    return true;
                }
            }
        }
    }
    false
}

/// Move every bonus, then collect the ones the player touches
pub fn collect_bonuses(state: &mut GameState, tuning: &Tuning, speed_factor: f32) {
    let player_rect = state.player.rect();
    let mut collected = Vec::new();
    state.bonuses.retain_mut(|bonus| {
        bonus.update(tuning);
        if bonus.rect().intersects(&player_rect) {
            collected.push(bonus.kind);
            false
        } else {
            true
        }
    });

    for kind in collected {
        apply_bonus(&mut state.player, kind, tuning, speed_factor);
        log::debug!("Collected {:?}", kind);
        state.events.push(GameEvent::BonusCollected { kind });
    }
}

pub fn apply_bonus(player: &mut Player, kind: BonusKind, tuning: &Tuning, speed_factor: f32) {
    match kind {
        BonusKind::Cell => player.add_energy(tuning.energy.cell, tuning),
        BonusKind::Led => player.drain_slow = tuning.led_frames(),
        BonusKind::Shield => player.shield = tuning.shield_frames(),
        BonusKind::Jetpack => player.jet = tuning.jet_frames(),
        BonusKind::Spring => {
            let power = tuning.player.jump_velocity * tuning.effects.spring_jump_multiplier;
            player.bounce(Some(power), tuning, speed_factor);
        }
    }
}

/// Hold the player at the scroll line and push the world down instead.
/// Returns the scroll amount (also added to the ascended distance).
pub fn scroll_camera(state: &mut GameState, tuning: &Tuning) -> f32 {
    let line = tuning.viewport.scroll_line();
    let top = state.player.top();
    if top >= line {
        return 0.0;
    }
    let dy = line - top;
    let offset = Vec2::new(0.0, dy);

    state.player.pos.y = line;
    state.player.prev_rect = state.player.prev_rect.translated(offset);
    for p in &mut state.platforms {
        p.pos.y += dy;
    }
    for e in &mut state.enemies {
        e.pos.y += dy;
    }
    for b in &mut state.bonuses {
        b.pos.y += dy;
    }
    state.world.spawn_y += dy;
    state.world.distance += dy;
    log::trace!("Scrolled {:.1} (distance {:.0})", dy, state.world.distance);
    dy
}

/// Destroy everything that scrolled past the bottom margin
pub fn cleanup(state: &mut GameState, tuning: &Tuning) {
    let limit = tuning.viewport.height + tuning.viewport.cleanup_margin;
    state.platforms.retain(|p| p.top() <= limit);
    state.enemies.retain(|e| e.pos.y <= limit);
    state.bonuses.retain(|b| b.pos.y <= limit);
}

/// Player dropped below the screen
pub fn fell_off(player: &Player, tuning: &Tuning) -> bool {
    player.top() > tuning.viewport.height + tuning.viewport.fall_margin
}
