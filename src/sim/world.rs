//! Endless world generation and difficulty progression
//!
//! All randomness for a run flows through the world's `Pcg32`. Every weighted
//! choice reads the progress factor, so the mix of platforms, enemies and
//! bonuses shifts as the player climbs.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{Bonus, BonusKind, Enemy, EnemyKind, EntityId, Platform, PlatformKind};
use super::state::GameState;
use crate::tuning::Tuning;
use crate::{clamp, lerp};

/// Upper bound for a fresh moving-platform phase
const PLATFORM_PHASE_RANGE: f32 = 10.0;
/// Upper bound for a fresh enemy/bonus phase
const SPRITE_PHASE_RANGE: f32 = 6.28;

/// Generator state for one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    /// Spawn frontier: y of the most recently spawned platform (screen space)
    pub spawn_y: f32,
    /// Cumulative ascended distance in pixels
    pub distance: f32,
    /// Shared random source for the whole run
    pub rng: Pcg32,
}

impl World {
    pub fn new(seed: u64, tuning: &Tuning) -> Self {
        Self {
            spawn_y: tuning.viewport.height - 120.0,
            distance: 0.0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Difficulty in [0, 1], saturating at the full-progress distance
    pub fn progress_factor(&self, tuning: &Tuning) -> f32 {
        progress_for_distance(self.distance, tuning)
    }

    /// Multiplier for gravity, movement, enemy speed and oscillation
    pub fn speed_factor(&self, tuning: &Tuning) -> f32 {
        1.0 + tuning.progression.speed_ramp * self.progress_factor(tuning)
    }

    /// Uniform draw in [0, 1)
    pub fn roll(&mut self) -> f32 {
        self.rng.random::<f32>()
    }

    pub fn choose_platform_type(&mut self, tuning: &Tuning) -> PlatformKind {
        let p = self.progress_factor(tuning);
        let r = self.roll();
        platform_kind_for_roll(r, p)
    }

    pub fn enemy_spawn_chance(&self, tuning: &Tuning) -> f32 {
        tuning.enemies.base_spawn_chance
            + self.progress_factor(tuning) * tuning.enemies.progress_spawn_chance
    }

    /// Presence draw, then kind draw
    pub fn choose_enemy(&mut self, tuning: &Tuning) -> Option<EnemyKind> {
        if self.roll() < self.enemy_spawn_chance(tuning) {
            let r = self.roll();
            Some(enemy_kind_for_roll(r))
        } else {
            None
        }
    }

    /// Presence draw, then a progress-weighted kind draw
    pub fn choose_bonus(&mut self, tuning: &Tuning) -> Option<BonusKind> {
        if self.roll() < tuning.bonuses.base_chance {
            let p = self.progress_factor(tuning);
            let r = self.roll();
            Some(bonus_kind_for_roll(r, p))
        } else {
            None
        }
    }
}

/// `clamp(distance / full_progress_distance, 0, 1)`
pub fn progress_for_distance(distance: f32, tuning: &Tuning) -> f32 {
    clamp(
        distance / tuning.progression.full_progress_distance,
        0.0,
        1.0,
    )
}

/// Cumulative bands; energy kinds shrink as `progress` grows
pub fn platform_kind_for_roll(r: f32, progress: f32) -> PlatformKind {
    let p = progress;
    if r < 0.24 - 0.08 * p {
        PlatformKind::Solar
    } else if r < 0.44 - 0.08 * p {
        PlatformKind::Wind
    } else if r < 0.60 - 0.06 * p {
        PlatformKind::Hydro
    } else if r < 0.78 - 0.08 * p {
        PlatformKind::Normal
    } else if r < 0.88 {
        PlatformKind::Moving
    } else if r < 0.94 {
        PlatformKind::Disappearing
    } else {
        PlatformKind::Breaking
    }
}

pub fn enemy_kind_for_roll(r: f32) -> EnemyKind {
    if r < 0.40 {
        EnemyKind::Bulb
    } else if r < 0.70 {
        EnemyKind::Pipe
    } else if r < 0.85 {
        EnemyKind::Smoke
    } else {
        EnemyKind::Chaser
    }
}

/// Early runs favour cells; later runs the stronger kinds
pub fn bonus_kind_for_roll(r: f32, progress: f32) -> BonusKind {
    if r < 0.40 - 0.15 * progress {
        BonusKind::Cell
    } else if r < 0.60 {
        BonusKind::Led
    } else if r < 0.80 {
        BonusKind::Shield
    } else if r < 0.93 {
        BonusKind::Jetpack
    } else {
        BonusKind::Spring
    }
}

/// Spawn platforms (with their enemies and bonuses) until the frontier is a
/// full screen above the viewport, then enforce the platform cap.
pub fn spawn_next(state: &mut GameState, tuning: &Tuning) {
    let speed = state.world.speed_factor(tuning);
    let pt = &tuning.platforms;
    let min_x = pt.x_margin;
    let max_x = (tuning.viewport.width - pt.width - pt.x_margin).max(min_x);
    let min_gap = ((pt.min_gap / speed) as i32).max(1);
    let max_gap = ((pt.max_gap / speed) as i32).max(min_gap);
    let mut spawned = 0usize;

    while state.world.spawn_y > -tuning.viewport.height {
        let gap = state.world.rng.random_range(min_gap..=max_gap);
        state.world.spawn_y -= gap as f32;

        let kind = state.world.choose_platform_type(tuning);
        let x = state.world.rng.random_range(min_x as i32..=max_x as i32) as f32;
        let toward_player = state.player.center_x() - pt.width / 2.0;
        let x = clamp(lerp(x, toward_player, pt.player_pull).trunc(), min_x, max_x);

        let id = state.next_entity_id();
        let mut platform = Platform::new(id, x, state.world.spawn_y, kind, tuning);
        platform.phase = state.world.roll() * PLATFORM_PHASE_RANGE;
        let center_x = platform.center_x();
        let top = platform.top();
        state.platforms.push(platform);
        spawned += 1;

        // Spring sitting on a plain platform
        if matches!(kind, PlatformKind::Normal | PlatformKind::Moving)
            && state.world.roll() < pt.spring_chance
        {
            let id = state.next_entity_id();
            let phase = state.world.roll() * SPRITE_PHASE_RANGE;
            let center = Vec2::new(center_x, top - tuning.bonuses.spring_lift);
            state
                .bonuses
                .push(Bonus::new(id, center, BonusKind::Spring, phase, tuning));
        }

        if let Some(enemy_kind) = state.world.choose_enemy(tuning) {
            let et = &tuning.enemies;
            let spread = (et.spawn_spread as i32).abs();
            let dx = state.world.rng.random_range(-spread..=spread) as f32;
            let id = state.next_entity_id();
            let phase = state.world.roll() * SPRITE_PHASE_RANGE;
            let center = Vec2::new(center_x + dx, top - et.spawn_lift);
            state
                .enemies
                .push(Enemy::new(id, center, enemy_kind, phase, tuning));
        }

        if let Some(bonus_kind) = state.world.choose_bonus(tuning) {
            let bt = &tuning.bonuses;
            let spread = (bt.spawn_spread as i32).abs();
            let dx = state.world.rng.random_range(-spread..=spread) as f32;
            let (lo, hi) = (bt.min_lift as i32, bt.max_lift as i32);
            let lift = state.world.rng.random_range(lo.min(hi)..=lo.max(hi)) as f32;
            let id = state.next_entity_id();
            let phase = state.world.roll() * SPRITE_PHASE_RANGE;
            let center = Vec2::new(center_x + dx, top - lift);
            state
                .bonuses
                .push(Bonus::new(id, center, bonus_kind, phase, tuning));
        }
    }

    if spawned > 0 {
        log::debug!(
            "Spawned {} platforms (frontier {:.0}, speed {:.2})",
            spawned,
            state.world.spawn_y,
            speed
        );
    }

    enforce_platform_cap(state, tuning);
}

/// Drop the lowest platforms beyond the cap
pub fn enforce_platform_cap(state: &mut GameState, tuning: &Tuning) {
    let cap = tuning.platforms.max_count;
    if state.platforms.len() <= cap {
        return;
    }
    let excess = state.platforms.len() - cap;
    // Lowest (largest y) first; stable sort keeps insertion order on ties
    let mut by_depth: Vec<(f32, EntityId)> =
        state.platforms.iter().map(|p| (p.top(), p.id)).collect();
    by_depth.sort_by(|a, b| b.0.total_cmp(&a.0));
    let doomed: Vec<EntityId> = by_depth.iter().take(excess).map(|&(_, id)| id).collect();
    state.platforms.retain(|p| !doomed.contains(&p.id));
    log::debug!("Platform cap trimmed {} platforms", excess);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world_at(distance: f32) -> (World, Tuning) {
        let tuning = Tuning::default();
        let mut world = World::new(1, &tuning);
        world.distance = distance;
        (world, tuning)
    }

    #[test]
    fn test_progress_and_speed_at_start() {
        let (world, tuning) = world_at(0.0);
        assert_eq!(world.progress_factor(&tuning), 0.0);
        assert_eq!(world.speed_factor(&tuning), 1.0);
    }

    #[test]
    fn test_progress_saturates() {
        let (world, tuning) = world_at(4000.0);
        assert_eq!(world.progress_factor(&tuning), 1.0);
        assert_eq!(world.speed_factor(&tuning), 1.5);

        let (world, tuning) = world_at(12000.0);
        assert_eq!(world.progress_factor(&tuning), 1.0);

        let (world, tuning) = world_at(2000.0);
        assert_eq!(world.progress_factor(&tuning), 0.5);
        assert_eq!(world.speed_factor(&tuning), 1.25);
    }

    #[test]
    fn test_solar_band_at_start() {
        assert_eq!(platform_kind_for_roll(0.0, 0.0), PlatformKind::Solar);
        assert_eq!(platform_kind_for_roll(0.239, 0.0), PlatformKind::Solar);
        assert_eq!(platform_kind_for_roll(0.241, 0.0), PlatformKind::Wind);
    }

    #[test]
    fn test_solar_band_shrinks_at_full_progress() {
        assert_eq!(platform_kind_for_roll(0.155, 1.0), PlatformKind::Solar);
        assert_eq!(platform_kind_for_roll(0.165, 1.0), PlatformKind::Wind);
    }

    #[test]
    fn test_platform_band_order() {
        let p = 0.0;
        assert_eq!(platform_kind_for_roll(0.43, p), PlatformKind::Wind);
        assert_eq!(platform_kind_for_roll(0.50, p), PlatformKind::Hydro);
        assert_eq!(platform_kind_for_roll(0.70, p), PlatformKind::Normal);
        assert_eq!(platform_kind_for_roll(0.80, p), PlatformKind::Moving);
        assert_eq!(platform_kind_for_roll(0.90, p), PlatformKind::Disappearing);
        assert_eq!(platform_kind_for_roll(0.97, p), PlatformKind::Breaking);
        // The tail does not move with progress
        assert_eq!(platform_kind_for_roll(0.75, 1.0), PlatformKind::Moving);
    }

    #[test]
    fn test_enemy_bands() {
        assert_eq!(enemy_kind_for_roll(0.1), EnemyKind::Bulb);
        assert_eq!(enemy_kind_for_roll(0.5), EnemyKind::Pipe);
        assert_eq!(enemy_kind_for_roll(0.8), EnemyKind::Smoke);
        assert_eq!(enemy_kind_for_roll(0.9), EnemyKind::Chaser);
    }

    #[test]
    fn test_enemy_chance_ramps() {
        let (world, tuning) = world_at(0.0);
        assert!((world.enemy_spawn_chance(&tuning) - 0.06).abs() < 1e-6);
        let (world, tuning) = world_at(4000.0);
        assert!((world.enemy_spawn_chance(&tuning) - 0.24).abs() < 1e-6);
    }

    #[test]
    fn test_bonus_bands_shift_toward_stronger_kinds() {
        assert_eq!(bonus_kind_for_roll(0.30, 0.0), BonusKind::Cell);
        assert_eq!(bonus_kind_for_roll(0.30, 1.0), BonusKind::Led);
        assert_eq!(bonus_kind_for_roll(0.70, 0.5), BonusKind::Shield);
        assert_eq!(bonus_kind_for_roll(0.90, 0.5), BonusKind::Jetpack);
        assert_eq!(bonus_kind_for_roll(0.95, 0.5), BonusKind::Spring);
    }

    #[test]
    fn test_spawn_fills_to_frontier() {
        let tuning = Tuning::default();
        let mut state = GameState::new(11, 0, &tuning);
        spawn_next(&mut state, &tuning);
        assert!(state.world.spawn_y <= -tuning.viewport.height);
        assert!(state.platforms.len() <= tuning.platforms.max_count);

        let max_x = tuning.viewport.width - tuning.platforms.width - tuning.platforms.x_margin;
        for p in &state.platforms {
            assert!(p.pos.x >= tuning.platforms.x_margin && p.pos.x <= max_x);
        }
    }

    #[test]
    fn test_spawn_gaps_within_bounds() {
        let tuning = Tuning::default();
        let mut state = GameState::new(5, 0, &tuning);
        state.platforms.clear();
        spawn_next(&mut state, &tuning);
        let mut tops: Vec<f32> = state.platforms.iter().map(|p| p.top()).collect();
        tops.sort_by(|a, b| b.total_cmp(a));
        for pair in tops.windows(2) {
            let gap = pair[0] - pair[1];
            assert!((90.0..=170.0).contains(&gap), "gap {}", gap);
        }
    }

    fn assert_bonus_lifts(state: &GameState, tuning: &Tuning, lifts: std::ops::RangeInclusive<f32>) {
        assert!(!state.bonuses.is_empty());
        for b in &state.bonuses {
            let center_y = b.pos.y + b.size.y / 2.0;
            let sits_on_one = state.platforms.iter().any(|p| {
                let lift = p.top() - center_y;
                lifts.contains(&lift) || lift == tuning.bonuses.spring_lift
            });
            assert!(sits_on_one, "bonus {:?} floats free", b);
        }
    }

    #[test]
    fn test_spawn_with_inverted_lift_file() {
        let tuning =
            Tuning::from_json(r#"{"bonuses": {"min_lift": 50, "base_chance": 1.0}}"#).unwrap();
        let mut state = GameState::new(3, 0, &tuning);
        spawn_next(&mut state, &tuning);
        assert!(state.world.spawn_y <= -tuning.viewport.height);
        assert_bonus_lifts(&state, &tuning, 40.0..=50.0);
    }

    #[test]
    fn test_spawn_survives_unsanitized_bounds() {
        let mut tuning = Tuning::default();
        tuning.bonuses.base_chance = 1.0;
        tuning.bonuses.min_lift = 50.0;
        tuning.bonuses.max_lift = 30.0;
        tuning.bonuses.spawn_spread = -28.0;
        tuning.enemies.base_spawn_chance = 1.0;
        tuning.enemies.spawn_spread = -70.0;
        tuning.platforms.x_margin = 300.0;
        let mut state = GameState::new(8, 0, &tuning);
        state.platforms.clear();
        spawn_next(&mut state, &tuning);
        assert!(state.world.spawn_y <= -tuning.viewport.height);
        assert!(!state.enemies.is_empty());
        assert!(state.platforms.iter().all(|p| p.pos.x == 300.0));
        assert_bonus_lifts(&state, &tuning, 30.0..=50.0);
    }

    #[test]
    fn test_cap_removes_lowest() {
        let tuning = Tuning::default();
        let mut state = GameState::new(5, 0, &tuning);
        state.platforms.clear();
        for i in 0..30 {
            let id = state.next_entity_id();
            let y = 700.0 - i as f32 * 40.0;
            state
                .platforms
                .push(Platform::new(id, 100.0, y, PlatformKind::Normal, &tuning));
        }
        enforce_platform_cap(&mut state, &tuning);
        assert_eq!(state.platforms.len(), 22);
        let lowest = state
            .platforms
            .iter()
            .map(|p| p.top())
            .fold(f32::MIN, f32::max);
        assert_eq!(lowest, 700.0 - 8.0 * 40.0);
    }
}
