//! Platform abstraction layer
//!
//! Handles host differences for:
//! - Time/ticks (`FixedStep`)
//! - Input events (`InputState`)
//! - Storage (any `ScoreStore`)
//!
//! A native loop calls [`Game::tick`] at the reference rate; a browser calls
//! [`Game::frame`] from `requestAnimationFrame`. The simulation never knows
//! which.

pub mod input;
pub mod time;

pub use input::{InputState, Key};
pub use time::FixedStep;

use crate::persistence::ScoreStore;
use crate::quiz_bank::{QUESTIONS, Question};
use crate::sim::{GameEvent, GameState, tick};
use crate::tuning::Tuning;

/// Scheduler owning one game session
pub struct Game {
    state: GameState,
    tuning: Tuning,
    questions: &'static [Question],
    input: InputState,
    clock: FixedStep,
    store: Box<dyn ScoreStore>,
    /// Events from every tick of the last `frame` call
    frame_events: Vec<GameEvent>,
}

impl Game {
    /// New session at the menu; the high score comes from `store`
    pub fn new(seed: u64, tuning: Tuning, store: Box<dyn ScoreStore>) -> Self {
        let high_score = store.load();
        log::info!("Game initialized with seed {} (high score {})", seed, high_score);
        Self {
            state: GameState::new(seed, high_score, &tuning),
            tuning,
            questions: &QUESTIONS,
            input: InputState::new(),
            clock: FixedStep::new(),
            store,
            frame_events: Vec::new(),
        }
    }

    /// Swap in another question bank
    pub fn with_questions(mut self, questions: &'static [Question]) -> Self {
        self.questions = questions;
        self
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn questions(&self) -> &'static [Question] {
        self.questions
    }

    pub fn store(&self) -> &dyn ScoreStore {
        self.store.as_ref()
    }

    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    pub fn set_idle_mode(&mut self, on: bool) {
        self.input.idle_mode = on;
    }

    /// Run exactly one simulation tick and persist what it changed
    pub fn tick(&mut self) -> &[GameEvent] {
        let input = self.input.take_tick_input(self.tuning.viewport.width);
        tick(&mut self.state, &input, &self.tuning, self.questions);
        self.persist();
        &self.state.events
    }

    /// Run as many ticks as the elapsed host time allows
    pub fn frame(&mut self, dt: f32) -> u32 {
        self.frame_events.clear();
        let steps = self.clock.advance(dt);
        for _ in 0..steps {
            self.tick();
            self.frame_events.extend_from_slice(&self.state.events);
        }
        steps
    }

    pub fn frame_events(&self) -> &[GameEvent] {
        &self.frame_events
    }

    /// Leftover fraction of a tick since the last `frame`
    pub fn alpha(&self) -> f32 {
        self.clock.alpha()
    }

    /// At most one write per tick
    fn persist(&mut self) {
        let dirty = self
            .state
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::NewHighScore(_) | GameEvent::GameOver { .. }));
        if dirty {
            self.store.save(self.state.high_score);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::persistence::MemoryStore;
    use crate::sim::GamePhase;

    fn game(stored: u64) -> Game {
        Game::new(4, Tuning::default(), Box::new(MemoryStore::with_value(stored)))
    }

    #[test]
    fn test_loads_stored_high_score() {
        let game = game(321);
        assert_eq!(game.state().high_score, 321);
        assert_eq!(game.state().phase, GamePhase::Menu);
    }

    #[test]
    fn test_tick_consumes_input() {
        let mut game = game(0);
        game.input_mut().key_down(Key::Confirm);
        assert_eq!(game.tick(), &[GameEvent::Started]);
        assert_eq!(game.state().phase, GamePhase::Playing);
        assert!(game.tick().iter().all(|e| *e != GameEvent::Started));
    }

    #[test]
    fn test_frame_runs_accumulated_ticks() {
        let mut game = game(0);
        game.input_mut().key_down(Key::Confirm);
        assert_eq!(game.frame(SIM_DT / 2.0), 0);
        assert_eq!(game.state().phase, GamePhase::Menu);
        assert_eq!(game.frame(SIM_DT / 2.0), 1);
        assert_eq!(game.frame_events(), &[GameEvent::Started]);

        let steps = game.frame(SIM_DT * 3.0);
        assert!((2..=3).contains(&steps), "{steps}");
        assert_eq!(game.state().time_ticks, steps as u64);
    }

    #[test]
    fn test_new_high_score_is_persisted() {
        let mut game = game(0);
        game.input_mut().key_down(Key::Confirm);
        game.tick();
        game.state.world.distance = 1000.0;
        game.tick();
        let best = game.state().high_score;
        assert!(best > 0);
        assert_eq!(game.store().load(), best);
    }

    #[test]
    fn test_stored_score_survives_worse_run() {
        let mut game = game(1_000_000);
        game.set_idle_mode(true);
        for _ in 0..3_000 {
            game.tick();
        }
        assert!(game.state().score < 1_000_000);
        assert_eq!(game.state().high_score, 1_000_000);
        assert_eq!(game.store().load(), 1_000_000);
    }

    #[test]
    fn test_empty_bank_is_game_over_on_first_loss() {
        static NO_QUESTIONS: [Question; 0] = [];
        let mut game = game(0).with_questions(&NO_QUESTIONS);
        game.input_mut().key_down(Key::Confirm);
        game.tick();
        game.state.player.pos.y = 2000.0;
        game.tick();
        assert_eq!(game.state().phase, GamePhase::GameOver);
        assert_eq!(game.state().player.lives, 1);
    }
}
