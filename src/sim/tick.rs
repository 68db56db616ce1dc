//! Fixed timestep simulation tick
//!
//! Game flow controller: phase transitions, one play step, life loss and
//! revival, scoring, and the demo autopilot.

use rand::Rng;

use super::collision::{
    cleanup, collect_bonuses, fade_platforms, fell_off, resolve_enemies, resolve_landing,
    scroll_camera,
};
use super::entity::Steer;
use super::quiz::{OPTION_COUNT, QuizState};
use super::state::{GameEvent, GamePhase, GameState, LifeLossCause};
use super::world::spawn_next;
use crate::quiz_bank::Question;
use crate::tuning::Tuning;

/// Autopilot stops steering when this close to its target column
const AUTOPILOT_DEADZONE: f32 = 6.0;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held direction (keyboard)
    pub steer: Steer,
    /// Held pointer/touch column; overrides `steer` while present
    pub pointer_x: Option<f32>,
    /// Pointer pressed this tick (advances menu/pause/game over)
    pub tap: bool,
    /// Quiz cursor up
    pub up: bool,
    /// Quiz cursor down
    pub down: bool,
    /// Start, resume, answer, leave game over
    pub confirm: bool,
    /// Pause while playing, resume while paused, exit from the menu
    pub back: bool,
    /// Pause toggle
    pub pause: bool,
    /// Quit to menu while paused
    pub quit: bool,
    /// Pick a quiz option directly
    pub choice: Option<usize>,
    /// Idle/demo mode - autopilot plays the game
    pub idle_mode: bool,
}

impl TickInput {
    /// Effective steering: a held pointer steers toward its half of the screen
    pub fn steer_for(&self, width: f32) -> Steer {
        match self.pointer_x {
            Some(x) if x.is_finite() => {
                if x.clamp(0.0, width) < width / 2.0 {
                    Steer::Left
                } else {
                    Steer::Right
                }
            }
            _ => self.steer,
        }
    }

    fn advance(&self) -> bool {
        self.confirm || self.tap
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, tuning: &Tuning, questions: &[Question]) {
    state.events.clear();

    let mut input = input.clone();
    if input.idle_mode {
        autopilot(state, &mut input, tuning, questions);
    }
    let input = &input;

    match state.phase {
        GamePhase::Menu => {
            if input.advance() {
                state.phase = GamePhase::Playing;
                log::info!("Run started (seed {})", state.seed);
                state.emit(GameEvent::Started);
            } else if input.back {
                state.emit(GameEvent::ExitRequested);
            }
        }
        GamePhase::Paused => {
            if input.quit {
                state.reset(tuning);
                state.emit(GameEvent::ReturnedToMenu);
            } else if input.back || input.pause || input.advance() {
                state.phase = GamePhase::Playing;
                log::info!("Resumed");
                state.emit(GameEvent::Resumed);
            }
        }
        GamePhase::GameOver => {
            if input.advance() {
                state.reset(tuning);
                state.emit(GameEvent::ReturnedToMenu);
            }
        }
        GamePhase::Quiz => tick_quiz(state, input, tuning, questions),
        GamePhase::Playing => {
            if input.back || input.pause {
                state.phase = GamePhase::Paused;
                log::info!("Paused at tick {}", state.time_ticks);
                state.emit(GameEvent::Paused);
            } else {
                tick_play(state, input, tuning, questions);
            }
        }
    }
}

/// One step of the running simulation
fn tick_play(state: &mut GameState, input: &TickInput, tuning: &Tuning, questions: &[Question]) {
    state.time_ticks += 1;
    let speed = state.world.speed_factor(tuning);

    for platform in &mut state.platforms {
        platform.update(tuning, speed);
    }
    let steer = input.steer_for(tuning.viewport.width);
    state.player.update(steer, tuning, speed);

    scroll_camera(state, tuning);
    update_score(state, tuning);
    spawn_next(state, tuning);

    resolve_landing(state, tuning, speed);
    fade_platforms(state, tuning);

    if resolve_enemies(state, tuning, speed) {
        lose_life(state, LifeLossCause::Energy, tuning, questions);
        return;
    }
    collect_bonuses(state, tuning, speed);
    cleanup(state, tuning);

    if fell_off(&state.player, tuning) {
        state.player.energy = 0.0;
        lose_life(state, LifeLossCause::Fall, tuning, questions);
    }

    debug_assert!((0.0..=tuning.energy.max).contains(&state.player.energy));
}

fn tick_quiz(state: &mut GameState, input: &TickInput, tuning: &Tuning, questions: &[Question]) {
    let Some(quiz) = state.quiz.as_mut() else {
        log::warn!("Quiz phase without an open question");
        game_over(state, tuning);
        return;
    };

    // Feedback window: input is ignored until the verdict lands
    if quiz.is_answered() {
        if let Some(correct) = quiz.update() {
            resolve_quiz(state, correct, tuning);
        }
        return;
    }

    if input.up {
        quiz.move_selection(-1);
    }
    if input.down {
        quiz.move_selection(1);
    }
    if let Some(choice) = input.choice {
        quiz.select(choice);
    }
    let verdict = if input.confirm {
        quiz.confirm(questions, tuning.quiz_feedback_frames())
    } else {
        None
    };
    if let Some(correct) = verdict {
        log::info!("Quiz answered ({})", if correct { "correct" } else { "wrong" });
        state.emit(GameEvent::QuizAnswered { correct });
    }
}

/// Take a life. The last one ends the run; otherwise a question decides.
fn lose_life(state: &mut GameState, cause: LifeLossCause, tuning: &Tuning, questions: &[Question]) {
    state.player.lives -= 1;
    let lives = state.player.lives;
    log::info!("Life lost ({:?}), {} left", cause, lives);
    state.emit(GameEvent::LifeLost { cause, lives });

    if lives < 0 {
        game_over(state, tuning);
        return;
    }

    match QuizState::pick(&mut state.world.rng, questions.len()) {
        Some(quiz) => {
            log::info!("Quiz: question #{}", quiz.question);
            state.quiz = Some(quiz);
            state.phase = GamePhase::Quiz;
        }
        None => {
            log::warn!("Question bank is empty, ending the run");
            game_over(state, tuning);
        }
    }
}

fn resolve_quiz(state: &mut GameState, correct: bool, tuning: &Tuning) {
    state.quiz = None;
    if !correct {
        game_over(state, tuning);
        return;
    }

    state.player.lives += 1;
    let safe_top = state.safe_platform_top();
    if safe_top.is_none() {
        log::debug!("Safe platform gone, reviving mid-screen");
    }
    state.player.revive_on_safe(safe_top, tuning);
    state.phase = GamePhase::Playing;
    log::info!("Revived with {} lives", state.player.lives);
    state.emit(GameEvent::Revived);
}

fn game_over(state: &mut GameState, tuning: &Tuning) {
    update_score(state, tuning);
    state.quiz = None;
    state.phase = GamePhase::GameOver;
    let score = state.score;
    if state.beat_best() {
        log::info!("Game over: new high score {}", score);
    } else {
        log::info!("Game over: score {} (best {})", score, state.high_score);
    }
    state.emit(GameEvent::GameOver { score });
}

/// Score follows ascended distance and never goes down within a run
fn update_score(state: &mut GameState, tuning: &Tuning) {
    let fresh = (state.world.distance * tuning.progression.score_per_pixel)
        .floor()
        .max(0.0) as u64;
    state.score = state.score.max(fresh);
    state.player.score = state.score;

    if state.score > state.high_score {
        state.high_score = state.score;
        log::debug!("High score raised to {}", state.high_score);
        state.emit(GameEvent::NewHighScore(state.high_score));
    }
}

/// Fill in input for idle/demo mode
fn autopilot(state: &mut GameState, input: &mut TickInput, tuning: &Tuning, questions: &[Question]) {
    match state.phase {
        GamePhase::Menu | GamePhase::Paused => input.confirm = true,
        GamePhase::GameOver => {}
        GamePhase::Quiz => {
            let Some(quiz) = state.quiz.as_ref() else {
                return;
            };
            if quiz.is_answered() {
                return;
            }
            let correct = quiz.current(questions).map_or(0, |q| q.answer);
            let right = state.world.rng.random::<f32>() < tuning.quiz.autopilot_accuracy;
            input.choice = Some(if right {
                correct
            } else {
                (correct + 1) % OPTION_COUNT
            });
            input.confirm = true;
        }
        GamePhase::Playing => {
            input.pointer_x = None;
            input.steer = match autopilot_target(state) {
                Some(x) => {
                    let dx = x - state.player.center_x();
                    if dx > AUTOPILOT_DEADZONE {
                        Steer::Right
                    } else if dx < -AUTOPILOT_DEADZONE {
                        Steer::Left
                    } else {
                        Steer::None
                    }
                }
                None => Steer::None,
            };
        }
    }
}

/// Column to aim for: the nearest platform below while falling, the
/// nearest bonus (or platform above) while rising
fn autopilot_target(state: &GameState) -> Option<f32> {
    let player = &state.player;
    let bottom = player.bottom();

    if player.vel.y >= 0.0 {
        return state
            .platforms
            .iter()
            .filter(|p| p.active && p.top() >= bottom)
            .min_by(|a, b| a.top().total_cmp(&b.top()))
            .map(|p| p.center_x());
    }

    let center = player.rect().pos + player.size / 2.0;
    let bonus = state
        .bonuses
        .iter()
        .filter(|b| b.pos.y < bottom)
        .map(|b| b.rect().pos + b.size / 2.0)
        .min_by(|a, b| a.distance_squared(center).total_cmp(&b.distance_squared(center)));
    if let Some(target) = bonus {
        return Some(target.x);
    }

    state
        .platforms
        .iter()
        .filter(|p| p.active && p.top() < bottom)
        .max_by(|a, b| a.top().total_cmp(&b.top()))
        .map(|p| p.center_x())
}
