//! Eco Jump entry point
//!
//! Native: a headless autopilot session paced at the reference rate.
//! Web: a `WebGame` handle driven from `requestAnimationFrame` by the page.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use wasm_bindgen::prelude::*;

    use eco_jump::Game;
    use eco_jump::Tuning;
    use eco_jump::consts::SIM_DT;
    use eco_jump::persistence::LocalStorageStore;
    use eco_jump::platform::Key;

    /// Game handle exported to the page
    #[wasm_bindgen]
    pub struct WebGame {
        game: Game,
        last_time: f64,
    }

    #[wasm_bindgen]
    impl WebGame {
        /// `seed` is usually `Date.now()`
        #[wasm_bindgen(constructor)]
        pub fn new(seed: f64) -> WebGame {
            let game = Game::new(seed as u64, Tuning::default(), Box::new(LocalStorageStore));
            WebGame {
                game,
                last_time: 0.0,
            }
        }

        /// Call from `requestAnimationFrame` with its timestamp (ms).
        /// Returns the number of ticks run.
        pub fn frame(&mut self, time: f64) -> u32 {
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            self.last_time = time;
            self.game.frame(dt)
        }

        /// Returns true if the key is bound (so the page can `preventDefault`)
        pub fn key_down(&mut self, key: &str) -> bool {
            match Key::from_code(key) {
                Some(key) => {
                    self.game.input_mut().key_down(key);
                    true
                }
                None => false,
            }
        }

        pub fn key_up(&mut self, key: &str) {
            if let Some(key) = Key::from_code(key) {
                self.game.input_mut().key_up(key);
            }
        }

        /// Pointer x in viewport pixels (the page maps from client space)
        pub fn pointer_down(&mut self, x: f32) {
            self.game.input_mut().pointer_down(x);
        }

        pub fn pointer_move(&mut self, x: f32) {
            self.game.input_mut().pointer_move(x);
        }

        pub fn pointer_up(&mut self) {
            self.game.input_mut().pointer_up();
        }

        /// Answer button clicked
        pub fn choose(&mut self, option: usize) {
            self.game.input_mut().choose(option);
        }

        pub fn set_idle_mode(&mut self, on: bool) {
            self.game.set_idle_mode(on);
        }

        /// Auto-pause hook for `visibilitychange` / `blur`
        pub fn suspend(&mut self) {
            if self.game.state().phase == eco_jump::sim::GamePhase::Playing {
                self.game.input_mut().key_down(Key::Pause);
                log::info!("Auto-paused (page hidden)");
            }
        }

        /// Full state for the renderer
        pub fn snapshot_json(&self) -> String {
            serde_json::to_string(self.game.state()).unwrap_or_else(|e| {
                log::warn!("Snapshot failed: {}", e);
                String::from("{}")
            })
        }

        /// Events from the last `frame` call (for audio/HUD)
        pub fn events_json(&self) -> String {
            serde_json::to_string(self.game.frame_events()).unwrap_or_else(|_| String::from("[]"))
        }

        /// Text of the open question, if any
        pub fn quiz_json(&self) -> String {
            let question = self
                .game
                .state()
                .quiz
                .as_ref()
                .and_then(|q| q.current(self.game.questions()));
            match question {
                Some(q) => serde_json::json!({
                    "prompt": q.prompt,
                    "options": q.options,
                    "hint": q.hint,
                })
                .to_string(),
                None => String::from("null"),
            }
        }
    }

    pub fn start() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }
        log::info!("Eco Jump starting...");
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::start();
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;
    use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

    use clap::Parser;

    use eco_jump::consts::SIM_DT;
    use eco_jump::persistence::FileStore;
    use eco_jump::sim::{GameEvent, GamePhase};
    use eco_jump::{Game, Tuning};

    /// Headless Eco Jump session played by the autopilot
    #[derive(Parser, Debug)]
    #[command(name = "eco-jump", version, about)]
    pub struct Args {
        /// Run seed (defaults to the current time)
        #[arg(long)]
        pub seed: Option<u64>,
        /// Stop after this many ticks
        #[arg(long, default_value_t = 60 * 60 * 10)]
        pub frames: u64,
        /// Tuning overrides (JSON)
        #[arg(long)]
        pub tuning: Option<PathBuf>,
        /// High score file
        #[arg(long, default_value = FileStore::DEFAULT_PATH)]
        pub scores: PathBuf,
        /// Run as fast as possible instead of at 60 ticks per second
        #[arg(long)]
        pub fast: bool,
    }

    #[derive(Debug, Default)]
    struct Tally {
        landings: u32,
        pickups: u32,
        hits: u32,
        quizzes: u32,
        revivals: u32,
    }

    impl Tally {
        fn record(&mut self, event: &GameEvent) {
            match event {
                GameEvent::Landed { .. } => self.landings += 1,
                GameEvent::BonusCollected { .. } => self.pickups += 1,
                GameEvent::EnemyHit { .. } => self.hits += 1,
                GameEvent::QuizAnswered { .. } => self.quizzes += 1,
                GameEvent::Revived => self.revivals += 1,
                _ => {}
            }
        }
    }

    fn clock_seed() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    }

    pub fn run(args: Args) {
        let tuning = args
            .tuning
            .as_deref()
            .map(Tuning::load)
            .unwrap_or_default();
        let seed = args.seed.unwrap_or_else(clock_seed);
        let store = FileStore::new(args.scores.clone());

        let mut game = Game::new(seed, tuning, Box::new(store));
        game.set_idle_mode(true);

        let step = Duration::from_secs_f32(SIM_DT);
        let started = Instant::now();
        let mut next = started;
        let mut tally = Tally::default();
        let mut ticks = 0u64;

        while ticks < args.frames {
            for event in game.tick() {
                tally.record(event);
            }
            ticks += 1;
            if game.state().phase == GamePhase::GameOver {
                break;
            }
            if !args.fast {
                next += step;
                let now = Instant::now();
                if next > now {
                    std::thread::sleep(next - now);
                }
            }
        }

        let state = game.state();
        log::info!(
            "Session finished after {} ticks in {:.1}s",
            ticks,
            started.elapsed().as_secs_f32()
        );
        println!("seed:       {}", seed);
        println!("phase:      {:?}", state.phase);
        println!("score:      {}", state.score);
        println!("high score: {}", state.high_score);
        println!("lives:      {}", state.player.lives);
        println!(
            "landings {} / pickups {} / hits {} / quizzes {} / revivals {}",
            tally.landings, tally.pickups, tally.hits, tally.quizzes, tally.revivals
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Eco Jump (native, headless) starting...");

    native::run(native::Args::parse());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
