//! Fixed-step accumulator
//!
//! Converts variable host frame times into a whole number of simulation ticks.

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};

#[derive(Debug, Clone, Default)]
pub struct FixedStep {
    accumulator: f32,
}

impl FixedStep {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one host frame. Returns how many ticks to run now.
    pub fn advance(&mut self, dt: f32) -> u32 {
        // Hidden tabs and debugger pauses produce huge or bogus deltas
        let dt = if dt.is_finite() {
            dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };
        self.accumulator += dt;

        let mut steps = 0;
        while self.accumulator >= SIM_DT && steps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            steps += 1;
        }
        if steps == MAX_SUBSTEPS {
            // Drop the backlog instead of spiralling
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        steps
    }

    /// Fraction of a tick left over (for render interpolation)
    pub fn alpha(&self) -> f32 {
        self.accumulator / SIM_DT
    }
}
