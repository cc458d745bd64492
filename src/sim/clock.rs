//! Fixed-timestep accumulator
//!
//! Converts variable frame deltas into whole ticks at a rate that may change
//! between ticks. The remainder always carries over to the next frame.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TickAccumulator {
    /// Banked time in seconds
    pub banked: f64,
}

impl TickAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bank elapsed wall-clock time
    pub fn advance(&mut self, dt_secs: f64) {
        if dt_secs > 0.0 {
            self.banked += dt_secs;
        }
    }

    /// Spend one tick at `ticks_per_sec` if enough time is banked
    pub fn try_consume(&mut self, ticks_per_sec: f64) -> bool {
        let step = 1.0 / ticks_per_sec;
        if self.banked < step {
            return false;
        }
        self.banked -= step;
        true
    }

    pub fn reset(&mut self) {
        self.banked = 0.0;
    }
}
