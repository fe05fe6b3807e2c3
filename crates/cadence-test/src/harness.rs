//! Tick harness - drives a command tree with synthetic loop time
//!
//! Real control loops never tick at exactly their nominal period, so the
//! harness can apply seeded per-tick jitter to check that trees only depend
//! on elapsed time, not on a perfect cadence.

use std::time::Duration;

use cadence_core::{Command, LoopTime};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Synthetic-time driver for a single command tree
pub struct TickHarness {
    step: Duration,
    jitter_us: u32,
    rng: StdRng,
    now: LoopTime,
}

impl TickHarness {
    /// Harness ticking at a perfectly fixed step
    pub fn new(step: Duration) -> Self {
        Self::with_jitter(step, 0, 0)
    }

    /// Harness with uniform per-tick jitter of up to `jitter_us`
    /// microseconds in either direction
    pub fn with_jitter(step: Duration, jitter_us: u32, seed: u64) -> Self {
        TickHarness {
            step,
            jitter_us,
            rng: StdRng::seed_from_u64(seed),
            now: LoopTime::ZERO,
        }
    }

    pub fn now(&self) -> LoopTime {
        self.now
    }

    /// Initialize the command, then tick it until completion or `max_ticks`.
    /// Returns the tick count at completion, or `None` if capped. The
    /// command is finalized with `post_complete(false)` on completion,
    /// matching the external driver contract.
    pub fn run(&mut self, cmd: &mut dyn Command, max_ticks: u32) -> Option<u32> {
        cmd.init(self.now);
        for tick in 1..=max_ticks {
            self.advance();
            cmd.run(self.now);
            if cmd.is_completed(self.now) {
                cmd.post_complete(false);
                return Some(tick);
            }
        }
        None
    }

    /// Advance time and poll once, without completion handling
    pub fn step_once(&mut self, cmd: &mut dyn Command) {
        self.advance();
        cmd.run(self.now);
    }

    fn advance(&mut self) {
        let step_us = self.step.as_micros() as i64;
        let jitter = if self.jitter_us > 0 {
            self.rng
                .gen_range(-(self.jitter_us as i64)..=self.jitter_us as i64)
        } else {
            0
        };
        let dt = (step_us + jitter).max(0) as u64;
        self.now = self.now + Duration::from_micros(dt);
    }
}
