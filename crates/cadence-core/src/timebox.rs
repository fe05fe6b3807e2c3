//! Time-bound bookkeeping shared by timed leaves and group timeouts
//!
//! A [`Timebox`] is armed from a command's `init()` and queried on every
//! tick. An unarmed timebox never elapses, which is how unbounded commands
//! are expressed.

use std::time::Duration;

use crate::LoopTime;

/// Start timestamp plus optional duration limit
#[derive(Clone, Copy, Debug, Default)]
pub struct Timebox {
    started: LoopTime,
    limit: Option<Duration>,
}

impl Timebox {
    /// A timebox with no limit; `elapsed` is never true
    pub fn unarmed() -> Self {
        Timebox::default()
    }

    /// A timebox armed at `now` with the given limit
    pub fn armed(now: LoopTime, limit: Duration) -> Self {
        Timebox {
            started: now,
            limit: Some(limit),
        }
    }

    /// Stamp the start time and store the limit; call from `init()`
    pub fn arm(&mut self, now: LoopTime, limit: Duration) {
        self.started = now;
        self.limit = Some(limit);
    }

    /// Arm only if a limit was configured, otherwise leave unbounded
    pub fn arm_opt(&mut self, now: LoopTime, limit: Option<Duration>) {
        self.started = now;
        self.limit = limit;
    }

    /// True once `now - started >= limit`; false forever when unarmed
    pub fn elapsed(&self, now: LoopTime) -> bool {
        match self.limit {
            Some(limit) => now - self.started >= limit,
            None => false,
        }
    }

    /// Time left before the limit fires, `None` when unarmed
    pub fn remaining(&self, now: LoopTime) -> Option<Duration> {
        self.limit
            .map(|limit| limit.saturating_sub(now - self.started))
    }

    pub fn limit(&self) -> Option<Duration> {
        self.limit
    }
}
