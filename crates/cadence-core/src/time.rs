//! Loop time primitives
//!
//! An autonomous routine runs against a single monotonic timeline: the
//! external control loop advances a [`TickClock`] once per tick and hands the
//! resulting [`LoopTime`] to the root command. Commands never read a wall
//! clock themselves, which keeps every tree deterministic under test.

use std::ops::{Add, Sub};
use std::time::{Duration, Instant};

/// Loop time - microseconds since the driving loop started
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct LoopTime(pub u64);

impl LoopTime {
    pub const ZERO: LoopTime = LoopTime(0);

    #[inline]
    pub fn from_micros(micros: u64) -> Self {
        LoopTime(micros)
    }

    #[inline]
    pub fn from_millis(millis: u64) -> Self {
        LoopTime(millis * 1000)
    }

    #[inline]
    pub fn from_secs_f64(secs: f64) -> Self {
        LoopTime((secs * 1_000_000.0) as u64)
    }

    #[inline]
    pub fn as_micros(self) -> u64 {
        self.0
    }

    #[inline]
    pub fn as_millis(self) -> u64 {
        self.0 / 1000
    }

    #[inline]
    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / 1_000_000.0
    }

    #[inline]
    pub fn saturating_add(self, duration: Duration) -> Self {
        LoopTime(self.0.saturating_add(duration.as_micros() as u64))
    }
}

impl Add<Duration> for LoopTime {
    type Output = LoopTime;

    #[inline]
    fn add(self, rhs: Duration) -> Self::Output {
        LoopTime(self.0 + rhs.as_micros() as u64)
    }
}

impl Sub<LoopTime> for LoopTime {
    type Output = Duration;

    /// Elapsed time between two loop instants, saturating at zero
    #[inline]
    fn sub(self, rhs: LoopTime) -> Self::Output {
        Duration::from_micros(self.0.saturating_sub(rhs.0))
    }
}

impl std::fmt::Debug for LoopTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "t+{:.1}ms", self.0 as f64 / 1000.0)
    }
}

/// Monotonic clock that produces [`LoopTime`] for the driving loop
///
/// INVARIANT: the produced time never decreases and never jumps, even if the
/// host process was suspended between ticks.
pub struct TickClock {
    /// Current loop time
    value: LoopTime,
    /// Last update instant
    last_update: Instant,
}

impl TickClock {
    /// Largest advance accepted from a single tick; anything beyond this is
    /// treated as a host stall (e.g. system sleep) and clamped.
    const MAX_TICK_ADVANCE: Duration = Duration::from_millis(100);

    /// Create a new clock starting at zero
    pub fn new() -> Self {
        TickClock {
            value: LoopTime::ZERO,
            last_update: Instant::now(),
        }
    }

    /// Advance the clock based on elapsed real time
    /// Returns the new loop time
    pub fn tick(&mut self) -> LoopTime {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_update);

        let clamped = elapsed.min(Self::MAX_TICK_ADVANCE);

        self.value = self.value.saturating_add(clamped);
        self.last_update = now;
        self.value
    }

    /// Get current loop time without advancing
    pub fn now(&self) -> LoopTime {
        self.value
    }
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new()
    }
}
