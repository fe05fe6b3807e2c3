//! Scheduler - drives one command tree at a fixed cadence

use std::time::{Duration, Instant};

use cadence_core::{BoxedCommand, CadenceError, CadenceResult, Command, TickClock, Timebox};

/// Scheduler configuration
#[derive(Clone, Debug)]
pub struct SchedulerConfig {
    /// Control-loop period
    pub tick_interval: Duration,
    /// Autonomous wall-clock budget; `None` runs unbounded
    pub budget: Option<Duration>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        SchedulerConfig {
            tick_interval: Duration::from_millis(20),
            budget: Some(Duration::from_secs(15)),
        }
    }
}

impl SchedulerConfig {
    pub fn validate(&self) -> CadenceResult<()> {
        if self.tick_interval.is_zero() {
            return Err(CadenceError::ZeroTickInterval);
        }
        Ok(())
    }
}

/// Outcome of one scheduler tick
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerStatus {
    /// Root command still in progress
    Running,
    /// Root command completed and was finalized
    Finished,
    /// Wall budget expired; ticking stopped without finalizing the tree
    BudgetExpired,
}

/// Per-run statistics
#[derive(Clone, Debug, Default)]
pub struct RunStats {
    pub ticks: u64,
    pub last_tick_duration: Duration,
}

/// Owns a root command and polls it once per tick until completion or the
/// wall budget.
///
/// The root is initialized on the first tick and finalized exactly once with
/// `post_complete(false)` when its completion turns true. On budget expiry
/// the scheduler simply stops ticking: nothing is finalized, matching the
/// engine's rule that only time and child completion end work. Routine
/// authors bound every leaf with a timeout so trees terminate inside the
/// budget.
pub struct Scheduler {
    root: BoxedCommand,
    clock: TickClock,
    config: SchedulerConfig,
    stats: RunStats,
    budget_box: Timebox,
    started: bool,
    finished: bool,
    expired: bool,
}

impl Scheduler {
    /// Scheduler with the default 20 ms cadence and 15 s budget
    pub fn new(root: BoxedCommand) -> Self {
        Scheduler {
            root,
            clock: TickClock::new(),
            config: SchedulerConfig::default(),
            stats: RunStats::default(),
            budget_box: Timebox::unarmed(),
            started: false,
            finished: false,
            expired: false,
        }
    }

    pub fn with_config(root: BoxedCommand, config: SchedulerConfig) -> CadenceResult<Self> {
        config.validate()?;
        let mut scheduler = Scheduler::new(root);
        scheduler.config = config;
        Ok(scheduler)
    }

    /// Advance the clock and poll the root command once
    pub fn tick(&mut self) -> SchedulerStatus {
        let wall_start = Instant::now();
        let now = self.clock.tick();

        if self.finished {
            return SchedulerStatus::Finished;
        }
        if self.expired {
            return SchedulerStatus::BudgetExpired;
        }

        if !self.started {
            self.budget_box.arm_opt(now, self.config.budget);
            self.root.init(now);
            self.started = true;
            tracing::info!(budget = ?self.config.budget, "routine started");
        }

        if self.budget_box.elapsed(now) {
            self.expired = true;
            tracing::warn!(
                ticks = self.stats.ticks,
                "wall budget expired, stopping without finalizing"
            );
            return SchedulerStatus::BudgetExpired;
        }

        self.root.run(now);
        let status = if self.root.is_completed(now) {
            self.root.post_complete(false);
            self.finished = true;
            tracing::info!(ticks = self.stats.ticks + 1, "routine finished");
            SchedulerStatus::Finished
        } else {
            SchedulerStatus::Running
        };

        self.stats.ticks += 1;
        self.stats.last_tick_duration = wall_start.elapsed();
        status
    }

    /// Tick at the configured cadence until the routine finishes or the wall
    /// budget expires.
    pub fn run_to_completion(&mut self) -> SchedulerStatus {
        loop {
            match self.tick() {
                SchedulerStatus::Running => {
                    let pacing = self
                        .config
                        .tick_interval
                        .saturating_sub(self.stats.last_tick_duration);
                    std::thread::sleep(pacing);
                }
                done => return done,
            }
        }
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}
