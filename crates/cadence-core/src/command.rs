//! Command lifecycle contract
//!
//! A command is one unit of autonomous work: a drive segment, an arm move,
//! an intake pulse, or a composite of other commands. Every command follows
//! the same four-call lifecycle, driven by an external fixed-period loop:
//!
//! 1. `init(now)` - exactly once per activation, before any `run`
//! 2. `run(now)` - once per tick until completion; must never block
//! 3. `is_completed(now)` - pure query; once true it stays true
//! 4. `post_complete(interrupted)` - exactly once per activation
//!
//! The current loop time is passed in by the driver rather than read from an
//! ambient clock, so trees behave identically under synthetic test time.

use std::time::Duration;

use crate::{LoopTime, Timebox};

/// The uniform unit-of-work contract
///
/// Composites own their children as `Box<dyn Command>` and drive this same
/// contract on them recursively. A command must fully reset its run-state in
/// `init()` so it can be activated again after finishing.
pub trait Command {
    /// (Re)start the command; arms timers and issues initial setpoints
    fn init(&mut self, now: LoopTime);

    /// Perform one tick of work; must not block
    fn run(&mut self, now: LoopTime);

    /// Pure completion query; monotone within an activation
    fn is_completed(&self, now: LoopTime) -> bool;

    /// True when an armed time bound expired without completion.
    /// Unbounded commands keep the default.
    fn has_elapsed(&self, now: LoopTime) -> bool {
        let _ = now;
        false
    }

    /// Finalization hook; puts owned actuators into a safe resting state.
    /// `interrupted` is true when the command was cut off by a timeout,
    /// sibling completion, or an event preemption rather than finishing on
    /// its own. Must tolerate a command that never ran.
    fn post_complete(&mut self, interrupted: bool);
}

/// Owned, type-erased command handle used throughout the combinators
pub type BoxedCommand = Box<dyn Command>;

impl Command for Box<dyn Command> {
    fn init(&mut self, now: LoopTime) {
        (**self).init(now)
    }

    fn run(&mut self, now: LoopTime) {
        (**self).run(now)
    }

    fn is_completed(&self, now: LoopTime) -> bool {
        (**self).is_completed(now)
    }

    fn has_elapsed(&self, now: LoopTime) -> bool {
        (**self).has_elapsed(now)
    }

    fn post_complete(&mut self, interrupted: bool) {
        (**self).post_complete(interrupted)
    }
}

/// Pure timed leaf: completes once its duration has passed
///
/// Elapsing is the success condition here, not a safety bound, so
/// `has_elapsed` stays false and parents always see a natural completion.
/// Deadline groups use this as a wall-time deadline child.
pub struct Wait {
    duration: Duration,
    timebox: Timebox,
}

impl Wait {
    pub fn new(duration: Duration) -> Self {
        Wait {
            duration,
            timebox: Timebox::unarmed(),
        }
    }
}

impl Command for Wait {
    fn init(&mut self, now: LoopTime) {
        self.timebox.arm(now, self.duration);
    }

    fn run(&mut self, _now: LoopTime) {}

    fn is_completed(&self, now: LoopTime) -> bool {
        self.timebox.elapsed(now)
    }

    fn post_complete(&mut self, _interrupted: bool) {}
}

/// Fire-and-forget leaf: runs its action once in `init()` and completes on
/// the first poll. Used for persistent setpoints (e.g. "drop intake").
pub struct RunOnce<F: FnMut()> {
    action: F,
    fired: bool,
}

impl<F: FnMut()> RunOnce<F> {
    pub fn new(action: F) -> Self {
        RunOnce {
            action,
            fired: false,
        }
    }
}

impl<F: FnMut()> Command for RunOnce<F> {
    fn init(&mut self, _now: LoopTime) {
        (self.action)();
        self.fired = true;
    }

    fn run(&mut self, _now: LoopTime) {}

    fn is_completed(&self, _now: LoopTime) -> bool {
        self.fired
    }

    fn post_complete(&mut self, _interrupted: bool) {}
}
