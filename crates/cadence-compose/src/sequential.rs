//! Sequential combinator - children one at a time, in construction order

use std::time::Duration;

use cadence_core::{BoxedCommand, Command, LoopTime, Timebox};

/// Runs its children strictly in order: a child is initialized on the tick
/// it becomes current, run once per tick, and finalized before the next
/// child starts.
///
/// A child that reports `has_elapsed` without completing (its safety timeout
/// fired first) is finalized with `interrupted = true` and the chain
/// advances anyway, so one stuck leaf cannot stall the routine.
///
/// An optional group-level timeout bounds the whole chain: once it fires the
/// group reports completed on the next poll. The in-flight child is not
/// force-finalized by the group timeout; only the driver's final
/// `post_complete(true)` on this group (an outer preemption) cascades into
/// it.
pub struct Sequential {
    children: Vec<BoxedCommand>,
    index: usize,
    needs_init: bool,
    timeout: Option<Duration>,
    timebox: Timebox,
}

impl Sequential {
    pub fn new(children: Vec<BoxedCommand>) -> Self {
        Sequential {
            children,
            index: 0,
            needs_init: true,
            timeout: None,
            timebox: Timebox::unarmed(),
        }
    }

    /// Chain with a group-level timeout armed at `init()`
    pub fn with_timeout(children: Vec<BoxedCommand>, timeout: Duration) -> Self {
        let mut group = Sequential::new(children);
        group.timeout = Some(timeout);
        group
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// True when the current child has been initialized but not finalized
    fn child_in_flight(&self) -> bool {
        self.index < self.children.len() && !self.needs_init
    }
}

impl Command for Sequential {
    fn init(&mut self, now: LoopTime) {
        self.index = 0;
        self.needs_init = true;
        self.timebox.arm_opt(now, self.timeout);
    }

    fn run(&mut self, now: LoopTime) {
        if self.is_completed(now) {
            return;
        }

        let index = self.index;
        let child = &mut self.children[index];
        if self.needs_init {
            child.init(now);
            self.needs_init = false;
        }
        child.run(now);

        if child.is_completed(now) {
            child.post_complete(false);
            self.index += 1;
            self.needs_init = true;
        } else if child.has_elapsed(now) {
            tracing::debug!(child = index, "child timed out, advancing chain");
            child.post_complete(true);
            self.index += 1;
            self.needs_init = true;
        }
    }

    fn is_completed(&self, now: LoopTime) -> bool {
        self.index >= self.children.len() || self.timebox.elapsed(now)
    }

    fn has_elapsed(&self, now: LoopTime) -> bool {
        self.timebox.elapsed(now)
    }

    fn post_complete(&mut self, interrupted: bool) {
        if interrupted && self.child_in_flight() {
            self.children[self.index].post_complete(true);
            self.needs_init = true;
        }
    }
}
