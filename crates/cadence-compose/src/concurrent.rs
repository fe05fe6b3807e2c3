//! Concurrent combinator - children in parallel, completing independently

use std::time::Duration;

use cadence_core::{BoxedCommand, Command, LoopTime, Timebox};

pub(crate) struct Slot {
    pub cmd: BoxedCommand,
    pub finished: bool,
}

/// Runs all children within the same tick, each advancing independently in
/// construction order. A child leaves the working set the moment it
/// completes (finalized `interrupted = false`) or its own safety timeout
/// fires first (finalized `interrupted = true`).
///
/// The group completes when the working set is empty or the optional group
/// timeout elapses. Children still unfinished at the group timeout are left
/// unfinalized; an outer preemption of the whole group (final
/// `post_complete(true)`) does cascade into them.
pub struct Concurrent {
    slots: Vec<Slot>,
    children_need_init: bool,
    timeout: Option<Duration>,
    timebox: Timebox,
}

impl Concurrent {
    pub fn new(children: Vec<BoxedCommand>) -> Self {
        Concurrent {
            slots: children
                .into_iter()
                .map(|cmd| Slot {
                    cmd,
                    finished: false,
                })
                .collect(),
            children_need_init: true,
            timeout: None,
            timebox: Timebox::unarmed(),
        }
    }

    /// Group with a timeout armed at `init()`
    pub fn with_timeout(children: Vec<BoxedCommand>, timeout: Duration) -> Self {
        let mut group = Concurrent::new(children);
        group.timeout = Some(timeout);
        group
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn unfinished(&self) -> usize {
        self.slots.iter().filter(|s| !s.finished).count()
    }
}

impl Command for Concurrent {
    fn init(&mut self, now: LoopTime) {
        for slot in &mut self.slots {
            slot.finished = false;
        }
        self.children_need_init = true;
        self.timebox.arm_opt(now, self.timeout);
    }

    fn run(&mut self, now: LoopTime) {
        if self.is_completed(now) {
            return;
        }

        let first_pass = self.children_need_init;
        for slot in self.slots.iter_mut().filter(|s| !s.finished) {
            if first_pass {
                slot.cmd.init(now);
            }
            slot.cmd.run(now);

            if slot.cmd.is_completed(now) {
                slot.cmd.post_complete(false);
                slot.finished = true;
            } else if slot.cmd.has_elapsed(now) {
                slot.cmd.post_complete(true);
                slot.finished = true;
            }
        }
        self.children_need_init = false;
    }

    fn is_completed(&self, now: LoopTime) -> bool {
        self.unfinished() == 0 || self.timebox.elapsed(now)
    }

    fn has_elapsed(&self, now: LoopTime) -> bool {
        self.timebox.elapsed(now)
    }

    fn post_complete(&mut self, interrupted: bool) {
        if interrupted && !self.children_need_init {
            for slot in self.slots.iter_mut().filter(|s| !s.finished) {
                slot.cmd.post_complete(true);
                slot.finished = true;
            }
        }
    }
}
