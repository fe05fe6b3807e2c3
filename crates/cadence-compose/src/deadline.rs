//! Deadline combinator - parallel group bounded by one designated child

use cadence_core::{BoxedCommand, Command, LoopTime};

use crate::concurrent::Slot;

/// Runs children in parallel like [`crate::Concurrent`], but completion is
/// driven by one designated deadline child: the group is done the moment
/// that child's own completion turns true, or when the working set empties.
///
/// The deadline child is an ordinary member of the working set and follows
/// the same per-child init/run/finalize rules. Siblings still unfinished
/// when the deadline fires receive no finalize call from this group; an
/// outer preemption (final `post_complete(true)`) does cascade into them.
///
/// A pure time deadline is just a [`cadence_core::Wait`] deadline child.
pub struct Deadline {
    /// Deadline child at index 0, siblings after it
    slots: Vec<Slot>,
    children_need_init: bool,
    deadline_done: bool,
}

impl Deadline {
    pub fn new(deadline: BoxedCommand, others: Vec<BoxedCommand>) -> Self {
        let mut slots = Vec::with_capacity(others.len() + 1);
        slots.push(Slot {
            cmd: deadline,
            finished: false,
        });
        slots.extend(others.into_iter().map(|cmd| Slot {
            cmd,
            finished: false,
        }));
        Deadline {
            slots,
            children_need_init: true,
            deadline_done: false,
        }
    }

    fn unfinished(&self) -> usize {
        self.slots.iter().filter(|s| !s.finished).count()
    }
}

impl Command for Deadline {
    fn init(&mut self, now: LoopTime) {
        let _ = now;
        for slot in &mut self.slots {
            slot.finished = false;
        }
        self.children_need_init = true;
        self.deadline_done = false;
    }

    fn run(&mut self, now: LoopTime) {
        if self.is_completed(now) {
            return;
        }

        let first_pass = self.children_need_init;
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.finished {
                continue;
            }
            if first_pass {
                slot.cmd.init(now);
            }
            slot.cmd.run(now);

            if slot.cmd.is_completed(now) {
                slot.cmd.post_complete(false);
                slot.finished = true;
                if index == 0 {
                    tracing::debug!("deadline child completed, ending group");
                    self.deadline_done = true;
                }
            } else if slot.cmd.has_elapsed(now) {
                slot.cmd.post_complete(true);
                slot.finished = true;
            }
        }
        self.children_need_init = false;
    }

    fn is_completed(&self, _now: LoopTime) -> bool {
        self.deadline_done || self.unfinished() == 0
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
