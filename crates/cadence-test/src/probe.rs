//! Probe commands - scripted leaves that record their lifecycle

use std::time::Duration;

use cadence_core::{Command, LoopTime, StateHandle, Timebox};

/// One recorded lifecycle call
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleCall {
    Init,
    Run,
    Finalize { interrupted: bool },
}

/// Shared, ordered record of every lifecycle call across a tree
#[derive(Clone, Debug, Default)]
pub struct CallLog {
    pub entries: Vec<(String, LifecycleCall)>,
}

impl CallLog {
    pub fn push(&mut self, name: &str, call: LifecycleCall) {
        self.entries.push((name.to_string(), call));
    }

    pub fn inits(&self, name: &str) -> usize {
        self.entries
            .iter()
            .filter(|(n, c)| n == name && matches!(c, LifecycleCall::Init))
            .count()
    }

    pub fn runs(&self, name: &str) -> usize {
        self.entries
            .iter()
            .filter(|(n, c)| n == name && matches!(c, LifecycleCall::Run))
            .count()
    }

    /// Interruption flags of the finalize calls a command received, in order
    pub fn finalizes(&self, name: &str) -> Vec<bool> {
        self.entries
            .iter()
            .filter_map(|(n, c)| match c {
                LifecycleCall::Finalize { interrupted } if n == name => Some(*interrupted),
                _ => None,
            })
            .collect()
    }

    /// Command names in the order they were finalized
    pub fn finalize_order(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter_map(|(n, c)| match c {
                LifecycleCall::Finalize { .. } => Some(n.clone()),
                _ => None,
            })
            .collect()
    }
}

/// How a probe decides it is complete
#[derive(Clone, Copy, Debug)]
enum Completion {
    /// Complete after this many `run` calls
    AfterRuns(u32),
    /// Complete once this much loop time has passed since `init` (the
    /// timed-leaf pattern: elapsing is the success condition)
    AfterElapsed(Duration),
    /// Never completes on its own
    Never,
}

/// Scripted leaf recording every lifecycle call into a shared [`CallLog`]
pub struct ProbeCommand {
    name: String,
    completion: Completion,
    timeout: Option<Duration>,
    runs: u32,
    complete_box: Timebox,
    bound_box: Timebox,
    log: StateHandle<CallLog>,
}

impl ProbeCommand {
    fn build(name: &str, completion: Completion, log: &StateHandle<CallLog>) -> Self {
        ProbeCommand {
            name: name.to_string(),
            completion,
            timeout: None,
            runs: 0,
            complete_box: Timebox::unarmed(),
            bound_box: Timebox::unarmed(),
            log: log.clone(),
        }
    }

    /// Probe completing after a fixed number of run calls
    pub fn after_runs(name: &str, runs: u32, log: &StateHandle<CallLog>) -> Self {
        Self::build(name, Completion::AfterRuns(runs), log)
    }

    /// Probe completing once a duration has elapsed since `init`
    pub fn after_elapsed(name: &str, duration: Duration, log: &StateHandle<CallLog>) -> Self {
        Self::build(name, Completion::AfterElapsed(duration), log)
    }

    /// Probe that never completes on its own
    pub fn never(name: &str, log: &StateHandle<CallLog>) -> Self {
        Self::build(name, Completion::Never, log)
    }

    /// Arm a parent-visible safety timeout in `init()`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl Command for ProbeCommand {
    fn init(&mut self, now: LoopTime) {
        self.runs = 0;
        if let Completion::AfterElapsed(duration) = self.completion {
            self.complete_box.arm(now, duration);
        }
        self.bound_box.arm_opt(now, self.timeout);
        self.log.write(|l| l.push(&self.name, LifecycleCall::Init));
    }

    fn run(&mut self, _now: LoopTime) {
        self.runs += 1;
        self.log.write(|l| l.push(&self.name, LifecycleCall::Run));
    }

    fn is_completed(&self, now: LoopTime) -> bool {
        match self.completion {
            Completion::AfterRuns(n) => self.runs >= n,
            Completion::AfterElapsed(_) => self.complete_box.elapsed(now),
            Completion::Never => false,
        }
    }

    fn has_elapsed(&self, now: LoopTime) -> bool {
        self.bound_box.elapsed(now)
    }

    fn post_complete(&mut self, interrupted: bool) {
        self.log
            .write(|l| l.push(&self.name, LifecycleCall::Finalize { interrupted }));
    }
}
