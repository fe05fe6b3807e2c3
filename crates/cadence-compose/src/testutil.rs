//! Shared helpers for combinator unit tests

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use cadence_core::{Command, LoopTime, Timebox};

/// One recorded lifecycle call
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    Init(&'static str),
    Run(&'static str),
    Done { name: &'static str, interrupted: bool },
}

pub type Trace = Rc<RefCell<Vec<Call>>>;

pub fn trace() -> Trace {
    Rc::new(RefCell::new(Vec::new()))
}

/// Scripted leaf that completes after a fixed number of run calls and logs
/// every lifecycle call into a shared trace.
pub struct Scripted {
    name: &'static str,
    /// `None` means the command never completes on its own
    ticks_to_complete: Option<u32>,
    timeout: Option<Duration>,
    runs: u32,
    timebox: Timebox,
    trace: Trace,
}

impl Scripted {
    pub fn new(name: &'static str, ticks_to_complete: u32, trace: &Trace) -> Self {
        Scripted {
            name,
            ticks_to_complete: Some(ticks_to_complete),
            timeout: None,
            runs: 0,
            timebox: Timebox::unarmed(),
            trace: Rc::clone(trace),
        }
    }

    pub fn never(name: &'static str, trace: &Trace) -> Self {
        Scripted {
            name,
            ticks_to_complete: None,
            timeout: None,
            runs: 0,
            timebox: Timebox::unarmed(),
            trace: Rc::clone(trace),
        }
    }

    /// Arm a parent-visible timeout in `init()`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl Command for Scripted {
    fn init(&mut self, now: LoopTime) {
        self.runs = 0;
        self.timebox.arm_opt(now, self.timeout);
        self.trace.borrow_mut().push(Call::Init(self.name));
    }

    fn run(&mut self, _now: LoopTime) {
        self.runs += 1;
        self.trace.borrow_mut().push(Call::Run(self.name));
    }

    fn is_completed(&self, _now: LoopTime) -> bool {
        match self.ticks_to_complete {
            Some(n) => self.runs >= n,
            None => false,
        }
    }

    fn has_elapsed(&self, now: LoopTime) -> bool {
        self.timebox.elapsed(now)
    }

    fn post_complete(&mut self, interrupted: bool) {
        self.trace.borrow_mut().push(Call::Done {
            name: self.name,
            interrupted,
        });
    }
}

/// Count of `Done` entries for a given name
pub fn done_count(trace: &Trace, name: &str) -> usize {
    trace
        .borrow()
        .iter()
        .filter(|c| matches!(c, Call::Done { name: n, .. } if *n == name))
        .count()
}

/// Count of `Init` entries for a given name
pub fn init_count(trace: &Trace, name: &str) -> usize {
    trace
        .borrow()
        .iter()
        .filter(|c| matches!(c, Call::Init(n) if *n == name))
        .count()
}

/// The interruption flag of the single `Done` entry for a name
pub fn done_flag(trace: &Trace, name: &str) -> Option<bool> {
    trace.borrow().iter().find_map(|c| match c {
        Call::Done {
            name: n,
            interrupted,
        } if *n == name => Some(*interrupted),
        _ => None,
    })
}
