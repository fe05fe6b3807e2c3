//! Event-triggered path combinator
//!
//! Wraps a primary command (typically a path follower) together with a
//! time-ordered list of trajectory event markers and a registry of named
//! auxiliary commands. While the primary runs, each marker that the
//! activation timer reaches preempts currently active work and starts the
//! auxiliaries it names - so an intake or arm sequence can begin partway
//! through a path with no operator input.

use std::time::Duration;

use cadence_core::{BoxedCommand, CadenceError, CadenceResult, Command, LoopTime};

/// One trajectory timestamp naming zero or more auxiliary commands
#[derive(Clone, Debug)]
pub struct EventMarker {
    /// Offset from activation start
    pub offset: Duration,
    /// Registered auxiliary commands to trigger
    pub names: Vec<String>,
}

impl EventMarker {
    pub fn new<I, S>(offset: Duration, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        EventMarker {
            offset,
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Marker at a trajectory timestamp in seconds
    pub fn at_secs<I, S>(secs: f64, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        EventMarker::new(Duration::from_secs_f64(secs), names)
    }
}

struct Registered {
    name: String,
    cmd: BoxedCommand,
    active: bool,
}

/// Primary command plus marker-triggered auxiliaries
///
/// The group completes when the primary reports completion. By default a
/// firing marker preempts every active command, the primary included, which
/// means a marker can stop the path follower early; call
/// [`EventPath::exempt_primary`] to keep the primary running across marker
/// events instead.
pub struct EventPath {
    primary: BoxedCommand,
    primary_active: bool,
    auxiliaries: Vec<Registered>,
    markers: Vec<EventMarker>,
    next_marker: usize,
    started: LoopTime,
    completed: bool,
    exempt_primary: bool,
}

impl EventPath {
    /// Build the group, validating that markers are in time order and that
    /// every name they mention resolves in the auxiliary registry.
    pub fn new(
        primary: BoxedCommand,
        markers: Vec<EventMarker>,
        auxiliaries: Vec<(String, BoxedCommand)>,
    ) -> CadenceResult<Self> {
        for (index, pair) in markers.windows(2).enumerate() {
            if pair[1].offset < pair[0].offset {
                return Err(CadenceError::MarkersOutOfOrder { index: index + 1 });
            }
        }
        for marker in &markers {
            for name in &marker.names {
                if !auxiliaries.iter().any(|(n, _)| n == name) {
                    return Err(CadenceError::UnknownEventCommand(name.clone()));
                }
            }
        }

        Ok(EventPath {
            primary,
            primary_active: false,
            auxiliaries: auxiliaries
                .into_iter()
                .map(|(name, cmd)| Registered {
                    name,
                    cmd,
                    active: false,
                })
                .collect(),
            markers,
            next_marker: 0,
            started: LoopTime::ZERO,
            completed: false,
            exempt_primary: false,
        })
    }

    /// Keep the primary running across marker events instead of preempting
    /// it with everything else.
    pub fn exempt_primary(mut self) -> Self {
        self.exempt_primary = true;
        self
    }

    /// Finalize every active command as interrupted ahead of a marker's
    /// auxiliaries starting.
    fn preempt_active(&mut self) {
        if self.primary_active && !self.exempt_primary {
            self.primary.post_complete(true);
            self.primary_active = false;
        }
        for aux in self.auxiliaries.iter_mut().filter(|a| a.active) {
            aux.cmd.post_complete(true);
            aux.active = false;
        }
    }
}

impl Command for EventPath {
    fn init(&mut self, now: LoopTime) {
        self.started = now;
        self.next_marker = 0;
        self.completed = false;
        for aux in &mut self.auxiliaries {
            aux.active = false;
        }
        self.primary.init(now);
        self.primary_active = true;
    }

    fn run(&mut self, now: LoopTime) {
        if self.completed {
            return;
        }

        if self.primary_active {
            self.primary.run(now);
            if self.primary.is_completed(now) {
                self.primary.post_complete(false);
                self.primary_active = false;
                self.completed = true;
                // Nothing may start once the group is complete: a marker due
                // this very tick would activate an auxiliary the group will
                // never run or finalize again
                return;
            }
        }

        for aux in self.auxiliaries.iter_mut().filter(|a| a.active) {
            aux.cmd.run(now);
            if aux.cmd.is_completed(now) {
                aux.cmd.post_complete(false);
                aux.active = false;
            } else if aux.cmd.has_elapsed(now) {
                aux.cmd.post_complete(true);
                aux.active = false;
            }
        }

        // Consume every marker the timer has reached, strictly in order
        while self.next_marker < self.markers.len()
            && now - self.started >= self.markers[self.next_marker].offset
        {
            let index = self.next_marker;
            self.next_marker += 1;
            if self.markers[index].names.is_empty() {
                continue;
            }

            tracing::debug!(marker = index, "event marker fired");
            self.preempt_active();

            for n in 0..self.markers[index].names.len() {
                let position = self
                    .auxiliaries
                    .iter()
                    .position(|a| a.name == self.markers[index].names[n]);
                // Names were validated at construction
                if let Some(position) = position {
                    let aux = &mut self.auxiliaries[position];
                    aux.cmd.init(now);
                    aux.active = true;
                }
            }
        }
    }

    fn is_completed(&self, _now: LoopTime) -> bool {
        self.completed
    }

    fn post_complete(&mut self, interrupted: bool) {
        if interrupted {
            if self.primary_active {
                self.primary.post_complete(true);
                self.primary_active = false;
            }
            for aux in self.auxiliaries.iter_mut().filter(|a| a.active) {
                aux.cmd.post_complete(true);
                aux.active = false;
            }
        }
    }
}
