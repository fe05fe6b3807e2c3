//! Cadence Compose - combinators for building autonomous command trees
//!
//! Four ways to combine commands into one:
//! - [`Sequential`] - children one at a time, in construction order
//! - [`Concurrent`] - children in parallel, each completing independently
//! - [`Deadline`] - parallel group that ends when one designated child does
//! - [`EventPath`] - a path-following primary with auxiliary commands
//!   triggered at trajectory timestamps
//!
//! Every combinator is itself a `Command`, so trees nest arbitrarily. All of
//! them drive the same per-child guarantees: init at most once per
//! activation before any run, finalize exactly once, never run a child after
//! its finalize, and full run-state reset on re-activation.

pub mod concurrent;
pub mod deadline;
pub mod events;
pub mod sequential;

pub use concurrent::*;
pub use deadline::*;
pub use events::*;
pub use sequential::*;

#[cfg(test)]
pub(crate) mod testutil;
