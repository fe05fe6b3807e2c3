//! Cadence Core - Command lifecycle contract and timing primitives
//!
//! This crate defines the pieces every Cadence command tree is built from:
//! - Loop time primitives ([`LoopTime`], [`TickClock`])
//! - The four-method [`Command`] contract
//! - Time-bound bookkeeping for timed leaves and group timeouts ([`Timebox`])
//! - Shared routine state ([`StateHandle`])
//! - Construction-time error types

pub mod command;
pub mod error;
pub mod state;
pub mod time;
pub mod timebox;

pub use command::*;
pub use error::*;
pub use state::*;
pub use time::*;
pub use timebox::*;
