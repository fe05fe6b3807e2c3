//! Cadence Test Harness - probes and simulation for the command engine
//!
//! This crate provides:
//! - [`ProbeCommand`] - scripted leaves that record every lifecycle call
//! - [`TickHarness`] - synthetic-time driver with optional cadence jitter
//! - Scenario tests exercising whole command trees end to end

pub mod harness;
pub mod probe;

#[cfg(test)]
mod scenario;

pub use harness::*;
pub use probe::*;
