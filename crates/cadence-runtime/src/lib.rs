//! Cadence Runtime - fixed-cadence driver for autonomous command trees
//!
//! The [`Scheduler`] owns a root command and polls it once per control-loop
//! tick (nominally 20 ms) until it completes or the autonomous wall-clock
//! budget runs out. It is the only place in Cadence that touches a real
//! clock or sleeps.

pub mod scheduler;

pub use scheduler::*;

/// Install a fmt tracing subscriber filtered by `RUST_LOG`.
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}
