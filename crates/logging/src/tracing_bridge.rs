//! crates/logging/src/tracing_bridge.rs
//! Subscriber installation for harness diagnostics.
//!
//! A `RUST_LOG` value in the environment always wins over the requested
//! [`Verbosity`], so a developer can widen or narrow the output of a single
//! test run without touching code.

use super::verbosity::Verbosity;
use tracing_subscriber::EnvFilter;

/// Builds the filter for `verbosity`, preferring `RUST_LOG` when it parses.
#[must_use]
pub fn build_filter(verbosity: Verbosity) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(verbosity.directive()))
}

/// Installs a global `fmt` subscriber for harness events.
///
/// # Panics
///
/// Panics when a global subscriber has already been installed. Test suites
/// that may initialise logging more than once should use
/// [`try_init_tracing`].
pub fn init_tracing(verbosity: Verbosity) {
    tracing_subscriber::fmt()
        .with_env_filter(build_filter(verbosity))
        .with_target(true)
        .with_test_writer()
        .init();
}

/// Installs a global `fmt` subscriber, reporting failure instead of panicking.
///
/// # Errors
///
/// Returns the subscriber error when a global default is already set.
pub fn try_init_tracing(
    verbosity: Verbosity,
) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    tracing_subscriber::fmt()
        .with_env_filter(build_filter(verbosity))
        .with_target(true)
        .with_test_writer()
        .try_init()
}
