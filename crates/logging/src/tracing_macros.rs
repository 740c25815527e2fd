//! crates/logging/src/tracing_macros.rs
//! Convenience macros for harness-specific tracing.
//!
//! These macros wrap the standard tracing macros with the target used by each
//! harness subsystem. Callers must depend on `tracing` themselves.

/// Emit a lifecycle trace (init, cleanup, shutdown).
///
/// # Example
/// ```ignore
/// trace_lifecycle!(capacity, "harness initialised");
/// ```
#[macro_export]
macro_rules! trace_lifecycle {
    ($($arg:tt)*) => {
        ::tracing::info!(target: "harness::lifecycle", $($arg)*);
    };
}

/// Emit a connection table trace.
///
/// # Example
/// ```ignore
/// trace_conn!(slot = 3, "connection created");
/// ```
#[macro_export]
macro_rules! trace_conn {
    ($($arg:tt)*) => {
        ::tracing::debug!(target: "harness::conn", $($arg)*);
    };
}

/// Emit a listener table trace.
///
/// # Example
/// ```ignore
/// trace_listener!(slot = 0, "listener created");
/// ```
#[macro_export]
macro_rules! trace_listener {
    ($($arg:tt)*) => {
        ::tracing::debug!(target: "harness::listener", $($arg)*);
    };
}

/// Emit an input queue or pump trace.
///
/// # Example
/// ```ignore
/// trace_pump!(delivered = 2, "pump finished");
/// ```
#[macro_export]
macro_rules! trace_pump {
    ($($arg:tt)*) => {
        ::tracing::trace!(target: "harness::pump", $($arg)*);
    };
}

/// Emit a capture buffer trace.
///
/// Overflows are reported at `warn` because they almost always mean a test
/// has drifted from the scenario it meant to check.
///
/// # Example
/// ```ignore
/// trace_capture!(needed = 10, "capture buffer full");
/// ```
#[macro_export]
macro_rules! trace_capture {
    ($($arg:tt)*) => {
        ::tracing::warn!(target: "harness::capture", $($arg)*);
    };
}
