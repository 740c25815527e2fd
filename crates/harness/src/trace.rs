//! crates/harness/src/trace.rs
//!
//! Structured tracing for harness events.
//!
//! Each function emits one event under a `harness::*` target when the
//! `tracing` feature is enabled and compiles to nothing otherwise.

#[cfg(feature = "tracing")]
use logging::{trace_capture, trace_conn, trace_lifecycle, trace_listener, trace_pump};

/// Trace harness initialization.
#[cfg(feature = "tracing")]
#[inline]
pub fn initialized(capture_capacity: usize, connections: usize, listeners: usize, depth: usize) {
    trace_lifecycle!(
        capture_capacity,
        connections,
        listeners,
        depth,
        "harness initialized"
    );
}

/// Trace harness initialization - no-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub const fn initialized(
    _capture_capacity: usize,
    _connections: usize,
    _listeners: usize,
    _depth: usize,
) {
}

/// Trace release of the capture buffer.
#[cfg(feature = "tracing")]
#[inline]
pub fn cleaned_up(discarded_lines: usize) {
    trace_lifecycle!(discarded_lines, "harness cleaned up");
}

/// Trace release of the capture buffer - no-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub const fn cleaned_up(_discarded_lines: usize) {}

/// Trace a shutdown request from the host.
#[cfg(feature = "tracing")]
#[inline]
pub fn shut_down(connections: usize, listeners: usize) {
    trace_lifecycle!(connections, listeners, "network shut down");
}

/// Trace a shutdown request - no-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub const fn shut_down(_connections: usize, _listeners: usize) {}

/// Trace a connection registered with the host.
#[cfg(feature = "tracing")]
#[inline]
pub fn connection_created(slot: usize, player: i32) {
    trace_conn!(slot, player, "connection created");
}

/// Trace a connection registered with the host - no-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub const fn connection_created(_slot: usize, _player: i32) {}

/// Trace a connection the host closed before registration finished.
#[cfg(feature = "tracing")]
#[inline]
pub fn connection_refused(slot: usize) {
    trace_conn!(slot, "host closed connection during registration");
}

/// Trace a refused registration - no-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub const fn connection_refused(_slot: usize) {}

/// Trace a connection that could not be created because every slot is busy.
#[cfg(feature = "tracing")]
#[inline]
pub fn connection_table_full(capacity: usize) {
    trace_conn!(capacity, "connection table full");
}

/// Trace a full connection table - no-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub const fn connection_table_full(_capacity: usize) {}

/// Trace a closed connection. `by_host` is `true` when the host asked.
#[cfg(feature = "tracing")]
#[inline]
pub fn connection_closed(slot: usize, by_host: bool) {
    trace_conn!(slot, by_host, "connection closed");
}

/// Trace a closed connection - no-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub const fn connection_closed(_slot: usize, _by_host: bool) {}

/// Trace a change of a per-connection flag.
#[cfg(feature = "tracing")]
#[inline]
pub fn connection_flag(slot: usize, flag: &'static str, value: bool) {
    trace_conn!(slot, flag, value, "connection flag changed");
}

/// Trace a flag change - no-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub const fn connection_flag(_slot: usize, _flag: &'static str, _value: bool) {}

/// Trace a listener created by the host.
#[cfg(feature = "tracing")]
#[inline]
pub fn listener_created(slot: usize) {
    trace_listener!(slot, "listener created");
}

/// Trace a created listener - no-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub const fn listener_created(_slot: usize) {}

/// Trace a listener request rejected for lack of slots.
#[cfg(feature = "tracing")]
#[inline]
pub fn listener_quota(capacity: usize) {
    trace_listener!(capacity, "listener table full");
}

/// Trace a listener quota failure - no-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub const fn listener_quota(_capacity: usize) {}

/// Trace a closed listener.
#[cfg(feature = "tracing")]
#[inline]
pub fn listener_closed(slot: usize) {
    trace_listener!(slot, "listener closed");
}

/// Trace a closed listener - no-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub const fn listener_closed(_slot: usize) {}

/// Trace a refused outbound connection.
#[cfg(all(feature = "tracing", feature = "outbound"))]
#[inline]
pub fn outbound_refused() {
    trace_listener!("outbound connection refused");
}

/// Trace a refused outbound connection - no-op when tracing is disabled.
#[cfg(all(not(feature = "tracing"), feature = "outbound"))]
#[inline]
pub const fn outbound_refused() {}

/// Trace a line accepted into the input queue.
#[cfg(feature = "tracing")]
#[inline]
pub fn line_queued(slot: usize, bytes: usize, queued: usize) {
    trace_pump!(slot, bytes, queued, "line queued");
}

/// Trace a queued line - no-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub const fn line_queued(_slot: usize, _bytes: usize, _queued: usize) {}

/// Trace a line handed to the host.
#[cfg(feature = "tracing")]
#[inline]
pub fn line_delivered(slot: usize, line: &str) {
    trace_pump!(slot, line, "line delivered");
}

/// Trace a delivered line - no-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub const fn line_delivered(_slot: usize, _line: &str) {}

/// Trace a line the pump dropped.
#[cfg(feature = "tracing")]
#[inline]
pub fn line_dropped(slot: usize, reason: &'static str) {
    trace_pump!(slot, reason, "line dropped");
}

/// Trace a dropped line - no-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub const fn line_dropped(_slot: usize, _reason: &'static str) {}

/// Trace the outcome of one pump pass.
#[cfg(feature = "tracing")]
#[inline]
pub fn pump_finished(delivered: usize, dropped: usize, retained: usize) {
    trace_pump!(delivered, dropped, retained, "pump finished");
}

/// Trace a pump pass - no-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub const fn pump_finished(_delivered: usize, _dropped: usize, _retained: usize) {}

/// Trace output rejected by the capture buffer.
#[cfg(feature = "tracing")]
#[inline]
pub fn capture_overflow(requested: usize, used: usize, capacity: usize) {
    trace_capture!(requested, used, capacity, "capture buffer full, output dropped");
}

/// Trace a capture overflow - no-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub const fn capture_overflow(_requested: usize, _used: usize, _capacity: usize) {}
