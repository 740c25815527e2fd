//! crates/harness/src/harness/mod.rs
//!
//! The in-process network layer.
//!
//! A [`Harness`] owns every piece of networking state: the capture buffer,
//! the input queue and both slot tables. The test driver creates connections
//! and queues input through the methods in this module, the host talks to
//! the same instance through its [`Network`](crate::Network) implementation,
//! and [`Harness::process_io`] moves queued lines from one side to the other.
//!
//! The host server itself is not owned by the harness. Every operation that
//! may call back into the host borrows it as `&mut S`, which lets the host
//! hold `&mut dyn Network` during the callback without aliasing.

mod driver;
mod pump;
mod shim;

#[cfg(test)]
mod tests;

use std::borrow::Cow;
use std::fmt;

use crate::capture::CaptureBuffer;
use crate::config::HarnessConfig;
use crate::connection::{ConnectionSlot, ConnectionTable};
use crate::error::HarnessResult;
use crate::handle::{ConnectionId, ListenerHandle};
use crate::host::HostServer;
use crate::listener::ListenerTable;
use crate::queue::InputQueue;
use crate::trace;

/// Protocol name reported to the host.
pub const PROTOCOL_NAME: &str = "harness";

/// Name reported for a handle that does not resolve to an active connection.
pub const UNKNOWN_CONNECTION_NAME: &str = "unknown";

/// In-process replacement for a MOO server's network layer.
pub struct Harness<S: HostServer> {
    config: HarnessConfig,
    initialized: bool,
    capture: CaptureBuffer,
    queue: InputQueue,
    connections: ConnectionTable<S::Handle>,
    listeners: ListenerTable<S::Listener>,
}

impl<S: HostServer> Harness<S> {
    /// Creates an initialized harness sized by `config`.
    #[must_use]
    pub fn new(config: HarnessConfig) -> Self {
        let mut harness = Self {
            capture: CaptureBuffer::with_capacity(0),
            queue: InputQueue::with_depth(0),
            connections: ConnectionTable::with_capacity(0),
            listeners: ListenerTable::with_capacity(0),
            initialized: false,
            config,
        };
        harness.init();
        harness
    }

    /// Resets every table and allocates a fresh capture buffer.
    ///
    /// Server handles still held by open connections are dropped without
    /// notifying the host.
    pub fn init(&mut self) {
        let config = &self.config;
        self.capture = CaptureBuffer::with_capacity(config.capture_capacity());
        self.queue = InputQueue::with_depth(config.input_queue_depth());
        self.connections = ConnectionTable::with_capacity(config.max_connections());
        self.listeners = ListenerTable::with_capacity(config.max_listeners());
        self.initialized = true;
        trace::initialized(
            config.capture_capacity(),
            config.max_connections(),
            config.max_listeners(),
            config.input_queue_depth(),
        );
    }

    /// Releases the capture buffer and discards queued input.
    ///
    /// Connection and listener slots are left as they are; call
    /// [`Network::shutdown`](crate::Network::shutdown) first to close them.
    pub fn cleanup(&mut self) {
        let discarded = self.queue.len();
        self.queue.clear();
        self.capture.release();
        self.initialized = false;
        trace::cleaned_up(discarded);
    }

    /// Returns `true` between initialization and cleanup.
    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Returns the configuration the harness was sized with.
    #[must_use]
    pub const fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Returns everything captured since the last clear.
    #[must_use]
    pub fn output(&self) -> &[u8] {
        self.capture.as_bytes()
    }

    /// Returns the captured bytes followed by the terminating NUL.
    ///
    /// Empty once the buffer has been released.
    #[must_use]
    pub fn output_with_nul(&self) -> &[u8] {
        self.capture.as_bytes_with_nul()
    }

    /// Returns the captured output as text, replacing invalid UTF-8.
    #[must_use]
    pub fn output_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.capture.as_bytes())
    }

    /// Returns the number of captured bytes.
    #[must_use]
    pub const fn output_len(&self) -> usize {
        self.capture.len()
    }

    /// Returns the capture buffer capacity, zero once released.
    #[must_use]
    pub fn output_capacity(&self) -> usize {
        self.capture.capacity()
    }

    /// Empties the capture buffer.
    pub fn clear_output(&mut self) {
        self.capture.clear();
    }

    /// Returns the number of active connections.
    #[must_use]
    pub const fn connection_count(&self) -> usize {
        self.connections.active_count()
    }

    /// Returns the number of active listeners.
    #[must_use]
    pub const fn listener_count(&self) -> usize {
        self.listeners.active_count()
    }

    /// Returns the number of lines waiting for the pump.
    #[must_use]
    pub fn queued_lines(&self) -> usize {
        self.queue.len()
    }

    /// Returns the slot behind `id`.
    ///
    /// # Errors
    ///
    /// Fails when `id` is out of range or the slot is not active.
    pub fn connection(&self, id: ConnectionId) -> HarnessResult<&ConnectionSlot<S::Handle>> {
        self.connections.get(id)
    }

    /// Iterates over active connections in slot order.
    pub fn connections(&self) -> impl Iterator<Item = (ConnectionId, &ConnectionSlot<S::Handle>)> {
        self.connections.iter_active()
    }

    /// Returns `true` when `listener` is still open.
    #[must_use]
    pub fn is_listener_active(&self, listener: ListenerHandle) -> bool {
        self.listeners.is_active(listener)
    }

    /// Returns the number of active slots counted by scanning both tables.
    ///
    /// Always equal to `(connection_count(), listener_count())`.
    #[must_use]
    pub fn scan_active_slots(&self) -> (usize, usize) {
        (
            self.connections.iter_active().count(),
            self.listeners.count_active_slots(),
        )
    }
}

impl<S: HostServer> Default for Harness<S> {
    fn default() -> Self {
        Self::new(HarnessConfig::default())
    }
}

impl<S: HostServer> fmt::Debug for Harness<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Harness")
            .field("initialized", &self.initialized)
            .field("captured", &self.capture.len())
            .field("queued", &self.queue.len())
            .field("connections", &self.connections.active_count())
            .field("listeners", &self.listeners.active_count())
            .finish_non_exhaustive()
    }
}
