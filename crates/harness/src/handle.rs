//! Identifiers handed to the driver and to the host.
//!
//! The host never sees a pointer into the harness. It receives a slot index
//! paired with the generation the slot had when the record was created, so a
//! handle kept past a close stops resolving once the slot is reused.

use std::fmt;

/// Slot index of a harness connection, as seen by the test driver.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ConnectionId(usize);

impl ConnectionId {
    /// Wraps a raw slot index.
    #[must_use]
    pub const fn new(slot: usize) -> Self {
        Self(slot)
    }

    /// Returns the slot index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<ConnectionId> for usize {
    fn from(id: ConnectionId) -> Self {
        id.0
    }
}

/// Opaque reference the host uses to address a connection.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct NetworkHandle {
    slot: usize,
    generation: u32,
}

impl NetworkHandle {
    pub(crate) const fn new(slot: usize, generation: u32) -> Self {
        Self { slot, generation }
    }

    /// Returns the connection slot this handle points at.
    #[must_use]
    pub const fn connection_id(self) -> ConnectionId {
        ConnectionId(self.slot)
    }

    pub(crate) const fn slot(self) -> usize {
        self.slot
    }

    pub(crate) const fn generation(self) -> u32 {
        self.generation
    }
}

/// Opaque reference the host uses to address a listener.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct ListenerHandle {
    slot: usize,
    generation: u32,
}

impl ListenerHandle {
    pub(crate) const fn new(slot: usize, generation: u32) -> Self {
        Self { slot, generation }
    }

    /// Returns the listener slot index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.slot
    }

    pub(crate) const fn generation(self) -> u32 {
        self.generation
    }
}
