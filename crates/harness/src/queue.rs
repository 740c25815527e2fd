//! Bounded FIFO of input lines awaiting delivery to the host.
//!
//! The ring keeps one slot empty so that `head == tail` always means empty;
//! a queue of depth `n` therefore holds at most `n - 1` lines. Lines are owned
//! by the queue until [`InputQueue::pop`] hands them to the caller.
//!
//! Entries remember the generation of their target slot, so a line queued for
//! a connection that is closed and replaced before the pump runs is never
//! delivered to the replacement.

use crate::handle::{ConnectionId, NetworkHandle};

/// A line waiting for the pump, tagged with its target connection.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PendingLine {
    target: NetworkHandle,
    line: String,
}

impl PendingLine {
    /// Creates a pending line for the connection behind `target`.
    #[must_use]
    pub fn new(target: NetworkHandle, line: impl Into<String>) -> Self {
        Self {
            target,
            line: line.into(),
        }
    }

    /// Returns the target connection.
    #[must_use]
    pub const fn connection(&self) -> ConnectionId {
        self.target.connection_id()
    }

    /// Returns the handle the line was queued against.
    #[must_use]
    pub const fn target(&self) -> NetworkHandle {
        self.target
    }

    /// Returns the line text.
    #[must_use]
    pub fn line(&self) -> &str {
        &self.line
    }
}

/// Ring buffer of [`PendingLine`] entries.
#[derive(Debug)]
pub struct InputQueue {
    slots: Vec<Option<PendingLine>>,
    head: usize,
    tail: usize,
}

impl InputQueue {
    /// Creates a ring with `depth` slots.
    ///
    /// A depth below two yields a queue that rejects every push.
    #[must_use]
    pub fn with_depth(depth: usize) -> Self {
        let mut slots = Vec::with_capacity(depth);
        slots.resize_with(depth, || None);
        Self {
            slots,
            head: 0,
            tail: 0,
        }
    }

    fn advance(&self, index: usize) -> usize {
        (index + 1) % self.slots.len()
    }

    /// Returns the maximum number of lines held at once.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len().saturating_sub(1)
    }

    /// Returns the number of queued lines.
    #[must_use]
    pub fn len(&self) -> usize {
        if self.slots.is_empty() {
            return 0;
        }
        (self.tail + self.slots.len() - self.head) % self.slots.len()
    }

    /// Returns `true` when no line is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    /// Returns `true` when a push would be rejected.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.slots.len() < 2 || self.advance(self.tail) == self.head
    }

    /// Enqueues `entry` at the tail.
    ///
    /// # Errors
    ///
    /// Hands the entry back unchanged when the ring is full.
    pub fn push(&mut self, entry: PendingLine) -> Result<(), PendingLine> {
        if self.is_full() {
            return Err(entry);
        }
        self.slots[self.tail] = Some(entry);
        self.tail = self.advance(self.tail);
        Ok(())
    }

    /// Removes the line at the head, transferring ownership to the caller.
    pub fn pop(&mut self) -> Option<PendingLine> {
        if self.is_empty() {
            return None;
        }
        let entry = self.slots[self.head].take();
        self.head = self.advance(self.head);
        entry
    }

    /// Drops every queued line.
    pub fn clear(&mut self) {
        while self.pop().is_some() {}
        self.head = 0;
        self.tail = 0;
    }
}
