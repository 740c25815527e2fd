//! Fixed-size slotted table of harness connections.
//!
//! Each slot owns the server handle the host returned when the connection was
//! registered, plus the per-connection flags the host can toggle. Slots are
//! reused lowest-index first; every reuse bumps the slot generation so stale
//! [`NetworkHandle`]s stop resolving.

use crate::error::{HarnessError, HarnessResult};
use crate::handle::{ConnectionId, NetworkHandle};

/// State of one connection slot.
#[derive(Debug)]
pub struct ConnectionSlot<H> {
    active: bool,
    binary: bool,
    input_suspended: bool,
    generation: u32,
    server_handle: Option<H>,
    name: String,
}

impl<H> ConnectionSlot<H> {
    fn vacant() -> Self {
        Self {
            active: false,
            binary: false,
            input_suspended: false,
            generation: 0,
            server_handle: None,
            name: String::new(),
        }
    }

    /// Returns `true` while the connection is open.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Returns `true` when the host switched the connection to binary mode.
    #[must_use]
    pub const fn is_binary(&self) -> bool {
        self.binary
    }

    /// Returns `true` while the host has input suspended.
    #[must_use]
    pub const fn is_input_suspended(&self) -> bool {
        self.input_suspended
    }

    /// Returns the display name, `"harness connection N"`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the server handle, unless it is lent out for a delivery.
    #[must_use]
    pub const fn server_handle(&self) -> Option<&H> {
        self.server_handle.as_ref()
    }

    fn handle(&self, slot: usize) -> NetworkHandle {
        NetworkHandle::new(slot, self.generation)
    }
}

/// Slotted connection table with a maintained active count.
#[derive(Debug)]
pub struct ConnectionTable<H> {
    slots: Vec<ConnectionSlot<H>>,
    active: usize,
}

impl<H> ConnectionTable<H> {
    /// Creates a table of `capacity` inactive slots.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, ConnectionSlot::vacant);
        Self { slots, active: 0 }
    }

    /// Returns the number of slots.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of active connections.
    #[must_use]
    pub const fn active_count(&self) -> usize {
        self.active
    }

    /// Activates the lowest free slot with cleared flags.
    ///
    /// Returns `None` when every slot is active.
    pub fn allocate(&mut self) -> Option<NetworkHandle> {
        let (index, slot) = self
            .slots
            .iter_mut()
            .enumerate()
            .find(|(_, slot)| !slot.active)?;

        slot.active = true;
        slot.binary = false;
        slot.input_suspended = false;
        slot.generation = slot.generation.wrapping_add(1);
        slot.server_handle = None;
        slot.name = format!("harness connection {index}");
        self.active += 1;
        Some(slot.handle(index))
    }

    /// Looks up an active slot by handle, rejecting stale generations.
    #[must_use]
    pub fn resolve(&self, handle: NetworkHandle) -> Option<&ConnectionSlot<H>> {
        self.slots
            .get(handle.slot())
            .filter(|slot| slot.active && slot.generation == handle.generation())
    }

    fn resolve_mut(&mut self, handle: NetworkHandle) -> Option<&mut ConnectionSlot<H>> {
        self.slots
            .get_mut(handle.slot())
            .filter(|slot| slot.active && slot.generation == handle.generation())
    }

    /// Looks up an active slot by driver id.
    ///
    /// # Errors
    ///
    /// [`HarnessError::InvalidConnection`] for ids outside the table,
    /// [`HarnessError::InactiveConnection`] for closed slots.
    pub fn get(&self, id: ConnectionId) -> HarnessResult<&ConnectionSlot<H>> {
        let slot = self
            .slots
            .get(id.index())
            .ok_or(HarnessError::InvalidConnection(id.index()))?;
        if slot.active {
            Ok(slot)
        } else {
            Err(HarnessError::InactiveConnection(id))
        }
    }

    /// Returns the current network handle of an active connection.
    pub fn handle_of(&self, id: ConnectionId) -> HarnessResult<NetworkHandle> {
        self.get(id).map(|slot| slot.handle(id.index()))
    }

    /// Stores the server handle returned by the host for `handle`.
    ///
    /// # Errors
    ///
    /// Hands the server handle back when the slot no longer resolves.
    pub fn attach(&mut self, handle: NetworkHandle, server_handle: H) -> Result<(), H> {
        match self.resolve_mut(handle) {
            Some(slot) => {
                slot.server_handle = Some(server_handle);
                Ok(())
            }
            None => Err(server_handle),
        }
    }

    /// Moves the server handle out of the slot.
    pub fn take_server_handle(&mut self, handle: NetworkHandle) -> Option<H> {
        self.resolve_mut(handle)?.server_handle.take()
    }

    /// Sets the binary flag. Returns `false` for unresolved handles.
    pub fn set_binary(&mut self, handle: NetworkHandle, binary: bool) -> bool {
        self.resolve_mut(handle)
            .map(|slot| slot.binary = binary)
            .is_some()
    }

    /// Sets the input suspension flag. Returns `false` for unresolved handles.
    pub fn set_input_suspended(&mut self, handle: NetworkHandle, suspended: bool) -> bool {
        self.resolve_mut(handle)
            .map(|slot| slot.input_suspended = suspended)
            .is_some()
    }

    /// Marks the slot inactive and drops any server handle it still holds.
    ///
    /// Returns `false` without touching the count when the handle does not
    /// resolve, so releasing twice is harmless.
    pub fn release(&mut self, handle: NetworkHandle) -> bool {
        let Some(slot) = self.resolve_mut(handle) else {
            return false;
        };
        slot.active = false;
        slot.server_handle = None;
        self.active -= 1;
        true
    }

    /// Marks every slot inactive and zeroes the count.
    pub fn deactivate_all(&mut self) {
        for slot in &mut self.slots {
            slot.active = false;
            slot.server_handle = None;
        }
        self.active = 0;
    }

    /// Iterates over active connections.
    pub fn iter_active(&self) -> impl Iterator<Item = (ConnectionId, &ConnectionSlot<H>)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.active)
            .map(|(index, slot)| (ConnectionId::new(index), slot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_uses_lowest_free_slot() {
        let mut table: ConnectionTable<u32> = ConnectionTable::with_capacity(3);
        let first = table.allocate().expect("slot 0");
        let second = table.allocate().expect("slot 1");
        assert_eq!(first.connection_id().index(), 0);
        assert_eq!(second.connection_id().index(), 1);

        assert!(table.release(first));
        let reused = table.allocate().expect("slot 0 again");
        assert_eq!(reused.connection_id().index(), 0);
        assert_ne!(reused, first);
        assert_eq!(table.active_count(), 2);
    }

    #[test]
    fn allocate_fails_when_full() {
        let mut table: ConnectionTable<u32> = ConnectionTable::with_capacity(2);
        assert!(table.allocate().is_some());
        assert!(table.allocate().is_some());
        assert!(table.allocate().is_none());
        assert_eq!(table.active_count(), 2);
    }

    #[test]
    fn new_slot_has_name_and_cleared_flags() {
        let mut table: ConnectionTable<u32> = ConnectionTable::with_capacity(4);
        table.allocate().expect("slot 0");
        let handle = table.allocate().expect("slot 1");
        assert!(table.set_binary(handle, true));
        assert!(table.set_input_suspended(handle, true));
        assert!(table.release(handle));

        let handle = table.allocate().expect("slot 1 again");
        let slot = table.resolve(handle).expect("active");
        assert_eq!(slot.name(), "harness connection 1");
        assert!(!slot.is_binary());
        assert!(!slot.is_input_suspended());
    }

    #[test]
    fn stale_handle_does_not_resolve() {
        let mut table: ConnectionTable<u32> = ConnectionTable::with_capacity(1);
        let stale = table.allocate().expect("slot");
        table.release(stale);
        let fresh = table.allocate().expect("slot reused");

        assert!(table.resolve(stale).is_none());
        assert!(!table.set_binary(stale, true));
        assert!(!table.release(stale));
        assert!(table.resolve(fresh).is_some());
        assert_eq!(table.active_count(), 1);
    }

    #[test]
    fn release_twice_keeps_count() {
        let mut table: ConnectionTable<u32> = ConnectionTable::with_capacity(2);
        let handle = table.allocate().expect("slot");
        assert!(table.release(handle));
        assert!(!table.release(handle));
        assert_eq!(table.active_count(), 0);
    }

    #[test]
    fn server_handle_can_be_lent_and_returned() {
        let mut table: ConnectionTable<String> = ConnectionTable::with_capacity(1);
        let handle = table.allocate().expect("slot");
        table.attach(handle, "conn-a".to_owned()).expect("attach");

        let lent = table.take_server_handle(handle).expect("present");
        assert!(table.resolve(handle).expect("active").server_handle().is_none());
        table.attach(handle, lent).expect("restore");
        assert_eq!(
            table.resolve(handle).and_then(ConnectionSlot::server_handle),
            Some(&"conn-a".to_owned())
        );

        table.release(handle);
        assert_eq!(table.attach(handle, "late".to_owned()), Err("late".to_owned()));
    }

    #[test]
    fn get_distinguishes_range_and_activity() {
        let mut table: ConnectionTable<u32> = ConnectionTable::with_capacity(2);
        table.allocate().expect("slot");
        assert!(table.get(ConnectionId::new(0)).is_ok());
        assert_eq!(
            table.get(ConnectionId::new(1)).err(),
            Some(HarnessError::InactiveConnection(ConnectionId::new(1)))
        );
        assert_eq!(
            table.get(ConnectionId::new(9)).err(),
            Some(HarnessError::InvalidConnection(9))
        );
    }

    #[test]
    fn deactivate_all_zeroes_count() {
        let mut table: ConnectionTable<u32> = ConnectionTable::with_capacity(3);
        let handle = table.allocate().expect("slot");
        table.allocate().expect("slot");
        table.deactivate_all();
        assert_eq!(table.active_count(), 0);
        assert_eq!(table.iter_active().count(), 0);
        assert!(table.resolve(handle).is_none());
    }
}
