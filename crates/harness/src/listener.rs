//! Fixed-size slotted table of listeners created by the host.
//!
//! There is nothing to bind: a listener is the host's token plus a name.

use crate::handle::ListenerHandle;

#[derive(Debug)]
struct ListenerSlot<L> {
    active: bool,
    generation: u32,
    token: Option<L>,
    name: String,
}

impl<L> ListenerSlot<L> {
    fn vacant() -> Self {
        Self {
            active: false,
            generation: 0,
            token: None,
            name: String::new(),
        }
    }
}

/// Slotted listener table with a maintained active count.
#[derive(Debug)]
pub struct ListenerTable<L> {
    slots: Vec<ListenerSlot<L>>,
    active: usize,
}

impl<L> ListenerTable<L> {
    /// Creates a table of `capacity` inactive slots.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, ListenerSlot::vacant);
        Self { slots, active: 0 }
    }

    /// Returns the number of slots.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of active listeners.
    #[must_use]
    pub const fn active_count(&self) -> usize {
        self.active
    }

    /// Stores `token` in the lowest free slot.
    ///
    /// # Errors
    ///
    /// Hands the token back when every slot is active.
    pub fn allocate(&mut self, token: L) -> Result<ListenerHandle, L> {
        let Some((index, slot)) = self
            .slots
            .iter_mut()
            .enumerate()
            .find(|(_, slot)| !slot.active)
        else {
            return Err(token);
        };

        slot.active = true;
        slot.generation = slot.generation.wrapping_add(1);
        slot.token = Some(token);
        slot.name = format!("harness listener {index}");
        self.active += 1;
        Ok(ListenerHandle::new(index, slot.generation))
    }

    fn resolve(&self, handle: ListenerHandle) -> Option<&ListenerSlot<L>> {
        self.slots
            .get(handle.index())
            .filter(|slot| slot.active && slot.generation == handle.generation())
    }

    /// Returns `true` when `handle` refers to an active listener.
    #[must_use]
    pub fn is_active(&self, handle: ListenerHandle) -> bool {
        self.resolve(handle).is_some()
    }

    /// Returns the listener name, `"harness listener N"`.
    #[must_use]
    pub fn name(&self, handle: ListenerHandle) -> Option<&str> {
        self.resolve(handle).map(|slot| slot.name.as_str())
    }

    /// Returns the token of the lowest-index active listener.
    #[must_use]
    pub fn first_active_token(&self) -> Option<&L> {
        self.slots
            .iter()
            .find(|slot| slot.active)
            .and_then(|slot| slot.token.as_ref())
    }

    /// Marks the slot inactive. Returns `false` for unresolved handles.
    pub fn release(&mut self, handle: ListenerHandle) -> bool {
        let Some(slot) = self
            .slots
            .get_mut(handle.index())
            .filter(|slot| slot.active && slot.generation == handle.generation())
        else {
            return false;
        };
        slot.active = false;
        slot.token = None;
        self.active -= 1;
        true
    }

    /// Marks every slot inactive and zeroes the count.
    pub fn deactivate_all(&mut self) {
        for slot in &mut self.slots {
            slot.active = false;
            slot.token = None;
        }
        self.active = 0;
    }

    /// Returns the number of slots currently flagged active.
    #[must_use]
    pub fn count_active_slots(&self) -> usize {
        self.slots.iter().filter(|slot| slot.active).count()
    }
}
