//! Driver-facing operations: creating connections, queueing input and
//! closing connections from the test side.

use super::Harness;
use crate::error::{HarnessError, HarnessResult};
use crate::handle::{ConnectionId, NetworkHandle};
use crate::host::{HostServer, Objid};
use crate::queue::PendingLine;
use crate::trace;

impl<S: HostServer> Harness<S> {
    /// Creates a connection and registers it with `server`.
    ///
    /// The connection arrives on the first active listener, or on the default
    /// listener token when the host has created none.
    ///
    /// # Errors
    ///
    /// - [`HarnessError::NotInitialized`] after [`Harness::cleanup`].
    /// - [`HarnessError::ConnectionTableFull`] when every slot is active.
    /// - [`HarnessError::InactiveConnection`] when the host closed the
    ///   connection from inside its `new_connection` callback.
    pub fn create_connection(&mut self, server: &mut S, player: Objid) -> HarnessResult<ConnectionId> {
        if !self.initialized {
            return Err(HarnessError::NotInitialized);
        }
        let Some(handle) = self.connections.allocate() else {
            trace::connection_table_full(self.connections.capacity());
            return Err(HarnessError::ConnectionTableFull);
        };
        let id = handle.connection_id();
        let listener = self.listeners.first_active_token().cloned().unwrap_or_default();

        let server_handle = server.new_connection(self, listener, handle, 0);
        if self.connections.attach(handle, server_handle).is_err() {
            trace::connection_refused(id.index());
            return Err(HarnessError::InactiveConnection(id));
        }
        trace::connection_created(id.index(), player);
        Ok(id)
    }

    /// Appends `line` to the input queue for connection `id`.
    ///
    /// The line is delivered by the next [`Harness::process_io`].
    ///
    /// # Errors
    ///
    /// - [`HarnessError::NotInitialized`] after [`Harness::cleanup`].
    /// - [`HarnessError::InvalidConnection`] or
    ///   [`HarnessError::InactiveConnection`] when `id` does not name an
    ///   active connection.
    /// - [`HarnessError::QueueFull`] when the queue holds its maximum.
    pub fn queue_input(&mut self, id: ConnectionId, line: impl Into<String>) -> HarnessResult<()> {
        if !self.initialized {
            return Err(HarnessError::NotInitialized);
        }
        let handle = self.connections.handle_of(id)?;
        let entry = PendingLine::new(handle, line);
        let bytes = entry.line().len();
        self.queue
            .push(entry)
            .map_err(|_| HarnessError::QueueFull)?;
        trace::line_queued(id.index(), bytes, self.queue.len());
        Ok(())
    }

    /// Closes connection `id`, telling the host first.
    ///
    /// Returns `false` without side effects when `id` does not name an active
    /// connection. The slot is released only if the host did not already close
    /// it from its `close` callback.
    pub fn close_connection(&mut self, server: &mut S, id: ConnectionId) -> bool {
        let Ok(handle) = self.connections.handle_of(id) else {
            return false;
        };
        if let Some(server_handle) = self.connections.take_server_handle(handle) {
            server.close(self, server_handle);
        }
        self.connections.release(handle);
        trace::connection_closed(id.index(), false);
        true
    }

    /// Returns the handle the host knows connection `id` by.
    ///
    /// # Errors
    ///
    /// Fails when `id` does not name an active connection.
    pub fn network_handle(&self, id: ConnectionId) -> HarnessResult<NetworkHandle> {
        self.connections.handle_of(id)
    }
}
