//! The host-facing side: [`Network`] implemented over the harness tables.

use super::{Harness, PROTOCOL_NAME, UNKNOWN_CONNECTION_NAME};
use crate::error::NetworkError;
use crate::handle::{ListenerHandle, NetworkHandle};
use crate::host::{HostServer, ListenerRegistration, Network, Var};
use crate::trace;

impl<S: HostServer> Network for Harness<S> {
    type Listener = S::Listener;

    fn protocol_name(&self) -> &'static str {
        PROTOCOL_NAME
    }

    fn usage_string(&self) -> &'static str {
        ""
    }

    fn initialize(&mut self, args: &[String]) -> Var {
        let _ = args;
        if !self.initialized {
            self.init();
        }
        Var::Int(0)
    }

    fn make_listener(
        &mut self,
        token: Self::Listener,
        desc: &Var,
    ) -> Result<ListenerRegistration<'_>, NetworkError> {
        let _ = desc;
        let Ok(handle) = self.listeners.allocate(token) else {
            trace::listener_quota(self.listeners.capacity());
            return Err(NetworkError::Quota);
        };
        trace::listener_created(handle.index());
        Ok(ListenerRegistration {
            handle,
            canonical: Var::empty_list(),
            name: self.listeners.name(handle).unwrap_or_default(),
        })
    }

    fn listen(&mut self, listener: ListenerHandle) -> bool {
        let _ = listener;
        true
    }

    fn send_line(&mut self, handle: NetworkHandle, line: &str, flush_ok: bool) -> bool {
        let _ = (handle, flush_ok);
        let stored = self.capture.append_line(line.as_bytes());
        if !stored {
            trace::capture_overflow(line.len() + 1, self.capture.len(), self.capture.capacity());
        }
        stored
    }

    fn send_bytes(&mut self, handle: NetworkHandle, bytes: &[u8], flush_ok: bool) -> bool {
        let _ = (handle, flush_ok);
        let stored = self.capture.append_bytes(bytes);
        if !stored {
            trace::capture_overflow(bytes.len(), self.capture.len(), self.capture.capacity());
        }
        stored
    }

    fn buffered_output_length(&self, handle: NetworkHandle) -> usize {
        let _ = handle;
        0
    }

    fn suspend_input(&mut self, handle: NetworkHandle) {
        if self.connections.set_input_suspended(handle, true) {
            trace::connection_flag(handle.connection_id().index(), "input_suspended", true);
        }
    }

    fn resume_input(&mut self, handle: NetworkHandle) {
        if self.connections.set_input_suspended(handle, false) {
            trace::connection_flag(handle.connection_id().index(), "input_suspended", false);
        }
    }

    fn set_connection_binary(&mut self, handle: NetworkHandle, binary: bool) {
        if self.connections.set_binary(handle, binary) {
            trace::connection_flag(handle.connection_id().index(), "binary", binary);
        }
    }

    fn connection_name(&self, handle: NetworkHandle) -> &str {
        self.connections
            .resolve(handle)
            .map_or(UNKNOWN_CONNECTION_NAME, |slot| slot.name())
    }

    fn connection_options(&self, handle: NetworkHandle, list: Var) -> Var {
        let _ = handle;
        list
    }

    fn connection_option(&self, handle: NetworkHandle, option: &str) -> Option<Var> {
        let _ = (handle, option);
        None
    }

    fn set_connection_option(&mut self, handle: NetworkHandle, option: &str, value: &Var) -> bool {
        let _ = (handle, option, value);
        false
    }

    fn close(&mut self, handle: NetworkHandle) {
        if self.connections.release(handle) {
            trace::connection_closed(handle.connection_id().index(), true);
        }
    }

    fn close_listener(&mut self, listener: ListenerHandle) {
        if self.listeners.release(listener) {
            trace::listener_closed(listener.index());
        }
    }

    fn shutdown(&mut self) {
        trace::shut_down(self.connections.active_count(), self.listeners.active_count());
        self.connections.deactivate_all();
        self.listeners.deactivate_all();
    }

    #[cfg(feature = "outbound")]
    fn open_outbound_connection(
        &mut self,
        args: &Var,
        listener: Self::Listener,
    ) -> Result<NetworkHandle, NetworkError> {
        let _ = (args, listener);
        trace::outbound_refused();
        Err(NetworkError::Permission)
    }
}
