//! crates/harness/src/test_support.rs
//!
//! A scripted host server for tests and benchmarks.
//!
//! [`RecordingServer`] records every callback it receives and reacts to
//! configured command lines: it can reply with output (immediately or from
//! its task runner), suspend input, or close the connection. Its server
//! handle is deliberately not `Clone`, so any attempt by the harness to
//! duplicate a handle would fail to compile.

use std::collections::{HashMap, HashSet};

use crate::handle::{ConnectionId, NetworkHandle};
use crate::host::{HostServer, Network};

/// Listener token used by [`RecordingServer`]. The default token is zero.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct ListenerToken(pub u32);

/// Server handle issued by [`RecordingServer`].
#[derive(Debug, Eq, PartialEq)]
pub struct ServerConnection {
    serial: u32,
    network: NetworkHandle,
    listener: ListenerToken,
}

impl ServerConnection {
    /// Returns the registration number, starting at zero.
    #[must_use]
    pub const fn serial(&self) -> u32 {
        self.serial
    }

    /// Returns the handle the harness gave for this connection.
    #[must_use]
    pub const fn network(&self) -> NetworkHandle {
        self.network
    }

    /// Returns the listener the connection arrived on.
    #[must_use]
    pub const fn listener(&self) -> ListenerToken {
        self.listener
    }
}

/// One callback observed by [`RecordingServer`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum HostEvent {
    /// `new_connection` was called.
    Connected {
        /// Connection slot.
        connection: ConnectionId,
        /// Listener token passed by the harness.
        listener: ListenerToken,
        /// Outbound counter passed by the harness.
        outbound_counter: u32,
    },
    /// `receive_line` was called.
    Received {
        /// Connection slot.
        connection: ConnectionId,
        /// Delivered line.
        line: String,
    },
    /// `close` was called.
    Closed {
        /// Connection slot.
        connection: ConnectionId,
        /// Registration number of the handle that was closed.
        serial: u32,
    },
}

/// Scripted [`HostServer`] that records its callbacks.
#[derive(Debug, Default)]
pub struct RecordingServer {
    events: Vec<HostEvent>,
    replies: HashMap<String, Vec<String>>,
    close_commands: HashSet<String>,
    suspend_commands: HashSet<String>,
    greeting: Option<String>,
    deferred: bool,
    close_network_on_close: bool,
    refuse_connections: bool,
    ready: Vec<(NetworkHandle, String)>,
    next_serial: u32,
}

impl RecordingServer {
    /// Creates a server with no scripted behaviour.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replies to `command` with `lines`, one `send_line` each.
    #[must_use]
    pub fn with_reply<I, T>(mut self, command: &str, lines: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.replies
            .insert(command.to_owned(), lines.into_iter().map(Into::into).collect());
        self
    }

    /// Sends `text` to every new connection.
    #[must_use]
    pub fn with_greeting(mut self, text: &str) -> Self {
        self.greeting = Some(text.to_owned());
        self
    }

    /// Closes the connection through the network layer on `command`.
    #[must_use]
    pub fn closing_on(mut self, command: &str) -> Self {
        self.close_commands.insert(command.to_owned());
        self
    }

    /// Suspends input on the connection on `command`.
    #[must_use]
    pub fn suspending_on(mut self, command: &str) -> Self {
        self.suspend_commands.insert(command.to_owned());
        self
    }

    /// Holds replies until the next `run_ready_tasks`.
    #[must_use]
    pub fn deferring_replies(mut self) -> Self {
        self.deferred = true;
        self
    }

    /// Calls `Network::close` from inside the `close` callback.
    #[must_use]
    pub fn closing_network_on_close(mut self) -> Self {
        self.close_network_on_close = true;
        self
    }

    /// Closes every connection from inside `new_connection`.
    #[must_use]
    pub fn refusing_connections(mut self) -> Self {
        self.refuse_connections = true;
        self
    }

    /// Returns every recorded callback in order.
    #[must_use]
    pub fn events(&self) -> &[HostEvent] {
        &self.events
    }

    /// Forgets the recorded callbacks.
    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    /// Returns the delivered lines with their connections, in order.
    #[must_use]
    pub fn received(&self) -> Vec<(ConnectionId, &str)> {
        self.events
            .iter()
            .filter_map(|event| match event {
                HostEvent::Received { connection, line } => Some((*connection, line.as_str())),
                _ => None,
            })
            .collect()
    }

    /// Returns the delivered lines, in order.
    #[must_use]
    pub fn received_lines(&self) -> Vec<&str> {
        self.received().into_iter().map(|(_, line)| line).collect()
    }

    /// Returns the connections the host was told were closed.
    #[must_use]
    pub fn closed(&self) -> Vec<ConnectionId> {
        self.events
            .iter()
            .filter_map(|event| match event {
                HostEvent::Closed { connection, .. } => Some(*connection),
                _ => None,
            })
            .collect()
    }

    /// Returns the number of `new_connection` calls.
    #[must_use]
    pub fn connections_registered(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, HostEvent::Connected { .. }))
            .count()
    }

    /// Returns the number of replies waiting for `run_ready_tasks`.
    #[must_use]
    pub fn pending_tasks(&self) -> usize {
        self.ready.len()
    }
}

impl HostServer for RecordingServer {
    type Handle = ServerConnection;
    type Listener = ListenerToken;

    fn new_connection(
        &mut self,
        net: &mut dyn Network<Listener = ListenerToken>,
        listener: ListenerToken,
        handle: NetworkHandle,
        outbound_counter: u32,
    ) -> ServerConnection {
        let serial = self.next_serial;
        self.next_serial += 1;
        self.events.push(HostEvent::Connected {
            connection: handle.connection_id(),
            listener,
            outbound_counter,
        });
        if let Some(greeting) = &self.greeting {
            net.send_line(handle, greeting, true);
        }
        if self.refuse_connections {
            net.close(handle);
        }
        ServerConnection {
            serial,
            network: handle,
            listener,
        }
    }

    fn close(&mut self, net: &mut dyn Network<Listener = ListenerToken>, handle: ServerConnection) {
        self.events.push(HostEvent::Closed {
            connection: handle.network.connection_id(),
            serial: handle.serial,
        });
        if self.close_network_on_close {
            net.close(handle.network);
        }
    }

    fn receive_line(
        &mut self,
        net: &mut dyn Network<Listener = ListenerToken>,
        handle: &ServerConnection,
        line: &str,
    ) {
        let network = handle.network;
        self.events.push(HostEvent::Received {
            connection: network.connection_id(),
            line: line.to_owned(),
        });
        if self.close_commands.contains(line) {
            net.close(network);
            return;
        }
        if self.suspend_commands.contains(line) {
            net.suspend_input(network);
        }
        let Some(replies) = self.replies.get(line) else {
            return;
        };
        for reply in replies {
            if self.deferred {
                self.ready.push((network, reply.clone()));
            } else {
                net.send_line(network, reply, true);
            }
        }
    }

    fn run_ready_tasks(&mut self, net: &mut dyn Network<Listener = ListenerToken>) {
        for (network, line) in self.ready.drain(..) {
            net.send_line(network, &line, true);
        }
    }
}
