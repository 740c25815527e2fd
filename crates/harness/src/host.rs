//! The two halves of the networking contract.
//!
//! [`HostServer`] is what the harness needs from the MOO server: a way to
//! register a connection, hand it a line and tell it the connection is gone.
//! [`Network`] is what the server expects from its networking layer; the
//! harness implements it without opening a socket.
//!
//! Every [`HostServer`] callback receives the network layer as
//! `&mut dyn Network`, so the server can emit output, query connection names
//! or close a connection while it is handling an event.

use crate::error::{ErrorCode, NetworkError};
use crate::handle::{ListenerHandle, NetworkHandle};

/// Object number of a MOO object.
pub type Objid = i32;

/// Host values the networking layer produces or passes through.
#[derive(Clone, Debug, PartialEq)]
pub enum Var {
    /// Integer.
    Int(i64),
    /// Object reference.
    Obj(Objid),
    /// String.
    Str(String),
    /// Error value.
    Err(ErrorCode),
    /// List of values.
    List(Vec<Var>),
}

impl Var {
    /// Returns an empty list.
    #[must_use]
    pub const fn empty_list() -> Self {
        Self::List(Vec::new())
    }
}

/// Result of a successful [`Network::make_listener`].
#[derive(Debug, PartialEq)]
pub struct ListenerRegistration<'a> {
    /// Handle the host passes back for `listen` and `close_listener`.
    pub handle: ListenerHandle,
    /// Canonical form of the listener description. Always an empty list.
    pub canonical: Var,
    /// Listener name stored by the harness, `"harness listener N"`.
    pub name: &'a str,
}

/// Server-side operations the networking layer calls.
pub trait HostServer {
    /// Server handle returned on connection registration.
    type Handle;
    /// Token the server associates with a listener. `Default` is the
    /// zero-valued token used when no listener exists.
    type Listener: Clone + Default;

    /// Registers a new connection arriving on `listener`.
    fn new_connection(
        &mut self,
        net: &mut dyn Network<Listener = Self::Listener>,
        listener: Self::Listener,
        handle: NetworkHandle,
        outbound_counter: u32,
    ) -> Self::Handle;

    /// Tells the server its connection has been closed by the network side.
    fn close(&mut self, net: &mut dyn Network<Listener = Self::Listener>, handle: Self::Handle);

    /// Delivers one line of input.
    fn receive_line(
        &mut self,
        net: &mut dyn Network<Listener = Self::Listener>,
        handle: &Self::Handle,
        line: &str,
    );

    /// Runs whatever tasks the server has queued. The default does nothing.
    fn run_ready_tasks(&mut self, net: &mut dyn Network<Listener = Self::Listener>) {
        let _ = net;
    }
}

/// Operations a MOO server expects of its networking module.
pub trait Network {
    /// Listener token type stored on behalf of the server.
    type Listener;

    /// Short protocol name reported to the server.
    fn protocol_name(&self) -> &'static str;

    /// Usage text for protocol-specific command-line arguments.
    fn usage_string(&self) -> &'static str;

    /// Prepares the layer and returns the descriptor of the initial listener.
    fn initialize(&mut self, args: &[String]) -> Var;

    /// Creates a listener for `token`.
    ///
    /// # Errors
    ///
    /// [`NetworkError::Quota`] when no listener slot is free.
    fn make_listener(
        &mut self,
        token: Self::Listener,
        desc: &Var,
    ) -> Result<ListenerRegistration<'_>, NetworkError>;

    /// Starts listening. Returns `false` on failure.
    fn listen(&mut self, listener: ListenerHandle) -> bool;

    /// Sends `line` followed by a newline. Returns `false` when it did not fit.
    fn send_line(&mut self, handle: NetworkHandle, line: &str, flush_ok: bool) -> bool;

    /// Sends raw bytes. Returns `false` when they did not fit.
    fn send_bytes(&mut self, handle: NetworkHandle, bytes: &[u8], flush_ok: bool) -> bool;

    /// Number of bytes queued but not yet written.
    fn buffered_output_length(&self, handle: NetworkHandle) -> usize;

    /// Stops delivering input to the connection.
    fn suspend_input(&mut self, handle: NetworkHandle);

    /// Resumes delivering input to the connection.
    fn resume_input(&mut self, handle: NetworkHandle);

    /// Switches the connection in or out of binary mode.
    fn set_connection_binary(&mut self, handle: NetworkHandle, binary: bool);

    /// Human-readable connection name.
    fn connection_name(&self, handle: NetworkHandle) -> &str;

    /// Adds protocol-specific option names to `list`.
    fn connection_options(&self, handle: NetworkHandle, list: Var) -> Var;

    /// Reads a protocol-specific option. `None` when unsupported.
    fn connection_option(&self, handle: NetworkHandle, option: &str) -> Option<Var>;

    /// Writes a protocol-specific option. Returns `false` when unsupported.
    fn set_connection_option(&mut self, handle: NetworkHandle, option: &str, value: &Var) -> bool;

    /// Closes the connection at the server's request.
    fn close(&mut self, handle: NetworkHandle);

    /// Closes a listener.
    fn close_listener(&mut self, listener: ListenerHandle);

    /// Closes every connection and listener without notifying the server.
    fn shutdown(&mut self);

    /// Opens an outbound connection.
    ///
    /// # Errors
    ///
    /// [`NetworkError::Permission`] when outbound connections are refused.
    #[cfg(feature = "outbound")]
    fn open_outbound_connection(
        &mut self,
        args: &Var,
        listener: Self::Listener,
    ) -> Result<NetworkHandle, NetworkError>;
}
