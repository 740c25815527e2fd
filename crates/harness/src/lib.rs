#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `harness` replaces a MOO server's network layer with an in-process,
//! deterministic stand-in. Tests create connections, queue input lines and
//! run the I/O pump explicitly; whatever the server sends to any connection
//! is appended to a single capture buffer the test reads and clears between
//! assertions. No socket is ever opened.
//!
//! # Design
//!
//! - [`Harness`] owns the capture buffer, the input queue and the connection
//!   and listener tables. It implements [`Network`], the contract the server
//!   expects of its networking module.
//! - The server implements [`HostServer`]. The harness never owns it:
//!   operations that call into the server borrow it, and every callback gets
//!   `&mut dyn Network` so the server can send output or close connections
//!   while it runs.
//! - The server sees connections through [`NetworkHandle`]s, a slot index
//!   plus generation. A handle kept past a close stops resolving.
//! - [`Session`] pairs a harness with its server for command-level tests.
//!
//! # Invariants
//!
//! - Active connection and listener counts always equal the number of
//!   active slots.
//! - Captured output is a concatenation of whole writes; a write that does
//!   not fit changes nothing.
//! - Queued lines reach the server in the order they were queued.
//! - A server handle is held by exactly one owner at a time.
//!
//! # Errors
//!
//! Driver operations return [`HarnessError`]. Host-facing operations that can
//! fail return [`NetworkError`], which maps onto the server's [`ErrorCode`].
//! Nothing panics on exhausted capacity.
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//!
//! use harness::{ConnectionId, Harness, HarnessConfig, HostServer, Network, NetworkHandle};
//!
//! struct Echo;
//!
//! impl HostServer for Echo {
//!     type Handle = NetworkHandle;
//!     type Listener = ();
//!
//!     fn new_connection(
//!         &mut self,
//!         _net: &mut dyn Network<Listener = ()>,
//!         _listener: (),
//!         handle: NetworkHandle,
//!         _outbound_counter: u32,
//!     ) -> NetworkHandle {
//!         handle
//!     }
//!
//!     fn close(&mut self, _net: &mut dyn Network<Listener = ()>, _handle: NetworkHandle) {}
//!
//!     fn receive_line(&mut self, net: &mut dyn Network<Listener = ()>, handle: &NetworkHandle, line: &str) {
//!         net.send_line(*handle, line, true);
//!     }
//! }
//!
//! let mut server = Echo;
//! let mut harness = Harness::new(HarnessConfig::default());
//! let conn = harness.create_connection(&mut server, 2).unwrap();
//! assert_eq!(conn, ConnectionId::new(0));
//!
//! harness.queue_input(conn, "hello").unwrap();
//! assert!(harness.process_io(&mut server, Duration::ZERO));
//! assert_eq!(harness.output(), b"hello\n");
//! ```
//!
//! # See also
//!
//! - [`logging`] for the tracing targets the harness emits under.

mod capture;
mod config;
mod connection;
mod error;
mod handle;
mod harness;
mod host;
mod listener;
mod queue;
mod session;
mod trace;
mod util;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use capture::CaptureBuffer;
pub use config::{
    DEFAULT_CAPTURE_CAPACITY, DEFAULT_INPUT_QUEUE_DEPTH, DEFAULT_MAX_CONNECTIONS,
    DEFAULT_MAX_LISTENERS, DEFAULT_MAX_PUMP_ROUNDS, HarnessConfig, HarnessConfigBuilder,
    SuspendedInput,
};
pub use connection::{ConnectionSlot, ConnectionTable};
pub use error::{ErrorCode, HarnessError, HarnessResult, NetworkError};
pub use handle::{ConnectionId, ListenerHandle, NetworkHandle};
pub use crate::harness::{Harness, PROTOCOL_NAME, UNKNOWN_CONNECTION_NAME};
pub use host::{HostServer, ListenerRegistration, Network, Objid, Var};
pub use listener::ListenerTable;
pub use queue::{InputQueue, PendingLine};
pub use session::Session;
pub use util::{CompiledProgram, ValueRelease, free_var, program_bytecode_size};
