//! crates/harness/src/session.rs
//!
//! A harness paired with the host server it drives.
//!
//! [`Session`] is the convenience layer most tests use: it owns both halves,
//! initializes the network layer on construction, and tears it down when
//! dropped. [`Session::execute_command`] runs a command through the host
//! until the host stops producing work, then returns whatever it printed.

use std::time::Duration;

use crate::config::HarnessConfig;
use crate::error::{HarnessError, HarnessResult, NetworkError};
use crate::handle::{ConnectionId, ListenerHandle};
use crate::harness::Harness;
use crate::host::{HostServer, Network, Objid, Var};

/// A harness together with the host server under test.
pub struct Session<S: HostServer> {
    harness: Harness<S>,
    server: S,
}

impl<S: HostServer> Session<S> {
    /// Initializes a harness sized by `config` and runs the host-side
    /// `initialize`.
    #[must_use]
    pub fn new(server: S, config: HarnessConfig) -> Self {
        let mut harness = Harness::new(config);
        let _descriptor = harness.initialize(&[]);
        Self { harness, server }
    }

    /// Returns the harness.
    #[must_use]
    pub const fn harness(&self) -> &Harness<S> {
        &self.harness
    }

    /// Returns the harness mutably.
    pub const fn harness_mut(&mut self) -> &mut Harness<S> {
        &mut self.harness
    }

    /// Returns the host server.
    #[must_use]
    pub const fn server(&self) -> &S {
        &self.server
    }

    /// Opens a listener for `token` and starts listening on it.
    ///
    /// # Errors
    ///
    /// [`NetworkError::Quota`] when the listener table is full.
    pub fn open_listener(&mut self, token: S::Listener) -> Result<ListenerHandle, NetworkError> {
        let handle = self.harness.make_listener(token, &Var::Int(0))?.handle;
        self.harness.listen(handle);
        Ok(handle)
    }

    /// Connects `player`, registering the connection with the host.
    ///
    /// # Errors
    ///
    /// See [`Harness::create_connection`].
    pub fn connect(&mut self, player: Objid) -> HarnessResult<ConnectionId> {
        self.harness.create_connection(&mut self.server, player)
    }

    /// Closes a connection, telling the host. Returns `false` for unknown ids.
    pub fn disconnect(&mut self, conn: ConnectionId) -> bool {
        self.harness.close_connection(&mut self.server, conn)
    }

    /// Runs `command` on `conn` and returns everything the host printed.
    ///
    /// The output buffer is cleared first. After the command line is
    /// delivered the host's ready tasks are run and the pump repeated until a
    /// pump delivers nothing or the configured round limit is reached.
    ///
    /// # Errors
    ///
    /// Fails when the connection is not active or the input queue is full.
    pub fn execute_command(&mut self, conn: ConnectionId, command: &str) -> HarnessResult<String> {
        if !self.harness.is_initialized() {
            return Err(HarnessError::NotInitialized);
        }
        self.harness.clear_output();
        self.harness.queue_input(conn, command)?;
        self.harness.process_io(&mut self.server, Duration::ZERO);

        for _ in 0..self.harness.config().max_pump_rounds() {
            self.server.run_ready_tasks(&mut self.harness);
            if !self.harness.process_io(&mut self.server, Duration::ZERO) {
                break;
            }
        }
        Ok(self.output())
    }

    /// Alternates the pump and the host's task runner `iterations` times.
    pub fn pump_tasks(&mut self, iterations: usize) {
        for _ in 0..iterations {
            self.harness.process_io(&mut self.server, Duration::ZERO);
            self.server.run_ready_tasks(&mut self.harness);
        }
    }

    /// Returns the captured output without clearing it.
    #[must_use]
    pub fn output(&self) -> String {
        self.harness.output_lossy().into_owned()
    }

    /// Empties the captured output.
    pub fn clear_output(&mut self) {
        self.harness.clear_output();
    }
}

impl<S: HostServer> Drop for Session<S> {
    fn drop(&mut self) {
        self.harness.shutdown();
        self.harness.cleanup();
    }
}
