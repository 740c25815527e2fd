//! The I/O pump: drains the input queue into the host.

use std::time::Duration;

use super::Harness;
use crate::config::SuspendedInput;
use crate::handle::NetworkHandle;
use crate::host::HostServer;
use crate::queue::PendingLine;
use crate::trace;

/// What the pump does with one dequeued line.
enum Disposition {
    Deliver(NetworkHandle),
    Suspended,
    Inactive,
}

impl<S: HostServer> Harness<S> {
    /// Delivers every queued line to `server`, in queue order.
    ///
    /// `timeout` is accepted for signature compatibility and ignored; the
    /// pump never blocks. Lines for inactive connections are dropped. Lines
    /// for suspended connections are dropped or kept for a later pump
    /// according to [`SuspendedInput`]. Returns `true` if at least one line
    /// reached the host.
    ///
    /// After [`Harness::cleanup`] nothing is delivered and any queued line is
    /// dropped.
    pub fn process_io(&mut self, server: &mut S, timeout: Duration) -> bool {
        let _ = timeout;
        if !self.initialized {
            let dropped = self.queue.len();
            self.queue.clear();
            trace::pump_finished(0, dropped, 0);
            return false;
        }
        let policy = self.config.suspended_input();
        let pending = self.queue.len();
        let (mut delivered, mut dropped, mut retained) = (0usize, 0usize, 0usize);

        for _ in 0..pending {
            let Some(entry) = self.queue.pop() else {
                break;
            };
            match self.disposition(&entry) {
                Disposition::Deliver(handle) => {
                    if self.deliver(server, handle, &entry) {
                        delivered += 1;
                    } else {
                        dropped += 1;
                    }
                }
                Disposition::Suspended if policy == SuspendedInput::Retain => {
                    // Popping freed a slot, so the push always succeeds.
                    if self.queue.push(entry).is_ok() {
                        retained += 1;
                    } else {
                        dropped += 1;
                    }
                }
                Disposition::Suspended => {
                    trace::line_dropped(entry.connection().index(), "input suspended");
                    dropped += 1;
                }
                Disposition::Inactive => {
                    trace::line_dropped(entry.connection().index(), "connection inactive");
                    dropped += 1;
                }
            }
        }

        trace::pump_finished(delivered, dropped, retained);
        delivered > 0
    }

    fn disposition(&self, entry: &PendingLine) -> Disposition {
        match self.connections.resolve(entry.target()) {
            None => Disposition::Inactive,
            Some(slot) if slot.is_input_suspended() => Disposition::Suspended,
            Some(_) => Disposition::Deliver(entry.target()),
        }
    }

    /// Lends the server handle to the host for the duration of the callback.
    fn deliver(&mut self, server: &mut S, handle: NetworkHandle, entry: &PendingLine) -> bool {
        let Some(server_handle) = self.connections.take_server_handle(handle) else {
            trace::line_dropped(entry.connection().index(), "no server handle");
            return false;
        };
        trace::line_delivered(entry.connection().index(), entry.line());
        server.receive_line(self, &server_handle, entry.line());
        // Dropped here if the host closed the connection during delivery.
        let _ = self.connections.attach(handle, server_handle);
        true
    }
}
