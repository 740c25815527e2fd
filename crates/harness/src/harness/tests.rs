use std::time::Duration;

use super::*;
use crate::config::SuspendedInput;
use crate::error::{HarnessError, NetworkError};
use crate::host::{Network, Var};
use crate::test_support::{HostEvent, ListenerToken, RecordingServer};

type TestHarness = Harness<RecordingServer>;

fn small_config() -> HarnessConfig {
    HarnessConfig::builder()
        .capture_capacity(8)
        .max_connections(2)
        .max_listeners(1)
        .input_queue_depth(4)
        .build()
        .expect("valid config")
}

fn pump(harness: &mut TestHarness, server: &mut RecordingServer) -> bool {
    harness.process_io(server, Duration::ZERO)
}

// ==================== Lifecycle ====================

#[test]
fn new_harness_is_initialized_and_empty() {
    let harness = TestHarness::default();
    assert!(harness.is_initialized());
    assert_eq!(harness.connection_count(), 0);
    assert_eq!(harness.listener_count(), 0);
    assert_eq!(harness.output_len(), 0);
    assert_eq!(harness.output_with_nul(), b"\0");
    assert_eq!(harness.output_capacity(), 1024 * 1024);
}

#[test]
fn cleanup_releases_capture_and_blocks_connections() {
    let mut server = RecordingServer::new();
    let mut harness = TestHarness::default();
    let conn = harness.create_connection(&mut server, 1).expect("slot");
    let handle = harness.network_handle(conn).expect("active");
    harness.queue_input(conn, "look").expect("room");

    harness.cleanup();

    assert!(!harness.is_initialized());
    assert_eq!(harness.queued_lines(), 0);
    assert!(harness.output_with_nul().is_empty());
    assert!(!harness.send_line(handle, "late", true));
    assert_eq!(
        harness.create_connection(&mut server, 1),
        Err(HarnessError::NotInitialized)
    );
    assert_eq!(
        harness.queue_input(conn, "look"),
        Err(HarnessError::NotInitialized)
    );
    assert!(!pump(&mut harness, &mut server));
    assert!(server.received().is_empty());
    assert_eq!(harness.queued_lines(), 0);
}

#[test]
fn initialize_reinitializes_after_cleanup() {
    let mut harness = TestHarness::new(small_config());
    harness.cleanup();

    assert_eq!(harness.initialize(&[]), Var::Int(0));
    assert!(harness.is_initialized());
    assert_eq!(harness.output_capacity(), 8);
}

#[test]
fn initialize_leaves_live_harness_alone() {
    let mut server = RecordingServer::new();
    let mut harness = TestHarness::default();
    harness.create_connection(&mut server, 1).expect("slot");

    assert_eq!(harness.initialize(&["-p".to_owned()]), Var::Int(0));
    assert_eq!(harness.connection_count(), 1);
}

#[test]
fn shutdown_deactivates_without_notifying_host() {
    let mut server = RecordingServer::new();
    let mut harness = TestHarness::default();
    let conn = harness.create_connection(&mut server, 1).expect("slot");
    harness
        .make_listener(ListenerToken(3), &Var::Int(7777))
        .expect("listener");
    harness.queue_input(conn, "look").expect("room");

    harness.shutdown();

    assert_eq!(harness.connection_count(), 0);
    assert_eq!(harness.listener_count(), 0);
    assert_eq!(harness.scan_active_slots(), (0, 0));
    assert!(server.closed().is_empty());
    assert_eq!(harness.queued_lines(), 1);
    assert!(!pump(&mut harness, &mut server));
    assert_eq!(harness.queued_lines(), 0);
    assert!(server.received().is_empty());
}

// ==================== Connections ====================

#[test]
fn create_connection_registers_with_default_listener() {
    let mut server = RecordingServer::new();
    let mut harness = TestHarness::default();

    let conn = harness.create_connection(&mut server, 42).expect("slot");

    assert_eq!(conn, ConnectionId::new(0));
    assert_eq!(harness.connection_count(), 1);
    assert_eq!(
        server.events(),
        [HostEvent::Connected {
            connection: conn,
            listener: ListenerToken::default(),
            outbound_counter: 0,
        }]
    );
    let slot = harness.connection(conn).expect("active");
    assert!(!slot.is_binary());
    assert!(!slot.is_input_suspended());
    assert_eq!(slot.server_handle().map(|h| h.serial()), Some(0));
}

#[test]
fn create_connection_uses_first_active_listener() {
    let mut server = RecordingServer::new();
    let mut harness = TestHarness::default();
    harness
        .make_listener(ListenerToken(9), &Var::Int(0))
        .expect("listener");

    let conn = harness.create_connection(&mut server, 1).expect("slot");

    let slot = harness.connection(conn).expect("active");
    assert_eq!(slot.server_handle().map(|h| h.listener()), Some(ListenerToken(9)));
}

#[test]
fn connection_table_full_is_reported() {
    let mut server = RecordingServer::new();
    let mut harness = TestHarness::new(small_config());
    harness.create_connection(&mut server, 1).expect("slot 0");
    harness.create_connection(&mut server, 2).expect("slot 1");

    assert_eq!(
        harness.create_connection(&mut server, 3),
        Err(HarnessError::ConnectionTableFull)
    );
    assert_eq!(harness.connection_count(), 2);
    assert_eq!(server.connections_registered(), 2);
}

#[test]
fn freed_slot_is_reused_lowest_first() {
    let mut server = RecordingServer::new();
    let mut harness = TestHarness::default();
    let first = harness.create_connection(&mut server, 1).expect("slot");
    let _second = harness.create_connection(&mut server, 2).expect("slot");

    assert!(harness.close_connection(&mut server, first));
    let third = harness.create_connection(&mut server, 3).expect("slot");

    assert_eq!(third, first);
    assert_eq!(harness.connection_count(), 2);
}

#[test]
fn host_refusing_registration_leaves_slot_free() {
    let mut server = RecordingServer::new().refusing_connections();
    let mut harness = TestHarness::default();

    assert_eq!(
        harness.create_connection(&mut server, 1),
        Err(HarnessError::InactiveConnection(ConnectionId::new(0)))
    );
    assert_eq!(harness.connection_count(), 0);
    assert_eq!(harness.scan_active_slots(), (0, 0));
}

#[test]
fn close_connection_notifies_host_once() {
    let mut server = RecordingServer::new();
    let mut harness = TestHarness::default();
    let conn = harness.create_connection(&mut server, 1).expect("slot");

    assert!(harness.close_connection(&mut server, conn));
    assert!(!harness.close_connection(&mut server, conn));
    assert!(!harness.close_connection(&mut server, ConnectionId::new(99)));

    assert_eq!(server.closed(), [conn]);
    assert_eq!(harness.connection_count(), 0);
}

#[test]
fn host_closing_inside_close_callback_does_not_double_count() {
    let mut server = RecordingServer::new().closing_network_on_close();
    let mut harness = TestHarness::default();
    let a = harness.create_connection(&mut server, 1).expect("slot");
    harness.create_connection(&mut server, 2).expect("slot");

    assert!(harness.close_connection(&mut server, a));

    assert_eq!(harness.connection_count(), 1);
    assert_eq!(harness.scan_active_slots().0, 1);
}

#[test]
fn host_close_releases_slot_without_callback() {
    let mut server = RecordingServer::new();
    let mut harness = TestHarness::default();
    let conn = harness.create_connection(&mut server, 1).expect("slot");
    let handle = harness.network_handle(conn).expect("active");

    harness.close(handle);
    harness.close(handle);

    assert_eq!(harness.connection_count(), 0);
    assert!(server.closed().is_empty());
    assert_eq!(
        harness.connection(conn).err(),
        Some(HarnessError::InactiveConnection(conn))
    );
}

#[test]
fn connection_name_tracks_liveness() {
    let mut server = RecordingServer::new();
    let mut harness = TestHarness::default();
    harness.create_connection(&mut server, 1).expect("slot");
    let conn = harness.create_connection(&mut server, 2).expect("slot");
    let handle = harness.network_handle(conn).expect("active");

    assert_eq!(harness.connection_name(handle), "harness connection 1");
    harness.close(handle);
    assert_eq!(harness.connection_name(handle), UNKNOWN_CONNECTION_NAME);

    let reused = harness.create_connection(&mut server, 3).expect("slot");
    assert_eq!(reused, conn);
    assert_eq!(harness.connection_name(handle), UNKNOWN_CONNECTION_NAME);
}

#[test]
fn binary_flag_is_stored() {
    let mut server = RecordingServer::new();
    let mut harness = TestHarness::default();
    let conn = harness.create_connection(&mut server, 1).expect("slot");
    let handle = harness.network_handle(conn).expect("active");

    harness.set_connection_binary(handle, true);
    assert!(harness.connection(conn).expect("active").is_binary());
    harness.set_connection_binary(handle, false);
    assert!(!harness.connection(conn).expect("active").is_binary());
}

#[test]
fn option_queries_are_unsupported() {
    let mut server = RecordingServer::new();
    let mut harness = TestHarness::default();
    let conn = harness.create_connection(&mut server, 1).expect("slot");
    let handle = harness.network_handle(conn).expect("active");
    let list = Var::List(vec![Var::Str("binary".to_owned())]);

    assert_eq!(harness.connection_options(handle, list.clone()), list);
    assert_eq!(harness.connection_option(handle, "binary"), None);
    assert!(!harness.set_connection_option(handle, "binary", &Var::Int(1)));
    assert_eq!(harness.buffered_output_length(handle), 0);
    assert_eq!(harness.protocol_name(), "harness");
    assert_eq!(harness.usage_string(), "");
}

// ==================== Listeners ====================

#[test]
fn make_listener_names_slot_and_returns_empty_canonical() {
    let mut harness = TestHarness::default();

    let registration = harness
        .make_listener(ListenerToken(1), &Var::Int(7777))
        .expect("listener");

    assert_eq!(registration.name, "harness listener 0");
    assert_eq!(registration.canonical, Var::List(Vec::new()));
    let handle = registration.handle;
    assert!(harness.listen(handle));
    assert!(harness.is_listener_active(handle));
    assert_eq!(harness.listener_count(), 1);
}

#[test]
fn listener_quota_and_reuse() {
    let mut harness = TestHarness::new(small_config());
    let first = harness
        .make_listener(ListenerToken(1), &Var::Int(0))
        .expect("listener")
        .handle;

    assert_eq!(
        harness.make_listener(ListenerToken(2), &Var::Int(0)).err(),
        Some(NetworkError::Quota)
    );

    harness.close_listener(first);
    harness.close_listener(first);
    assert_eq!(harness.listener_count(), 0);

    let second = harness
        .make_listener(ListenerToken(2), &Var::Int(0))
        .expect("slot reused")
        .handle;
    assert_eq!(second.index(), 0);
    assert!(!harness.is_listener_active(first));
}

#[cfg(feature = "outbound")]
#[test]
fn outbound_connections_are_refused() {
    let mut harness = TestHarness::default();
    assert_eq!(
        harness.open_outbound_connection(&Var::Str("localhost".to_owned()), ListenerToken(0)),
        Err(NetworkError::Permission)
    );
    assert_eq!(harness.connection_count(), 0);
}

// ==================== Capture ====================

#[test]
fn sends_respect_capture_capacity() {
    let mut server = RecordingServer::new();
    let mut harness = TestHarness::new(small_config());
    let conn = harness.create_connection(&mut server, 1).expect("slot");
    let handle = harness.network_handle(conn).expect("active");

    assert!(harness.send_line(handle, "abcde", true));
    assert_eq!(harness.output(), b"abcde\n");
    assert!(harness.send_bytes(handle, b"x", true));
    assert!(!harness.send_bytes(handle, b"y", true));
    assert!(!harness.send_line(handle, "", true));
    assert_eq!(harness.output(), b"abcde\nx");
    assert_eq!(harness.output_with_nul(), b"abcde\nx\0");

    harness.clear_output();
    assert_eq!(harness.output_len(), 0);
    assert!(harness.send_line(handle, "again", true));
    assert_eq!(harness.output_lossy(), "again\n");
}

// ==================== Queue and pump ====================

#[test]
fn queue_input_rejects_unknown_connections() {
    let mut server = RecordingServer::new();
    let mut harness = TestHarness::new(small_config());

    assert_eq!(
        harness.queue_input(ConnectionId::new(5), "x"),
        Err(HarnessError::InvalidConnection(5))
    );
    assert_eq!(
        harness.queue_input(ConnectionId::new(0), "x"),
        Err(HarnessError::InactiveConnection(ConnectionId::new(0)))
    );

    let conn = harness.create_connection(&mut server, 1).expect("slot");
    for line in ["a", "b", "c"] {
        harness.queue_input(conn, line).expect("room");
    }
    assert_eq!(harness.queue_input(conn, "d"), Err(HarnessError::QueueFull));
    assert_eq!(harness.queued_lines(), 3);
}

#[test]
fn pump_delivers_in_queue_order_across_connections() {
    let mut server = RecordingServer::new();
    let mut harness = TestHarness::default();
    let a = harness.create_connection(&mut server, 1).expect("slot");
    let b = harness.create_connection(&mut server, 2).expect("slot");
    harness.queue_input(a, "one").expect("room");
    harness.queue_input(b, "two").expect("room");
    harness.queue_input(a, "three").expect("room");

    assert!(pump(&mut harness, &mut server));

    assert_eq!(server.received(), [(a, "one"), (b, "two"), (a, "three")]);
    assert_eq!(harness.queued_lines(), 0);
    assert!(!pump(&mut harness, &mut server));
}

#[test]
fn pump_restores_server_handle_after_delivery() {
    let mut server = RecordingServer::new();
    let mut harness = TestHarness::default();
    let conn = harness.create_connection(&mut server, 1).expect("slot");
    harness.queue_input(conn, "look").expect("room");

    pump(&mut harness, &mut server);

    let slot = harness.connection(conn).expect("active");
    assert_eq!(slot.server_handle().map(|h| h.serial()), Some(0));
}

#[test]
fn lines_for_closed_slot_are_not_delivered_to_its_successor() {
    let mut server = RecordingServer::new();
    let mut harness = TestHarness::default();
    let conn = harness.create_connection(&mut server, 1).expect("slot");
    harness.queue_input(conn, "stale").expect("room");
    harness.close_connection(&mut server, conn);
    let successor = harness.create_connection(&mut server, 2).expect("slot");
    assert_eq!(successor, conn);

    assert!(!pump(&mut harness, &mut server));
    assert!(server.received().is_empty());
}

#[test]
fn host_closing_during_delivery_drops_remaining_lines() {
    let mut server = RecordingServer::new().closing_on("@quit");
    let mut harness = TestHarness::default();
    let conn = harness.create_connection(&mut server, 1).expect("slot");
    harness.queue_input(conn, "@quit").expect("room");
    harness.queue_input(conn, "look").expect("room");

    assert!(pump(&mut harness, &mut server));

    assert_eq!(server.received_lines(), ["@quit"]);
    assert_eq!(harness.connection_count(), 0);
    assert!(server.closed().is_empty());
    assert_eq!(harness.queued_lines(), 0);
}

#[test]
fn suspended_input_is_discarded_by_default() {
    let mut server = RecordingServer::new();
    let mut harness = TestHarness::default();
    let conn = harness.create_connection(&mut server, 1).expect("slot");
    let handle = harness.network_handle(conn).expect("active");

    harness.suspend_input(handle);
    harness.queue_input(conn, "held").expect("room");
    assert!(!pump(&mut harness, &mut server));
    assert_eq!(harness.queued_lines(), 0);

    harness.resume_input(handle);
    assert!(!pump(&mut harness, &mut server));
    assert!(server.received().is_empty());
}

#[test]
fn suspended_input_can_be_retained() {
    let config = HarnessConfig::builder()
        .suspended_input(SuspendedInput::Retain)
        .build()
        .expect("valid config");
    let mut server = RecordingServer::new();
    let mut harness = TestHarness::new(config);
    let held = harness.create_connection(&mut server, 1).expect("slot");
    let live = harness.create_connection(&mut server, 2).expect("slot");
    let handle = harness.network_handle(held).expect("active");

    harness.suspend_input(handle);
    harness.queue_input(held, "first").expect("room");
    harness.queue_input(live, "other").expect("room");
    harness.queue_input(held, "second").expect("room");

    assert!(pump(&mut harness, &mut server));
    assert_eq!(server.received_lines(), ["other"]);
    assert_eq!(harness.queued_lines(), 2);

    harness.resume_input(handle);
    assert!(pump(&mut harness, &mut server));
    assert_eq!(server.received_lines(), ["other", "first", "second"]);
    assert_eq!(harness.queued_lines(), 0);
}

#[test]
fn host_suspending_mid_pump_affects_later_lines() {
    let mut server = RecordingServer::new().suspending_on("@pause");
    let mut harness = TestHarness::default();
    let conn = harness.create_connection(&mut server, 1).expect("slot");
    harness.queue_input(conn, "@pause").expect("room");
    harness.queue_input(conn, "after").expect("room");

    pump(&mut harness, &mut server);

    assert_eq!(server.received_lines(), ["@pause"]);
    assert!(harness.connection(conn).expect("active").is_input_suspended());
}

#[test]
fn replies_land_in_capture_buffer() {
    let mut server = RecordingServer::new().with_reply("look", ["A dark room.", "Exits: north"]);
    let mut harness = TestHarness::default();
    let conn = harness.create_connection(&mut server, 1).expect("slot");
    harness.queue_input(conn, "look").expect("room");

    pump(&mut harness, &mut server);

    assert_eq!(harness.output_lossy(), "A dark room.\nExits: north\n");
}
