// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::io::{ErrorKind, Read, Write};
use std::net::TcpStream;
use std::time::Duration;

use nix::sys::signal::Signal;
use serial_test::serial;

use crate::support::Fixture;

fn connect(port: u16) -> TcpStream {
    let stream = TcpStream::connect(("127.0.0.1", port)).expect("connect");
    stream.set_read_timeout(Some(Duration::from_millis(300))).expect("set timeout");
    stream
}

fn echo(stream: &mut TcpStream, payload: &[u8]) {
    stream.write_all(payload).expect("write");
    let mut buf = vec![0u8; payload.len()];
    stream.read_exact(&mut buf).expect("read echo");
    assert_eq!(buf, payload);
}

#[test]
#[serial(grace_fixture_bin)]
fn a_connection_beyond_the_cap_waits_for_a_permit_to_free_up() {
    let fixture = Fixture::spawn_with_env(&[8220], &[("GRACE_FIXTURE_CAP", "2")]);
    let master_pid = fixture.wait_master_ready();
    let worker = fixture.wait_worker_ready();
    assert_eq!(worker.port, 8220);

    let mut first = connect(8220);
    let mut second = connect(8220);
    echo(&mut first, b"one");
    echo(&mut second, b"two");

    // The third connection completes its TCP handshake against the kernel's
    // listen backlog, but the service never calls `accept()` on it until a
    // permit frees up, so nothing echoes back yet.
    let mut third = connect(8220);
    third.write_all(b"three").expect("write while capped");
    let mut buf = [0u8; 5];
    let blocked = third.read_exact(&mut buf);
    assert!(
        matches!(blocked, Err(ref e) if e.kind() == ErrorKind::WouldBlock || e.kind() == ErrorKind::TimedOut),
        "expected the capped connection's read to time out, got {blocked:?}"
    );

    drop(first);

    third.set_read_timeout(Some(Duration::from_secs(2))).expect("extend timeout");
    third.read_exact(&mut buf).expect("read echo once a permit frees up");
    assert_eq!(&buf, b"three");

    fixture.send_signal(master_pid, Signal::SIGTERM);
}
