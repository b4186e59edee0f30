// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::io::{Read, Write};
use std::net::TcpStream;
use std::time::Duration;

use nix::sys::signal::Signal;
use serial_test::serial;

use crate::support::{self, Fixture};

#[test]
#[serial(grace_fixture_bin)]
fn cold_start_one_service_echoes_and_stops_on_signal() {
    let fixture = Fixture::spawn(&[8201]);
    let master_pid = fixture.wait_master_ready();
    let worker = fixture.wait_worker_ready();
    assert_eq!(worker.port, 8201);
    assert_eq!(worker.name, "svc0");

    let mut stream = TcpStream::connect(("127.0.0.1", 8201)).expect("connect");
    stream.set_read_timeout(Some(Duration::from_secs(2))).expect("set timeout");
    stream.write_all(b"ping").expect("write");
    let mut buf = [0u8; 4];
    stream.read_exact(&mut buf).expect("read echo");
    assert_eq!(&buf, b"ping");
    drop(stream);

    fixture.send_signal(master_pid, Signal::SIGTERM);

    let master_gone = support::wait_for(|| !support::process_exists(master_pid));
    assert!(master_gone, "master should exit after a stop signal");

    let worker_gone = support::wait_for(|| !support::process_exists(worker.pid));
    assert!(worker_gone, "worker should exit within the stop timeout");
}
