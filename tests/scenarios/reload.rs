// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::io::{Read, Write};
use std::net::TcpStream;
use std::time::Duration;

use nix::sys::signal::Signal;
use serial_test::serial;

use crate::support::{self, Fixture};

fn echo_once(port: u16, payload: &[u8]) -> std::io::Result<()> {
    let mut stream = TcpStream::connect(("127.0.0.1", port))?;
    stream.set_read_timeout(Some(Duration::from_secs(2)))?;
    stream.write_all(payload)?;
    let mut buf = vec![0u8; payload.len()];
    stream.read_exact(&mut buf)?;
    assert_eq!(buf, payload);
    Ok(())
}

#[test]
#[serial(grace_fixture_bin)]
fn reload_spawns_a_new_worker_and_retires_the_old_one_without_dropping_the_port() {
    let fixture = Fixture::spawn(&[8210]);
    let master_pid = fixture.wait_master_ready();
    let first_worker = fixture.wait_worker_ready();
    assert_eq!(first_worker.port, 8210);

    echo_once(8210, b"before-reload").expect("echo before reload");

    fixture.send_signal(master_pid, Signal::SIGHUP);

    let second_worker = fixture.wait_worker_ready();
    assert_ne!(second_worker.pid, first_worker.pid, "reload must spawn a distinct worker process");
    assert_eq!(second_worker.port, 8210);

    let old_worker_gone =
        support::wait_for(|| !support::process_exists(first_worker.pid));
    assert!(old_worker_gone, "the retired worker should stop after the new one signals it");

    echo_once(8210, b"after-reload").expect("echo after reload, port still bound");

    fixture.send_signal(master_pid, Signal::SIGTERM);
    assert!(support::wait_for(|| !support::process_exists(master_pid)));
    assert!(support::wait_for(|| !support::process_exists(second_worker.pid)));
}
