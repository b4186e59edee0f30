// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use nix::sys::signal::Signal;
use serial_test::serial;

use crate::support::Fixture;

#[test]
#[serial(grace_fixture_bin)]
fn services_are_reachable_on_the_ports_they_were_registered_with_in_order() {
    let fixture = Fixture::spawn(&[8241, 8242]);
    let master_pid = fixture.wait_master_ready();

    let workers = fixture.wait_worker_ready_n(2);
    assert_eq!(workers[0].name, "svc0");
    assert_eq!(workers[0].port, 8241);
    assert_eq!(workers[1].name, "svc1");
    assert_eq!(workers[1].port, 8242);

    fixture.send_signal(master_pid, Signal::SIGTERM);
}

#[test]
#[serial(grace_fixture_bin)]
fn swapping_registration_order_swaps_which_descriptor_serves_which_port() {
    let fixture = Fixture::spawn(&[8252, 8251]);
    let master_pid = fixture.wait_master_ready();

    let workers = fixture.wait_worker_ready_n(2);
    assert_eq!(workers[0].name, "svc0");
    assert_eq!(workers[0].port, 8252);
    assert_eq!(workers[1].name, "svc1");
    assert_eq!(workers[1].port, 8251);

    fixture.send_signal(master_pid, Signal::SIGTERM);
}
