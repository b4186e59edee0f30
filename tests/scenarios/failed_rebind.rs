// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::io::{Read, Write};
use std::net::TcpStream;
use std::time::Duration;

use nix::sys::signal::Signal;
use serial_test::serial;

use std::os::unix::fs::PermissionsExt;

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

/// Deletes the fixture binary for the lifetime of the guard, restoring it
/// from a backup copy on drop even if the test panics mid-way.
///
/// A plain rename wouldn't force a failure here: `current_exe()` resolves
/// `/proc/self/exe`, which tracks the inode's live dentry and would happily
/// follow the binary to its new name. Removing it outright leaves the
/// already-running master's `/proc/self/exe` pointing at a now-nonexistent
/// path, so its next re-exec attempt gets a real `ENOENT`.
struct MovedAside {
    original: std::path::PathBuf,
    backup: std::path::PathBuf,
}

impl MovedAside {
    fn new() -> Self {
        let original = std::path::PathBuf::from(env!("CARGO_BIN_EXE_grace-fixture"));
        let mut backup = original.clone();
        backup.set_extension("backup");
        std::fs::copy(&original, &backup).expect("back up the fixture binary");
        std::fs::remove_file(&original).expect("remove the fixture binary");
        Self { original, backup }
    }
}

impl Drop for MovedAside {
    fn drop(&mut self) {
        let _ = std::fs::copy(&self.backup, &self.original);
        let _ = std::fs::set_permissions(&self.original, std::fs::Permissions::from_mode(0o755));
        let _ = std::fs::remove_file(&self.backup);
    }
}

#[test]
#[serial(grace_fixture_bin)]
fn a_reload_that_cannot_re_exec_leaves_the_previous_worker_serving() {
    let fixture = Fixture::spawn(&[8260]);
    let master_pid = fixture.wait_master_ready();
    let worker = fixture.wait_worker_ready();
    assert_eq!(worker.port, 8260);

    echo_once(8260, b"still-here").expect("echo before the broken reload");

    {
        let _parked = MovedAside::new();

        fixture.send_signal(master_pid, Signal::SIGHUP);

        // Give the master a chance to attempt (and fail) the re-exec. No new
        // WORKER READY line should show up, and the master itself must stay
        // alive rather than treating a failed reload as fatal.
        std::thread::sleep(Duration::from_millis(300));
        assert!(support::process_exists(master_pid), "a failed reload must not bring the master down");
        assert!(support::process_exists(worker.pid), "the previous worker must keep running");

        echo_once(8260, b"still-serving-after-failed-reload")
            .expect("the retired-in-name-only worker keeps answering requests");
    }

    // Now that the binary is back in place, a further reload should succeed
    // normally, proving the earlier failure didn't wedge the master.
    fixture.send_signal(master_pid, Signal::SIGHUP);
    let new_worker = fixture.wait_worker_ready();
    assert_ne!(new_worker.pid, worker.pid);
    assert_eq!(new_worker.port, 8260);

    fixture.send_signal(master_pid, Signal::SIGTERM);
    assert!(support::wait_for(|| !support::process_exists(master_pid)));
}
