// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Orphan detection: polling for reparenting to init as a master-death signal.
//!
//! No portable "parent died" notification exists across POSIX systems, so
//! the worker polls its own parent PID at the configured interval instead.

use std::time::Duration;

use nix::unistd::{getppid, Pid};
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Spawn the background watcher task. The returned token is cancelled the
/// moment the worker observes `getppid() == 1`.
pub(crate) fn spawn(watch_interval: Duration) -> CancellationToken {
    let token = CancellationToken::new();
    let watcher_token = token.clone();

    tokio::spawn(async move {
        loop {
            if getppid() == Pid::from_raw(1) {
                warn!(pid = std::process::id(), "master is gone, stopping worker");
                watcher_token.cancel();
                return;
            }
            tokio::time::sleep(watch_interval).await;
        }
    });

    token
}

#[cfg(test)]
#[path = "watcher_tests.rs"]
mod tests;
