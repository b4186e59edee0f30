// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The master role: binds listening sockets, spawns and supervises a single
//! worker child, and translates signals into reload or stop actions.

mod spawn;

use nix::unistd::Pid;
use tokio::sync::mpsc;
use tracing::{info, warn};

use grace_core::{Config, GraceError};

use crate::service::Service;
use crate::signal::{self, SignalSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MasterEvent {
    Reload,
    Stop,
}

/// Run as the master for the lifetime of the process.
///
/// Returns only if binding fails before any worker is spawned; every other
/// path out of the supervision loop ends the process directly via
/// [`std::process::exit`], matching the master's "stop is a process exit"
/// contract — the master has no shutdown callbacks of its own to run.
pub async fn run(config: Config, services: Vec<Service>) -> Result<(), GraceError> {
    let bound = spawn::bind_all(&services)?;
    info!(services = bound.len(), pid = std::process::id(), "master starting");

    let (exit_tx, mut exit_rx) = mpsc::unbounded_channel();
    let mut worker_pid = spawn::spawn_worker(&bound, Pid::from_raw(0), exit_tx.clone()).await?;

    let mut signals = build_signal_set(&config).map_err(GraceError::Io)?;

    loop {
        tokio::select! {
            biased;

            Some(result) = exit_rx.recv() => {
                match result {
                    Ok(status) if !status.success() => {
                        warn!(?status, "a worker exited abnormally, master stopping");
                        std::process::exit(1);
                    }
                    Ok(_) => {
                        // A retiring previous worker exiting cleanly after
                        // handover is expected and does not affect the
                        // current worker.
                    }
                    Err(err) => {
                        warn!(%err, "failed to wait on a worker process");
                    }
                }
            }

            event = signals.recv() => {
                match event {
                    MasterEvent::Stop => {
                        info!("master received stop signal, stopping");
                        std::process::exit(1);
                    }
                    MasterEvent::Reload => {
                        info!("master received reload signal, spawning replacement worker");
                        match spawn::spawn_worker(&bound, worker_pid, exit_tx.clone()).await {
                            Ok(pid) => worker_pid = pid,
                            Err(err) => warn!(%err, "reload spawn failed, previous worker continues"),
                        }
                    }
                }
            }
        }
    }
}

fn build_signal_set(config: &Config) -> std::io::Result<SignalSet<MasterEvent>> {
    let mut entries = Vec::with_capacity(config.reload_signals().len() + config.stop_signals().len());
    entries.extend(config.reload_signals().iter().map(|&s| (signal::reload_to_nix(s), MasterEvent::Reload)));
    entries.extend(config.stop_signals().iter().map(|&s| (signal::stop_to_nix(s), MasterEvent::Stop)));
    SignalSet::install(&entries)
}
