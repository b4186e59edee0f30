// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The worker role: reconstructs inherited listeners, starts user servers,
//! retires the worker it replaced, and shuts down on signal or orphaning.

mod watcher;

use std::os::unix::io::{FromRawFd, RawFd};
use std::sync::Arc;
use std::time::Duration;

use nix::sys::signal::kill;
use tokio::net::TcpListener as TokioTcpListener;
use tokio::signal::unix::{signal, SignalKind};
use tracing::{info, warn};

use grace_core::{Config, GraceError};

use crate::env;
use crate::fdpass::FIRST_INHERITED_FD;
use crate::listener::Listener;
use crate::service::Service;

pub async fn run(config: Config, services: Vec<Service>) -> Result<(), GraceError> {
    let listeners = reconstruct_listeners(&services, &config)?;
    info!(services = listeners.len(), pid = std::process::id(), "worker starting");

    for (svc, listener) in services.iter().cloned().zip(listeners) {
        let on_start = Arc::clone(&svc.on_start);
        let name = svc.name().to_string();
        tokio::spawn(async move {
            if let Err(err) = on_start.start(listener).await {
                warn!(service = %name, %err, "service start callback returned an error");
            }
        });
    }

    retire_old_worker();

    let master_dead = watcher::spawn(config.watch_interval());
    let mut stop_signal =
        signal(SignalKind::terminate()).map_err(GraceError::Io)?;

    tokio::select! {
        biased;
        _ = master_dead.cancelled() => {
            info!("worker stopping: master is gone");
        }
        _ = stop_signal.recv() => {
            info!("worker received stop signal");
        }
    }

    stop_all(&services, config.stop_timeout()).await;
    Ok(())
}

fn reconstruct_listeners(services: &[Service], config: &Config) -> Result<Vec<Listener>, GraceError> {
    services
        .iter()
        .enumerate()
        .map(|(i, svc)| {
            let fd = FIRST_INHERITED_FD + i as RawFd;
            // Safety: the master's pre_exec hook placed a live listening
            // socket at this descriptor before `exec`, one per registered
            // service in order; this is the only place that reclaims it.
            let std_listener = unsafe { std::net::TcpListener::from_raw_fd(fd) };
            std_listener
                .set_nonblocking(true)
                .map_err(|source| GraceError::ListenerReconstruction { fd, source })?;
            let tokio_listener = TokioTcpListener::from_std(std_listener)
                .map_err(|source| GraceError::ListenerReconstruction { fd, source })?;
            Ok(Listener::new(
                tokio_listener,
                svc.addr().clone(),
                config.connection_limit_enabled(),
                config.max_connections(),
            ))
        })
        .collect()
}

fn retire_old_worker() {
    match env::old_worker_pid() {
        Ok(Some(pid)) => {
            if let Err(err) = kill(pid, env::WORKER_STOP_SIGNAL) {
                warn!(%err, old_worker_pid = pid.as_raw(), "failed to signal old worker; it may already be gone");
            }
        }
        Ok(None) => {}
        Err(err) => warn!(%err, "ignoring malformed old-worker-pid environment value"),
    }
}

/// Invoke every service's shutdown callback, in registration order, each
/// bounded by `stop_timeout`. A callback that exceeds its timeout is
/// abandoned (its task keeps running but is no longer awaited) rather than
/// allowed to block the remaining callbacks indefinitely.
async fn stop_all(services: &[Service], stop_timeout: Duration) {
    for svc in services {
        let name = svc.name().to_string();
        let on_shutdown = Arc::clone(&svc.on_shutdown);
        match tokio::time::timeout(stop_timeout, on_shutdown.shutdown()).await {
            Ok(Ok(())) => info!(service = %name, "shutdown callback completed"),
            Ok(Err(err)) => warn!(service = %name, %err, "shutdown callback returned an error"),
            Err(_) => warn!(service = %name, timeout = ?stop_timeout, "shutdown callback did not complete within the stop timeout"),
        }
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
