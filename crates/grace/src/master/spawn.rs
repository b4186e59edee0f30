// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Binding the registered services and spawning a worker that inherits them.

use std::net::SocketAddr;
use std::os::unix::io::{AsRawFd, RawFd};
use std::process::Stdio;

use nix::unistd::Pid;
use socket2::{Domain, Protocol, Socket, Type};
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::info;

use grace_core::GraceError;

use crate::env;
use crate::fdpass;
use crate::service::Service;

const LISTEN_BACKLOG: i32 = 1024;

/// A service's bound, not-yet-inherited listening socket, kept alive for the
/// lifetime of the master.
///
/// The socket stays open for as long as this value is held, independent of
/// whatever a forked worker inherits from it, so the master can keep
/// re-forking workers against the same bound socket across many reloads.
pub(crate) struct BoundService {
    pub(crate) listener: std::net::TcpListener,
}

pub(crate) fn bind_all(services: &[Service]) -> Result<Vec<BoundService>, GraceError> {
    services
        .iter()
        .map(|svc| {
            let listener = bind_one(svc.addr())?;
            info!(service = svc.name(), addr = %svc.addr(), "bound listening socket");
            Ok(BoundService { listener })
        })
        .collect()
}

fn bind_one(addr: &grace_core::Address) -> Result<std::net::TcpListener, GraceError> {
    let to_bind_err = |source: std::io::Error| GraceError::Bind { addr: addr.addr().to_string(), source };

    let socket_addr: SocketAddr = addr
        .addr()
        .parse()
        .map_err(|_| to_bind_err(std::io::Error::new(std::io::ErrorKind::InvalidInput, "invalid socket address")))?;

    let domain = if socket_addr.is_ipv4() { Domain::IPV4 } else { Domain::IPV6 };
    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP)).map_err(to_bind_err)?;
    socket.set_reuse_address(true).map_err(to_bind_err)?;
    socket.bind(&socket_addr.into()).map_err(to_bind_err)?;
    socket.listen(LISTEN_BACKLOG).map_err(to_bind_err)?;

    Ok(socket.into())
}

/// Fork-and-exec a fresh worker that inherits every bound listener.
///
/// The child's own copy of each source descriptor is produced by `fork`
/// (which duplicates the whole descriptor table), not by anything done
/// here; this function only arranges for those already-inherited numbers to
/// land at `3, 4, …` before `exec` runs, via [`fdpass::remap_for_exec`].
pub(crate) async fn spawn_worker(
    bound: &[BoundService],
    old_worker_pid: Pid,
    exit_tx: mpsc::UnboundedSender<std::io::Result<std::process::ExitStatus>>,
) -> Result<Pid, GraceError> {
    let exe = std::env::current_exe().map_err(GraceError::Io)?;
    let args: Vec<_> = std::env::args_os().skip(1).collect();
    let fds: Vec<RawFd> = bound.iter().map(|b| b.listener.as_raw_fd()).collect();

    let mut cmd = Command::new(&exe);
    cmd.args(&args);
    cmd.env(env::ENV_WORKER, env::ENV_WORKER_VAL);
    cmd.env(env::ENV_OLD_WORKER_PID, old_worker_pid.as_raw().to_string());
    cmd.stdin(Stdio::inherit());
    cmd.stdout(Stdio::inherit());
    cmd.stderr(Stdio::inherit());

    // Safety: this closure runs in the forked child between `fork` and
    // `exec`, with a single thread alive. `remap_for_exec` only calls
    // `fcntl`, `dup2`, and `close`, all async-signal-safe, and allocates
    // nothing beyond a small stack-local buffer.
    unsafe {
        use std::os::unix::process::CommandExt;
        cmd.pre_exec(move || fdpass::remap_for_exec(&fds));
    }

    let mut child = cmd.spawn().map_err(GraceError::Spawn)?;
    let pid = child
        .id()
        .map(|raw| Pid::from_raw(raw as i32))
        .ok_or_else(|| GraceError::Spawn(std::io::Error::new(std::io::ErrorKind::Other, "worker exited before its pid could be read")))?;

    tokio::spawn(async move {
        let status = child.wait().await;
        let _ = exit_tx.send(status);
    });

    info!(pid = pid.as_raw(), "spawned worker");
    Ok(pid)
}

#[cfg(test)]
#[path = "spawn_tests.rs"]
mod tests;
