// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The listener wrapper handed to [`crate::service::StartHandler`]: a TCP
//! listener with an optional bound on concurrently open connections and a
//! single idempotent way to stop accepting.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use socket2::{SockRef, TcpKeepalive};
use tokio::net::{TcpListener as TokioTcpListener, TcpStream};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio_util::sync::CancellationToken;

use grace_core::Address;

const KEEPALIVE_PERIOD: Duration = Duration::from_secs(60);

/// A TCP listener, optionally capped at a maximum number of live connections.
///
/// `Listener::close` is idempotent ([`CancellationToken::cancel`] already is);
/// the per-connection permit handed out by `accept` is released exactly once
/// by `Drop`, which is Rust's structural equivalent of the once-only release
/// a manual reference count would otherwise need to guard explicitly.
pub struct Listener {
    inner: TokioTcpListener,
    addr: Address,
    limit: Option<Arc<Semaphore>>,
    closed: CancellationToken,
}

/// An accepted connection. Releases its slot in the connection cap (if any)
/// when dropped.
pub struct Conn {
    pub stream: TcpStream,
    pub peer_addr: SocketAddr,
    _permit: Option<OwnedSemaphorePermit>,
}

impl Listener {
    pub(crate) fn new(
        inner: TokioTcpListener,
        addr: Address,
        connection_limit_enabled: bool,
        max_connections: u32,
    ) -> Self {
        let limit = connection_limit_enabled
            .then(|| Arc::new(Semaphore::new(max_connections as usize)));
        Self { inner, addr, limit, closed: CancellationToken::new() }
    }

    pub fn addr(&self) -> &Address {
        &self.addr
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.inner.local_addr()
    }

    /// Accept the next connection, blocking on a free slot first if a
    /// connection cap is configured.
    ///
    /// Returns `Err` once the listener has been closed, whether that
    /// happened before this call started waiting or while it was waiting
    /// on either the semaphore or the underlying socket.
    pub async fn accept(&self) -> io::Result<Conn> {
        let permit = match &self.limit {
            Some(sem) => {
                let sem = Arc::clone(sem);
                let acquired = tokio::select! {
                    biased;
                    _ = self.closed.cancelled() => return Err(closed_error()),
                    res = sem.acquire_owned() => res,
                };
                Some(acquired.map_err(|_| closed_error())?)
            }
            None => None,
        };

        let (stream, peer_addr) = tokio::select! {
            biased;
            _ = self.closed.cancelled() => return Err(closed_error()),
            res = self.inner.accept() => res?,
        };

        configure_keepalive(&stream)?;

        Ok(Conn { stream, peer_addr, _permit: permit })
    }

    /// Stop accepting new connections. Safe to call more than once and from
    /// any number of tasks; only the first call has any effect.
    pub fn close(&self) {
        self.closed.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.closed.is_cancelled()
    }
}

fn closed_error() -> io::Error {
    io::Error::new(io::ErrorKind::Other, "listener closed")
}

fn configure_keepalive(stream: &TcpStream) -> io::Result<()> {
    let sock = SockRef::from(stream);
    let keepalive = TcpKeepalive::new().with_time(KEEPALIVE_PERIOD).with_interval(KEEPALIVE_PERIOD);
    sock.set_tcp_keepalive(&keepalive)
}

#[cfg(test)]
#[path = "listener_tests.rs"]
mod tests;
