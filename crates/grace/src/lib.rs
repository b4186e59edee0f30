// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Graceful restart and zero-downtime reload for long-running network
//! servers.
//!
//! An embedding program builds a [`Grace`] handle from [`grace_core::Config`],
//! registers one [`Service`] per listening socket it wants to own, and calls
//! [`Grace::run`]. The first invocation of the binary runs as a master: it
//! binds every registered address, `exec`-spawns a worker that inherits the
//! bound sockets, and supervises it. The worker runs the embedder's start
//! and shutdown callbacks and never returns control to `run` until it stops.
//!
//! ```no_run
//! use grace_core::{Address, Config};
//! use grace::{Grace, Service};
//!
//! # async fn run() -> Result<(), grace_core::GraceError> {
//! let mut app = Grace::new(Config::default());
//! app.register(Service::new(
//!     "echo",
//!     Address::tcp("127.0.0.1:8124"),
//!     |listener: grace::Listener| async move {
//!         loop {
//!             let conn = listener.accept().await?;
//!             tokio::spawn(async move {
//!                 let _ = conn.stream;
//!             });
//!         }
//!     },
//!     || async move { Ok(()) },
//! ));
//! app.run().await
//! # }
//! ```

pub mod env;
mod fdpass;
pub mod listener;
mod master;
pub mod role;
pub mod service;
mod signal;
mod worker;

pub use grace_core::{Address, Config, GraceError, Network};
pub use listener::{Conn, Listener};
pub use role::Role;
pub use service::{BoxError, Service, ShutdownHandler, StartHandler};

/// The top-level embedding handle: configuration plus the registered service
/// list, built before role selection and consumed by [`Grace::run`].
pub struct Grace {
    config: Config,
    services: Vec<Service>,
}

impl Grace {
    pub fn new(config: Config) -> Self {
        Self { config, services: Vec::new() }
    }

    /// Register a service. Registration order is significant: it determines
    /// which inherited file descriptor (`3`, `4`, …) each worker reconstructs
    /// that service's listener from, and it must be identical across every
    /// worker spawned from this binary.
    pub fn register(&mut self, service: Service) {
        self.services.push(service);
    }

    /// Run as whichever role this invocation is. Blocks for the lifetime of
    /// the role.
    ///
    /// As master, only returns on a bind failure before any worker is
    /// spawned; everything after that point ends the process directly. As
    /// worker, returns once the worker has run its shutdown callbacks.
    pub async fn run(self) -> Result<(), GraceError> {
        match role::current() {
            role::Role::Master => master::run(self.config, self.services).await,
            role::Role::Worker => worker::run(self.config, self.services).await,
        }
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
