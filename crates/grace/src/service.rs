// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The embedding contract: what a registered service looks like to `Grace`.

use std::error::Error as StdError;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::listener::Listener;

/// A boxed, type-erased error returned from embedder callbacks.
///
/// Callback failures are the embedder's business, not `Grace`'s: they are
/// logged and, for the start callback, abort the affected worker's startup,
/// but they never need to be matched on by name the way [`grace_core::GraceError`]
/// variants do.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Invoked once per worker, after its listeners are bound (or inherited) and
/// before the worker announces itself ready.
///
/// Implementations typically move the listener into a long-running accept
/// loop spawned on the current runtime; `start` itself should return quickly
/// once that loop is spawned.
#[async_trait]
pub trait StartHandler: Send + Sync + 'static {
    async fn start(&self, listener: Listener) -> Result<(), BoxError>;
}

/// Invoked once per worker, when that worker has been told to stop.
///
/// Each registered service's shutdown handler is given up to the
/// configured stop timeout to return; handlers that exceed it are abandoned,
/// not cancelled, so they should be quick to relinquish resources.
#[async_trait]
pub trait ShutdownHandler: Send + Sync + 'static {
    async fn shutdown(&self) -> Result<(), BoxError>;
}

#[async_trait]
impl<F, Fut> StartHandler for F
where
    F: Fn(Listener) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
{
    async fn start(&self, listener: Listener) -> Result<(), BoxError> {
        (self)(listener).await
    }
}

#[async_trait]
impl<F, Fut> ShutdownHandler for F
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
{
    async fn shutdown(&self) -> Result<(), BoxError> {
        (self)().await
    }
}

/// One network service registered with `Grace`: an address to bind (or
/// inherit), plus the callbacks that give it life in a worker process.
#[derive(Clone)]
pub struct Service {
    pub(crate) name: String,
    pub(crate) addr: grace_core::Address,
    pub(crate) on_start: Arc<dyn StartHandler>,
    pub(crate) on_shutdown: Arc<dyn ShutdownHandler>,
}

impl Service {
    /// Register a service under `name`, listening on `addr`.
    pub fn new(
        name: impl Into<String>,
        addr: grace_core::Address,
        on_start: impl StartHandler,
        on_shutdown: impl ShutdownHandler,
    ) -> Self {
        Self {
            name: name.into(),
            addr,
            on_start: Arc::new(on_start),
            on_shutdown: Arc::new(on_shutdown),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn addr(&self) -> &grace_core::Address {
        &self.addr
    }
}

impl std::fmt::Debug for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Service").field("name", &self.name).field("addr", &self.addr).finish()
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
