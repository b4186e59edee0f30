// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Grace configuration.
//!
//! Immutable after construction, identical across master and worker (both
//! parse from the same binary and environment).

use std::time::Duration;

/// One of the Unix signals `Grace` can be configured to react to.
///
/// Kept as a small local enum (rather than depending on `nix` from this
/// crate) so `grace-core` stays dependency-light; `grace` maps these to
/// `nix::sys::signal::Signal` at the point they are actually registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReloadSignal {
    Hangup,
    User1,
    User2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopSignal {
    Interrupt,
    Terminate,
    Kill,
}

const DEFAULT_WATCH_INTERVAL: Duration = Duration::from_secs(1);
const DEFAULT_STOP_TIMEOUT: Duration = Duration::from_secs(20);
const DEFAULT_MAX_CONNECTIONS: u32 = 10_000;

/// Immutable runtime configuration shared by the master and worker roles.
#[derive(Debug, Clone)]
pub struct Config {
    watch_interval: Duration,
    stop_timeout: Duration,
    reload_signals: Vec<ReloadSignal>,
    stop_signals: Vec<StopSignal>,
    connection_limit_enabled: bool,
    max_connections: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            watch_interval: DEFAULT_WATCH_INTERVAL,
            stop_timeout: DEFAULT_STOP_TIMEOUT,
            reload_signals: vec![ReloadSignal::Hangup, ReloadSignal::User1, ReloadSignal::User2],
            stop_signals: vec![StopSignal::Interrupt, StopSignal::Terminate, StopSignal::Kill],
            connection_limit_enabled: false,
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    pub fn watch_interval(&self) -> Duration {
        self.watch_interval
    }

    pub fn stop_timeout(&self) -> Duration {
        self.stop_timeout
    }

    pub fn reload_signals(&self) -> &[ReloadSignal] {
        &self.reload_signals
    }

    pub fn stop_signals(&self) -> &[StopSignal] {
        &self.stop_signals
    }

    pub fn connection_limit_enabled(&self) -> bool {
        self.connection_limit_enabled
    }

    pub fn max_connections(&self) -> u32 {
        self.max_connections
    }
}

/// Builder for [`Config`].
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    inner: Config,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self { inner: Config::default() }
    }
}

impl ConfigBuilder {
    pub fn watch_interval(mut self, interval: Duration) -> Self {
        self.inner.watch_interval = interval;
        self
    }

    pub fn stop_timeout(mut self, timeout: Duration) -> Self {
        self.inner.stop_timeout = timeout;
        self
    }

    pub fn reload_signals(mut self, signals: Vec<ReloadSignal>) -> Self {
        self.inner.reload_signals = signals;
        self
    }

    pub fn stop_signals(mut self, signals: Vec<StopSignal>) -> Self {
        self.inner.stop_signals = signals;
        self
    }

    pub fn connection_limit(mut self, enabled: bool, max_connections: u32) -> Self {
        self.inner.connection_limit_enabled = enabled;
        self.inner.max_connections = max_connections;
        self
    }

    pub fn build(self) -> Config {
        self.inner
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
