// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The wire protocol between master and worker: two environment variables.

use grace_core::GraceError;
use nix::sys::signal::Signal;
use nix::unistd::Pid;

/// Set (to [`ENV_WORKER_VAL`]) in every spawned worker's environment.
pub const ENV_WORKER: &str = "ENV_WORKER";
pub const ENV_WORKER_VAL: &str = "1";

/// Set to the PID of the worker being replaced (`0` for the first worker).
pub const ENV_OLD_WORKER_PID: &str = "ENV_OLD_WORKER_PID";

/// The signal a new worker sends to the worker it is replacing.
///
/// This is a crate constant, not a configuration option: only the master's
/// reload/stop signal sets are configurable (see `grace_core::config`).
pub const WORKER_STOP_SIGNAL: Signal = Signal::SIGTERM;

/// `true` if the current process was spawned as a worker.
pub fn is_worker() -> bool {
    std::env::var(ENV_WORKER).map(|v| v == ENV_WORKER_VAL).unwrap_or(false)
}

/// Read the previous worker's PID from the environment.
///
/// Absent or `0` means this is the first worker. A present-but-unparsable
/// value is a configuration error: something other than `grace` set it.
pub fn old_worker_pid() -> Result<Option<Pid>, GraceError> {
    let Ok(raw) = std::env::var(ENV_OLD_WORKER_PID) else {
        return Ok(None);
    };
    let pid: i32 = raw
        .parse()
        .map_err(|_| GraceError::InvalidEnv { var: ENV_OLD_WORKER_PID, value: raw })?;
    if pid > 1 {
        Ok(Some(Pid::from_raw(pid)))
    } else {
        Ok(None)
    }
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
