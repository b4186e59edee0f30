// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The error taxonomy shared by the master and worker roles.

use std::io;
use thiserror::Error;

/// Errors that can surface from `Grace::run`.
///
/// Per the error handling design, only what the embedder must know (bind
/// failure, worker startup failure, registration-time mistakes) is returned
/// here; everything operational is logged instead (see `grace::service`).
#[derive(Debug, Error)]
pub enum GraceError {
    #[error("unsupported network: {0}")]
    UnsupportedNetwork(String),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to spawn worker: {0}")]
    Spawn(#[source] io::Error),

    #[error("failed to reconstruct listener for descriptor {fd}: {source}")]
    ListenerReconstruction {
        fd: i32,
        #[source]
        source: io::Error,
    },

    #[error("invalid {var}: {value}")]
    InvalidEnv { var: &'static str, value: String },

    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
