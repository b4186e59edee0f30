// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! grace-core: foundational data types shared by the master and worker roles.
//!
//! This crate holds the pieces that must mean the same thing in both
//! processes of a graceful restart: the address type, the configuration
//! struct, and the error taxonomy. It depends on nothing async — both roles
//! parse it from the same binary and environment before any runtime exists.

pub mod address;
pub mod config;
pub mod error;

pub use address::{Address, Network};
pub use config::Config;
pub use error::GraceError;
