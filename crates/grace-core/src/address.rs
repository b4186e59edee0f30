// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Address: a typed `(network, address)` pair.

use std::fmt;

use crate::error::GraceError;

/// The network a [`Address`] is bound on.
///
/// Only [`Network::Tcp`] is implemented. `Unix` is kept as a named variant so
/// the type is ready for that extension, but registering one is rejected at
/// construction time rather than accepted and failing later at bind time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Network {
    Tcp,
    Unix,
}

impl Network {
    fn as_str(self) -> &'static str {
        match self {
            Network::Tcp => "tcp",
            Network::Unix => "unix",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An immutable `(network, address)` pair identifying one service's listening
/// socket.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address {
    network: Network,
    addr: String,
}

impl Address {
    /// Construct a TCP address, e.g. `Address::tcp("127.0.0.1:8124")`.
    pub fn tcp(addr: impl Into<String>) -> Self {
        Self { network: Network::Tcp, addr: addr.into() }
    }

    /// Construct an address on an arbitrary network, rejecting anything but
    /// TCP since that is the only network this crate implements.
    pub fn new(network: Network, addr: impl Into<String>) -> Result<Self, GraceError> {
        if network != Network::Tcp {
            return Err(GraceError::UnsupportedNetwork(network.to_string()));
        }
        Ok(Self { network, addr: addr.into() })
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.network, self.addr)
    }
}

#[cfg(test)]
#[path = "address_tests.rs"]
mod tests;
