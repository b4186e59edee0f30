// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Mapping [`grace_core::config`]'s signal sets to real Unix signals, and
//! multiplexing the ones a role cares about into a single stream.

use nix::sys::signal::Signal as NixSignal;
use tokio::signal::unix::{signal, Signal as TokioSignal, SignalKind};

use grace_core::config::{ReloadSignal, StopSignal};

pub fn reload_to_nix(sig: ReloadSignal) -> NixSignal {
    match sig {
        ReloadSignal::Hangup => NixSignal::SIGHUP,
        ReloadSignal::User1 => NixSignal::SIGUSR1,
        ReloadSignal::User2 => NixSignal::SIGUSR2,
    }
}

pub fn stop_to_nix(sig: StopSignal) -> NixSignal {
    match sig {
        StopSignal::Interrupt => NixSignal::SIGINT,
        StopSignal::Terminate => NixSignal::SIGTERM,
        StopSignal::Kill => NixSignal::SIGKILL,
    }
}

fn kind_of(sig: NixSignal) -> Option<SignalKind> {
    match sig {
        NixSignal::SIGHUP => Some(SignalKind::hangup()),
        NixSignal::SIGUSR1 => Some(SignalKind::user_defined1()),
        NixSignal::SIGUSR2 => Some(SignalKind::user_defined2()),
        NixSignal::SIGINT => Some(SignalKind::interrupt()),
        NixSignal::SIGTERM => Some(SignalKind::terminate()),
        // SIGKILL can never be caught; the kernel enforces it unconditionally,
        // so there is nothing to install a listener for. A stop set that
        // includes it relies on the signal actually arriving and ending the
        // process, not on this code observing it.
        NixSignal::SIGKILL => None,
        other => Some(SignalKind::from_raw(other as i32)),
    }
}

/// A set of registered signal listeners the master or worker selects over.
///
/// `tokio::signal::unix::signal` installs one listener per distinct signal
/// number; this just collects and labels the ones a role was configured to
/// react to, paired with what it means when one fires.
pub struct SignalSet<T> {
    streams: Vec<(TokioSignal, T)>,
}

impl<T: Copy> SignalSet<T> {
    pub fn install(signals: &[(NixSignal, T)]) -> std::io::Result<Self> {
        let mut streams = Vec::with_capacity(signals.len());
        for &(sig, meaning) in signals {
            if let Some(kind) = kind_of(sig) {
                streams.push((signal(kind)?, meaning));
            }
        }
        Ok(Self { streams })
    }

    /// Wait for the next signal in the set, returning the label it was
    /// registered under.
    pub async fn recv(&mut self) -> T {
        std::future::poll_fn(|cx| {
            for (stream, meaning) in self.streams.iter_mut() {
                if let std::task::Poll::Ready(Some(())) = stream.poll_recv(cx) {
                    return std::task::Poll::Ready(*meaning);
                }
            }
            std::task::Poll::Pending
        })
        .await
    }
}

#[cfg(test)]
#[path = "signal_tests.rs"]
mod tests;
