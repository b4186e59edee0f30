// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! File-descriptor passing across `exec`: the mechanism that lets a freshly
//! spawned worker inherit the master's already-bound listening sockets.
//!
//! The first descriptor a worker may legitimately use for its own purposes
//! (after stdin/stdout/stderr).
pub const FIRST_INHERITED_FD: RawFd = 3;

/// Upper bound on the number of sockets a single `pre_exec` hook will remap.
///
/// [`remap_for_exec`] runs in the forked child with the allocator's lock
/// state inherited verbatim from whichever thread held it in the parent at
/// the moment of `fork`; calling into the allocator here can deadlock the
/// child outright. A fixed-size stack buffer keeps the whole function
/// allocation-free, at the cost of a registration-time ceiling on the number
/// of services one binary can pass across a reload.
const MAX_INHERITED_FDS: usize = 32;

use std::os::unix::io::RawFd;

use nix::errno::Errno;
use nix::fcntl::{fcntl, FcntlArg};
use nix::unistd::{close, dup2};

fn to_io_error(err: nix::Error) -> std::io::Error {
    std::io::Error::from_raw_os_error(err as i32)
}

/// Remaps `fds[i]` to descriptor `FIRST_INHERITED_FD + i` in the calling
/// process, in order. Intended to run inside a `pre_exec` hook installed on
/// the child `Command`, not called directly outside of one.
///
/// # Safety invariant
///
/// `pre_exec` runs after `fork` but before `exec`, in the child, with only
/// one thread alive and only async-signal-safe functions allowed. `dup2`,
/// `fcntl`, and `close` are all async-signal-safe; this function performs no
/// heap allocation (see [`MAX_INHERITED_FDS`]) and takes no locks.
///
/// Two passes are required rather than a direct loop of `dup2(fds[i], 3+i)`:
/// a source descriptor can itself fall inside the `[3, 3+n)` target range
/// (e.g. the master's own fd table may already contain a descriptor numbered
/// 3), in which case a naive single pass could clobber a later source before
/// it's been read. The first pass moves every source descriptor to a fresh
/// number above the whole target range via `F_DUPFD`; the second pass then
/// dup2's each staged descriptor down into its final slot, where collisions
/// are impossible because every staged descriptor is `>= base > all targets`.
///
/// `dup2`'s target descriptor never carries `FD_CLOEXEC` (POSIX requires the
/// new descriptor start clear), so the sockets survive `exec` once remapped
/// even though Rust's `std::net::TcpListener` sets `FD_CLOEXEC` on creation.
pub unsafe fn remap_for_exec(fds: &[RawFd]) -> std::io::Result<()> {
    if fds.is_empty() {
        return Ok(());
    }
    if fds.len() > MAX_INHERITED_FDS {
        return Err(std::io::Error::from_raw_os_error(Errno::E2BIG as i32));
    }

    let base = FIRST_INHERITED_FD + fds.len() as RawFd;
    let mut staged = [0 as RawFd; MAX_INHERITED_FDS];
    for (i, &fd) in fds.iter().enumerate() {
        staged[i] = fcntl(fd, FcntlArg::F_DUPFD(base)).map_err(to_io_error)?;
    }

    for (i, &fd) in staged.iter().enumerate().take(fds.len()) {
        let target = FIRST_INHERITED_FD + i as RawFd;
        if fd != target {
            dup2(fd, target).map_err(to_io_error)?;
            close(fd).map_err(to_io_error)?;
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "fdpass_tests.rs"]
mod tests;
