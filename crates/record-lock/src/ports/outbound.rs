//! # Outbound Ports (Driven Ports)
//!
//! The OS facility the lock manager depends on.

use std::os::fd::RawFd;

use crate::domain::request::LockCommand;

/// Issues a single whole-file record-lock command to the OS.
///
/// Production: `FcntlDriver` (adapters/fcntl.rs)
pub trait LockDriver: Send + Sync {
    /// Apply `command` to `fd`. On failure returns the raw OS errno.
    ///
    /// Callers have already rejected negative descriptors.
    fn set_lock(&self, fd: RawFd, command: LockCommand) -> Result<(), i32>;
}

impl<D: LockDriver + ?Sized> LockDriver for &D {
    fn set_lock(&self, fd: RawFd, command: LockCommand) -> Result<(), i32> {
        (**self).set_lock(fd, command)
    }
}
