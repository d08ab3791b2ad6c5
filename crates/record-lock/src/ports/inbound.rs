//! # Inbound Ports (Driving Ports)
//!
//! The primary API for acquiring and releasing whole-file record locks.

use std::os::fd::RawFd;

use crate::domain::errors::LockError;
use crate::domain::request::LockRequest;

/// Acquire and release advisory whole-file locks on an open descriptor.
///
/// Implementations hold no state between calls. The lock itself lives in the
/// kernel, keyed by (process, file), so the descriptor is only borrowed for
/// the duration of each call and never closed.
pub trait RecordLockApi {
    /// Lock the whole file behind `fd` (offset 0 to end of file).
    ///
    /// Acquiring again while a lock is already held replaces it; locks are
    /// not counted.
    ///
    /// ## Errors
    ///
    /// - `InvalidDescriptor`: `fd` is negative (no syscall issued)
    /// - `Errno(EAGAIN | EACCES)`: non-blocking request, lock held elsewhere
    /// - `Errno(EBADF)`: descriptor not open with the access the lock needs
    /// - `Errno(EINTR)`: a blocking wait was interrupted by a signal
    fn acquire(&self, fd: RawFd, request: LockRequest) -> Result<(), LockError>;

    /// Release any lock this process holds on the whole file behind `fd`.
    ///
    /// Releasing when nothing is held succeeds.
    ///
    /// ## Errors
    ///
    /// - `InvalidDescriptor`: `fd` is negative (no syscall issued)
    /// - `Errno(code)`: the OS rejected the unlock
    fn release(&self, fd: RawFd) -> Result<(), LockError>;
}
