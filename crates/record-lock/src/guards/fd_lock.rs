//! # Descriptor Lock
//!
//! Lock guard over a descriptor owned by someone else.

use std::os::fd::{AsFd, AsRawFd, BorrowedFd, RawFd};

use tracing::warn;

use crate::domain::errors::LockError;
use crate::domain::request::{AccessMode, LockKind, LockRequest};
use crate::ports::inbound::RecordLockApi;
use crate::service::LockManager;

/// A record lock on a borrowed descriptor.
///
/// Creating an `FdLock` does not lock anything; call one of the lock methods.
/// On drop the lock is released (errors are logged and ignored). The
/// descriptor itself is never closed.
///
/// # Example
///
/// ```no_run
/// use record_lock::{AccessMode, FdLock};
///
/// let file = std::fs::OpenOptions::new().read(true).write(true).open("state.db")?;
/// let lock = FdLock::new(&file);
/// lock.try_lock(AccessMode::Write)?;
/// // ... the lock is released when `lock` goes out of scope
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct FdLock<'fd> {
    fd: BorrowedFd<'fd>,
    manager: LockManager,
}

impl<'fd> FdLock<'fd> {
    pub fn new<H: AsFd + ?Sized>(handle: &'fd H) -> Self {
        Self {
            fd: handle.as_fd(),
            manager: LockManager::new(),
        }
    }

    /// Acquire a lock of the given kind and mode.
    pub fn lock(&self, kind: LockKind, mode: AccessMode) -> Result<(), LockError> {
        self.manager
            .acquire(self.fd.as_raw_fd(), LockRequest::from((kind, mode)))
    }

    /// Non-blocking acquire.
    pub fn try_lock(&self, mode: AccessMode) -> Result<(), LockError> {
        self.lock(LockKind::NonBlocking, mode)
    }

    /// Blocking acquire.
    pub fn lock_blocking(&self, mode: AccessMode) -> Result<(), LockError> {
        self.lock(LockKind::Blocking, mode)
    }

    /// Release the lock. Releasing an unlocked descriptor succeeds.
    pub fn unlock(&self) -> Result<(), LockError> {
        self.manager.release(self.fd.as_raw_fd())
    }
}

impl AsRawFd for FdLock<'_> {
    fn as_raw_fd(&self) -> RawFd {
        self.fd.as_raw_fd()
    }
}

impl AsFd for FdLock<'_> {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.fd
    }
}

impl Drop for FdLock<'_> {
    fn drop(&mut self) {
        if let Err(err) = self.unlock() {
            warn!(fd = self.fd.as_raw_fd(), error = %err, "failed to release record lock on drop");
        }
    }
}
