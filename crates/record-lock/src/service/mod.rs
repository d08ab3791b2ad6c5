//! # Lock Manager Service
//!
//! Implements `RecordLockApi` on top of a `LockDriver`.
//!
//! The manager is stateless: it validates the descriptor, turns the request
//! into a single record command, and reports the OS outcome verbatim. It never
//! retries, never waits on its own and never closes the descriptor.


use std::os::fd::RawFd;
use std::path::Path;

use tracing::debug;

use crate::adapters::fcntl::FcntlDriver;
use crate::domain::errors::LockError;
use crate::domain::request::{LockCommand, LockRequest};
use crate::guards::path::{PathLock, PathLockOptions};
use crate::ports::inbound::RecordLockApi;
use crate::ports::outbound::LockDriver;

/// The Lock Manager.
///
/// Defaults to the `fcntl` driver. Holds no per-descriptor state, so a single
/// instance can be shared freely across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct LockManager<D = FcntlDriver> {
    driver: D,
}

impl LockManager {
    pub const fn new() -> Self {
        Self {
            driver: FcntlDriver,
        }
    }
}

impl<D: LockDriver> LockManager<D> {
    /// Create a manager issuing commands through `driver`.
    pub fn with_driver(driver: D) -> Self {
        Self { driver }
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    fn issue(&self, fd: RawFd, command: LockCommand) -> Result<(), LockError> {
        if fd < 0 {
            return Err(LockError::InvalidDescriptor);
        }
        self.driver.set_lock(fd, command).map_err(LockError::Errno)
    }
}

impl<D: LockDriver> RecordLockApi for LockManager<D> {
    fn acquire(&self, fd: RawFd, request: LockRequest) -> Result<(), LockError> {
        debug!(
            fd,
            blocking = request.blocking,
            exclusive = request.exclusive,
            "acquiring record lock"
        );

        let result = self.issue(fd, LockCommand::from(request));
        if let Err(ref err) = result {
            debug!(fd, error = %err, "record lock not acquired");
        }
        result
    }

    fn release(&self, fd: RawFd) -> Result<(), LockError> {
        debug!(fd, "releasing record lock");
        self.issue(fd, LockCommand::unlock())
    }
}

// =============================================================================
// FREE FUNCTIONS
// =============================================================================

/// Lock the whole file behind `fd` with the `fcntl` lock manager.
///
/// `exclusive` selects a write lock (the descriptor must be open for writing),
/// otherwise a shared read lock. With `blocking` the calling thread sleeps in
/// the kernel until the lock is granted; without it a conflicting holder
/// yields `Errno(EAGAIN)` or `Errno(EACCES)` immediately.
///
/// # Example
///
/// ```no_run
/// use std::os::fd::AsRawFd;
///
/// let file = std::fs::OpenOptions::new().read(true).write(true).open("data.db")?;
/// match record_lock::acquire(file.as_raw_fd(), false, true) {
///     Ok(()) => println!("locked"),
///     Err(err) if err.is_would_block() => println!("busy"),
///     Err(err) => return Err(err.into()),
/// }
/// record_lock::release(file.as_raw_fd())?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn acquire(fd: RawFd, blocking: bool, exclusive: bool) -> Result<(), LockError> {
    LockManager::new().acquire(fd, LockRequest::new(blocking, exclusive))
}

/// Release any lock this process holds on the whole file behind `fd`.
///
/// Succeeds when no lock is held.
pub fn release(fd: RawFd) -> Result<(), LockError> {
    LockManager::new().release(fd)
}

/// Open (creating if absent, mode `0o644`) the file at `path` and lock it
/// exclusively.
///
/// The returned guard owns the descriptor; the lock lasts until the guard is
/// released or dropped. If locking fails the descriptor is closed before the
/// error is returned.
///
/// ## Errors
///
/// - `InvalidFilename`: `path` contains an interior NUL byte (nothing opened)
/// - `Errno(code)`: opening or locking failed
pub fn lock_path<P: AsRef<Path>>(path: P, blocking: bool) -> Result<PathLock, LockError> {
    PathLockOptions::new().with_blocking(blocking).lock(path)
}
