//! # Path Locking
//!
//! Open a file by path and hold an exclusive record lock on it.
//!
//! `PathLock` owns the descriptor it opened. If the lock cannot be taken the
//! freshly opened file is closed before the error is returned, so a failed
//! attempt never leaks a descriptor.

use std::ffi::CString;
use std::fs::{File, OpenOptions};
use std::os::fd::{AsFd, AsRawFd, BorrowedFd, RawFd};
use std::os::unix::ffi::OsStrExt;
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::domain::errors::LockError;
use crate::domain::request::LockRequest;
use crate::ports::inbound::RecordLockApi;
use crate::service::LockManager;

/// Permission bits for created lock files: owner read/write, group read,
/// world read. The process umask still applies.
pub const DEFAULT_PERMISSIONS: u32 = 0o644;

// =============================================================================
// OPTIONS
// =============================================================================

/// Configuration for opening and locking a file by path.
///
/// Defaults: non-blocking, exclusive, mode `0o644`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathLockOptions {
    /// Wait for the lock instead of failing immediately (default: false).
    pub blocking: bool,
    /// Take a write lock instead of a read lock (default: true).
    pub exclusive: bool,
    /// Permission bits if the file is created (default: 0o644).
    pub permissions: u32,
}

impl Default for PathLockOptions {
    fn default() -> Self {
        Self {
            blocking: false,
            exclusive: true,
            permissions: DEFAULT_PERMISSIONS,
        }
    }
}

impl PathLockOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blocking(mut self, blocking: bool) -> Self {
        self.blocking = blocking;
        self
    }

    pub fn with_exclusive(mut self, exclusive: bool) -> Self {
        self.exclusive = exclusive;
        self
    }

    pub fn with_permissions(mut self, permissions: u32) -> Self {
        self.permissions = permissions;
        self
    }

    /// The request this configuration acquires with.
    pub fn request(&self) -> LockRequest {
        LockRequest::new(self.blocking, self.exclusive)
    }

    /// Open (creating if absent) `path` read/write and lock it.
    ///
    /// ## Errors
    ///
    /// - `InvalidFilename`: the path contains a NUL byte; nothing is opened
    /// - `Io { path, source }`: `open(2)` failed
    /// - `Errno(code)`: the lock itself failed
    pub fn lock(&self, path: impl AsRef<Path>) -> Result<PathLock, LockError> {
        let path = path.as_ref();
        validate_path(path)?;

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .mode(self.permissions)
            .open(path)
            .map_err(|err| LockError::open_failed(path, err))?;

        let request = self.request();
        // On failure `file` is dropped here, closing the descriptor.
        LockManager::new().acquire(file.as_raw_fd(), request)?;

        debug!(path = %path.display(), %request, "path lock acquired");
        Ok(PathLock {
            file,
            path: path.to_path_buf(),
            request,
            released: false,
        })
    }
}

/// Reject paths the OS cannot represent.
fn validate_path(path: &Path) -> Result<(), LockError> {
    CString::new(path.as_os_str().as_bytes())
        .map(drop)
        .map_err(|_| LockError::InvalidFilename)
}

// =============================================================================
// PATH LOCK
// =============================================================================

/// A held lock on a file opened by path.
///
/// Dropping the guard releases the lock and closes the file. The file is not
/// removed.
#[derive(Debug)]
pub struct PathLock {
    file: File,
    path: PathBuf,
    request: LockRequest,
    released: bool,
}

impl PathLock {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn request(&self) -> LockRequest {
        self.request
    }

    pub fn file(&self) -> &File {
        &self.file
    }

    /// Release the lock now and close the file, reporting any unlock error.
    pub fn release(mut self) -> Result<(), LockError> {
        self.released = true;
        LockManager::new().release(self.file.as_raw_fd())
    }
}

impl AsRawFd for PathLock {
    fn as_raw_fd(&self) -> RawFd {
        self.file.as_raw_fd()
    }
}

impl AsFd for PathLock {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.file.as_fd()
    }
}

impl Drop for PathLock {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(err) = LockManager::new().release(self.file.as_raw_fd()) {
            warn!(path = %self.path.display(), error = %err, "failed to release path lock on drop");
        }
    }
}
