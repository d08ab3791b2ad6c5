//! # File Lock
//!
//! A lock file opened on demand, with reader/writer semantics chosen up front.

use std::fs::{File, OpenOptions};
use std::os::fd::{AsRawFd, RawFd};
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::domain::errors::LockError;
use crate::domain::request::{AccessMode, LockKind, LockRequest};
use crate::guards::path::DEFAULT_PERMISSIONS;
use crate::ports::inbound::RecordLockApi;
use crate::service::LockManager;

/// A lock file with multiple-reader, single-writer semantics.
///
/// The file is opened (and created if absent) on the first lock attempt:
/// read-only for `AccessMode::Read`, write-only for `AccessMode::Write`. The
/// open file is kept for the lifetime of the `FileLock`, so the lock survives
/// between calls. The lock is released on drop; the file itself is left in
/// place.
#[derive(Debug)]
pub struct FileLock {
    path: PathBuf,
    mode: AccessMode,
    permissions: u32,
    file: Option<File>,
    manager: LockManager,
}

impl FileLock {
    pub fn new(path: impl Into<PathBuf>, mode: AccessMode) -> Self {
        Self {
            path: path.into(),
            mode,
            permissions: DEFAULT_PERMISSIONS,
            file: None,
            manager: LockManager::new(),
        }
    }

    /// Permission bits used if the file has to be created.
    pub fn with_permissions(mut self, permissions: u32) -> Self {
        self.permissions = permissions;
        self
    }

    fn opened_fd(&mut self) -> Result<RawFd, LockError> {
        if let Some(file) = &self.file {
            return Ok(file.as_raw_fd());
        }

        let mut options = OpenOptions::new();
        match self.mode {
            // std refuses `create` without write access; O_CREAT itself is fine.
            AccessMode::Read => options.read(true).custom_flags(libc::O_CREAT),
            AccessMode::Write => options.write(true).create(true),
        };
        let file = options
            .mode(self.permissions)
            .open(&self.path)
            .map_err(|err| LockError::open_failed(&self.path, err))?;

        debug!(path = %self.path.display(), mode = %self.mode, "opened lock file");
        let fd = file.as_raw_fd();
        self.file = Some(file);
        Ok(fd)
    }

    /// Acquire the lock, waiting or not according to `kind`.
    pub fn any_lock(&mut self, kind: LockKind) -> Result<(), LockError> {
        let fd = self.opened_fd()?;
        self.manager
            .acquire(fd, LockRequest::from((kind, self.mode)))
    }

    /// Blocking acquire.
    pub fn lock(&mut self) -> Result<(), LockError> {
        self.any_lock(LockKind::Blocking)
    }

    /// Non-blocking acquire.
    pub fn try_lock(&mut self) -> Result<(), LockError> {
        self.any_lock(LockKind::NonBlocking)
    }

    /// Release the lock. Fails with `NotOpened` if no lock was ever attempted.
    pub fn unlock(&mut self) -> Result<(), LockError> {
        match &self.file {
            Some(file) => self.manager.release(file.as_raw_fd()),
            None => Err(LockError::NotOpened),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mode(&self) -> AccessMode {
        self.mode
    }

    /// The open lock file, once a lock has been attempted.
    pub fn file(&mut self) -> Option<&mut File> {
        self.file.as_mut()
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        if let Some(file) = &self.file {
            if let Err(err) = self.manager.release(file.as_raw_fd()) {
                warn!(path = %self.path.display(), error = %err, "failed to release lock file on drop");
            }
        }
    }
}
