//! # Domain Errors
//!
//! Error types for record locking.
//!
//! ## Design Principles
//!
//! - Pre-flight failures (`InvalidDescriptor`, `InvalidFilename`) are detected
//!   before any syscall is issued
//! - OS failures keep the raw errno (`Errno`) and are never reinterpreted
//! - Failing to open a lock file is an `Io` error, never a lock conflict
//! - No panics: every failure path returns a `LockError`

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur while acquiring or releasing a record lock.
#[derive(Debug, Error)]
pub enum LockError {
    /// The descriptor is negative. No syscall was issued.
    #[error("Invalid file descriptor")]
    InvalidDescriptor,

    /// The path cannot be handed to the OS (interior NUL byte).
    #[error("Invalid filename: path contains an interior NUL byte")]
    InvalidFilename,

    /// The OS rejected the operation; carries the raw errno verbatim.
    #[error("Lock operation failed: {}", describe_errno(.0))]
    Errno(i32),

    /// The lock file could not be opened or created.
    #[error("Couldn't open lock file at '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// `unlock()` was called before the lock file was ever opened.
    #[error("unlock() called before lock() or try_lock()")]
    NotOpened,
}

impl LockError {
    /// The OS error number behind this failure, if there is one.
    ///
    /// `InvalidDescriptor` reports `EBADF`, the condition it stands in for.
    pub fn errno(&self) -> Option<i32> {
        match self {
            LockError::Errno(code) => Some(*code),
            LockError::InvalidDescriptor => Some(libc::EBADF),
            LockError::Io { source, .. } => source.raw_os_error(),
            LockError::InvalidFilename | LockError::NotOpened => None,
        }
    }

    /// True when a non-blocking acquire failed because the lock is held
    /// elsewhere.
    ///
    /// POSIX allows either `EAGAIN` or `EACCES` for a conflicting `F_SETLK`.
    pub fn is_would_block(&self) -> bool {
        matches!(
            self,
            LockError::Errno(code)
                if *code == libc::EAGAIN || *code == libc::EWOULDBLOCK || *code == libc::EACCES
        )
    }

    /// Wrap an `open(2)` failure on `path`.
    ///
    /// Kept apart from `Errno` so that an unreadable lock file is never
    /// mistaken for a lock held elsewhere.
    pub(crate) fn open_failed(path: &Path, source: io::Error) -> Self {
        LockError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl From<LockError> for io::Error {
    fn from(err: LockError) -> Self {
        match err {
            LockError::Errno(code) => io::Error::from_raw_os_error(code),
            LockError::InvalidDescriptor => io::Error::from_raw_os_error(libc::EBADF),
            LockError::InvalidFilename => io::Error::new(io::ErrorKind::InvalidInput, err),
            LockError::Io { source, .. } => source,
            LockError::NotOpened => io::Error::new(io::ErrorKind::NotFound, err),
        }
    }
}

fn describe_errno(code: &i32) -> io::Error {
    io::Error::from_raw_os_error(*code)
}
