//! # Record Lock
//!
//! Advisory, whole-file record locking for POSIX systems, built directly on
//! `fcntl(2)` (`F_SETLK` / `F_SETLKW`).
//!
//! ## Lock Model
//!
//! ```text
//!            acquire(fd, blocking, exclusive)
//! Unlocked ───────────────────────────────────→ Locked(read | write)
//!    ↑                                                │
//!    └──────────────────── release(fd) ───────────────┘
//! ```
//!
//! | Property | Behavior |
//! |----------|----------|
//! | Range | Whole file: offset 0, length 0 (to end of file) |
//! | Ownership | Kernel-held, keyed by (process, file) |
//! | Re-acquire | Replaces the current lock; never counted |
//! | Release when unlocked | Succeeds |
//! | Negative descriptor | `InvalidDescriptor`, no syscall issued |
//! | OS failure | `Errno(code)`, verbatim, never retried |
//!
//! Locks are advisory: they only constrain processes that also ask for them.
//! Closing any descriptor the process holds on a file drops all of the
//! process's locks on that file.
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Lock requests and error types
//! - `ports/` - `RecordLockApi` (inbound) and `LockDriver` (outbound)
//! - `adapters/` - `fcntl` driver
//! - `service/` - `LockManager` and the `acquire` / `release` / `lock_path` functions
//! - `guards/` - RAII guards: `FdLock`, `FileLock`, `PathLock`
//!
//! ## Usage
//!
//! ```no_run
//! use std::os::fd::AsRawFd;
//!
//! // Descriptor-level locking. The caller owns the file.
//! let file = std::fs::OpenOptions::new().read(true).write(true).open("queue.db")?;
//! record_lock::acquire(file.as_raw_fd(), true, true)?;
//! record_lock::release(file.as_raw_fd())?;
//!
//! // Path-level locking. The guard owns the file and unlocks on drop.
//! let guard = record_lock::lock_path("/tmp/queue.lock", false)?;
//! drop(guard);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#[cfg(not(unix))]
compile_error!("record-lock requires a POSIX platform with fcntl record locks");

pub mod adapters;
pub mod domain;
pub mod guards;
pub mod ports;
pub mod service;

pub use adapters::FcntlDriver;
pub use domain::{AccessMode, LockCommand, LockError, LockKind, LockRequest, ParseError, RecordType};
pub use guards::{FdLock, FileLock, PathLock, PathLockOptions, DEFAULT_PERMISSIONS};
pub use ports::{LockDriver, RecordLockApi};
pub use service::{acquire, lock_path, release, LockManager};
