//! # Lock Guards
//!
//! RAII wrappers that release their lock when dropped.
//!
//! ## Modules
//!
//! - `fd_lock`: lock on a borrowed descriptor
//! - `file_lock`: lazily opened lock file with a fixed access mode
//! - `path`: open-and-lock helper for a path (`lock_path`)

pub mod fd_lock;
pub mod file_lock;
pub mod path;

pub use fd_lock::FdLock;
pub use file_lock::FileLock;
pub use path::{PathLock, PathLockOptions, DEFAULT_PERMISSIONS};
