//! # Domain Layer
//!
//! Pure value types for record locking. No syscalls happen here.
//!
//! ## Modules
//!
//! - `request` - Lock requests, access modes and the OS-level lock command
//! - `errors` - Domain error types

pub mod errors;
pub mod request;

pub use errors::LockError;
pub use request::{AccessMode, LockCommand, LockKind, LockRequest, ParseError, RecordType};
