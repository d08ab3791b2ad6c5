//! # Ports
//!
//! - `inbound`: the lock manager API offered to callers
//! - `outbound`: the OS record-lock primitive the manager drives

pub mod inbound;
pub mod outbound;

pub use inbound::RecordLockApi;
pub use outbound::LockDriver;
