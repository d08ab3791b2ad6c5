//! # Adapters Module
//!
//! ## Modules
//!
//! - `fcntl`: POSIX record locks via `fcntl(2)`
//! - `mock`: Recording driver for unit tests

pub mod fcntl;
#[cfg(test)]
pub(crate) mod mock;

pub use fcntl::FcntlDriver;
