//! # Record Lock Telemetry
//!
//! Structured logging setup for binaries built on `record-lock`.
//!
//! The library crate only emits `tracing` events; this crate installs the
//! subscriber that prints them.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use record_lock_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     let config = TelemetryConfig::from_env();
//!     init_telemetry(&config).expect("Failed to init telemetry");
//!     // Lock operations are now logged.
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `RECORD_LOCK_LOG_LEVEL` | `info` | Log filter (falls back to `RUST_LOG`) |
//! | `RECORD_LOCK_JSON_LOGS` | `false` | Emit JSON lines instead of text |
//! | `RECORD_LOCK_CONSOLE_OUTPUT` | `true` | Write logs to stderr at all |

mod config;
mod tracing_setup;

pub use config::TelemetryConfig;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to install tracing subscriber: {0}")]
    SubscriberInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Install the global tracing subscriber described by `config`.
///
/// Can only succeed once per process.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    tracing_setup::init_tracing(config)
}
