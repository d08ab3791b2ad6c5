//! Command line definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use record_lock::AccessMode;

/// lockctl: acquire, hold and probe advisory fcntl record locks
#[derive(Parser, Debug)]
#[command(name = "lockctl")]
#[command(about = "Acquire, hold and probe advisory fcntl record locks")]
pub struct Args {
    /// Log filter, overrides RECORD_LOCK_LOG_LEVEL / RUST_LOG
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Lock a file (creating it if needed), hold the lock, then release it
    Acquire {
        /// File to lock
        path: PathBuf,

        /// Lock mode: read (shared) or write (exclusive)
        #[arg(short, long, default_value = "write")]
        mode: AccessMode,

        /// Wait for a conflicting holder instead of failing
        #[arg(short, long)]
        wait: bool,

        /// How long to hold the lock, in milliseconds
        #[arg(long, default_value = "0")]
        hold_ms: u64,
    },

    /// Check whether a lock could be taken right now, without keeping it
    Probe {
        /// File to probe
        path: PathBuf,

        /// Lock mode: read (shared) or write (exclusive)
        #[arg(short, long, default_value = "write")]
        mode: AccessMode,
    },
}
