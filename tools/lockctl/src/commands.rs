//! Command execution.

use std::io::{self, Write};
use std::path::Path;
use std::thread;
use std::time::Duration;

use record_lock::{AccessMode, LockError, PathLockOptions};
use tracing::{error, info};

use crate::cli::Command;

/// How a command ended. Maps onto the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The lock was obtained.
    Acquired,
    /// The lock is held elsewhere.
    Busy,
    /// Anything else went wrong.
    Failed,
}

impl Outcome {
    pub fn exit_code(self) -> u8 {
        match self {
            Outcome::Acquired => 0,
            Outcome::Busy => 1,
            Outcome::Failed => 2,
        }
    }
}

/// Run `command`, writing one-line results to `out`.
pub fn run<W: Write>(command: &Command, out: &mut W) -> Outcome {
    match command {
        Command::Acquire {
            path,
            mode,
            wait,
            hold_ms,
        } => acquire(path, *mode, *wait, Duration::from_millis(*hold_ms), out),
        Command::Probe { path, mode } => probe(path, *mode, out),
    }
}

fn options(mode: AccessMode, wait: bool) -> PathLockOptions {
    PathLockOptions::new()
        .with_exclusive(mode.is_exclusive())
        .with_blocking(wait)
}

fn acquire<W: Write>(
    path: &Path,
    mode: AccessMode,
    wait: bool,
    hold: Duration,
    out: &mut W,
) -> Outcome {
    let lock = match options(mode, wait).lock(path) {
        Ok(lock) => lock,
        Err(err) => return report_failure(path, &err, out),
    };

    info!(path = %path.display(), %mode, hold_ms = hold.as_millis() as u64, "lock acquired");
    if let Err(err) = writeln!(out, "locked {} ({})", path.display(), lock.request())
        .and_then(|()| out.flush())
    {
        return output_failed(path, &err);
    }

    if !hold.is_zero() {
        thread::sleep(hold);
    }

    match lock.release() {
        Ok(()) => report(path, Outcome::Acquired, writeln!(out, "released {}", path.display())),
        Err(err) => {
            error!(path = %path.display(), error = %err, "release failed");
            report(path, Outcome::Failed, writeln!(out, "error {}: {}", path.display(), err))
        }
    }
}

fn probe<W: Write>(path: &Path, mode: AccessMode, out: &mut W) -> Outcome {
    match options(mode, false).lock(path) {
        Ok(lock) => {
            drop(lock);
            report(path, Outcome::Acquired, writeln!(out, "free {} ({})", path.display(), mode))
        }
        Err(err) => report_failure(path, &err, out),
    }
}

fn report_failure<W: Write>(path: &Path, err: &LockError, out: &mut W) -> Outcome {
    if err.is_would_block() {
        info!(path = %path.display(), "lock held elsewhere");
        report(path, Outcome::Busy, writeln!(out, "busy {}", path.display()))
    } else {
        error!(path = %path.display(), error = %err, "lock failed");
        report(path, Outcome::Failed, writeln!(out, "error {}: {}", path.display(), err))
    }
}

/// `outcome`, unless its result line could not be written.
fn report(path: &Path, outcome: Outcome, written: io::Result<()>) -> Outcome {
    match written {
        Ok(()) => outcome,
        Err(err) => output_failed(path, &err),
    }
}

fn output_failed(path: &Path, err: &io::Error) -> Outcome {
    error!(path = %path.display(), error = %err, "failed to write result");
    Outcome::Failed
}
