//! # fcntl Record Locks
//!
//! Whole-file POSIX record locks (`F_SETLK` / `F_SETLKW`).
//!
//! Locks are owned by the process, not the descriptor: closing *any*
//! descriptor the process has open on the file drops every lock the process
//! holds on it, and a second `F_SETLK` from the same process replaces the
//! first instead of nesting.

use std::io;
use std::os::fd::RawFd;

use crate::domain::request::{LockCommand, RecordType};
use crate::ports::outbound::LockDriver;

/// `LockDriver` backed by `fcntl(2)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FcntlDriver;

impl LockDriver for FcntlDriver {
    fn set_lock(&self, fd: RawFd, command: LockCommand) -> Result<(), i32> {
        let record = whole_file_record(command.record);
        let op = if command.wait {
            libc::F_SETLKW
        } else {
            libc::F_SETLK
        };

        // SAFETY: `record` is a fully initialised `flock` living on this stack
        // frame for the whole call; fcntl does not keep the pointer.
        let rc = unsafe { libc::fcntl(fd, op, &record as *const libc::flock) };
        if rc == -1 {
            return Err(last_errno());
        }
        Ok(())
    }
}

/// Build an `flock` covering offset 0 to end of file.
fn whole_file_record(record: RecordType) -> libc::flock {
    // SAFETY: `flock` is plain data and all-zero is a valid value. Zeroing also
    // covers platform specific fields (`l_pid`, `l_sysid`, padding).
    let mut fl: libc::flock = unsafe { std::mem::zeroed() };
    fl.l_type = raw_record_type(record);
    fl.l_whence = libc::SEEK_SET as libc::c_short;
    fl.l_start = 0;
    fl.l_len = 0; // 0 = to end of file
    fl
}

fn raw_record_type(record: RecordType) -> libc::c_short {
    match record {
        RecordType::Read => libc::F_RDLCK as libc::c_short,
        RecordType::Write => libc::F_WRLCK as libc::c_short,
        RecordType::Unlock => libc::F_UNLCK as libc::c_short,
    }
}

fn last_errno() -> i32 {
    io::Error::last_os_error()
        .raw_os_error()
        .unwrap_or(libc::EIO)
}
