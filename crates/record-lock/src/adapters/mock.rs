use std::os::fd::RawFd;

use parking_lot::Mutex;

use crate::domain::request::LockCommand;
use crate::ports::outbound::LockDriver;

/// Driver that records every command instead of calling the OS.
///
/// Allows tests to verify which syscalls would have been issued, and to
/// script an errno for the next call.
#[derive(Default)]
pub struct RecordingDriver {
    calls: Mutex<Vec<(RawFd, LockCommand)>>,
    fail_with: Mutex<Option<i32>>,
}

impl RecordingDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `set_lock` fail with `errno`.
    pub fn fail_next(&self, errno: i32) {
        *self.fail_with.lock() = Some(errno);
    }

    pub fn calls(&self) -> Vec<(RawFd, LockCommand)> {
        self.calls.lock().clone()
    }
}

impl LockDriver for RecordingDriver {
    fn set_lock(&self, fd: RawFd, command: LockCommand) -> Result<(), i32> {
        self.calls.lock().push((fd, command));
        match self.fail_with.lock().take() {
            Some(errno) => Err(errno),
            None => Ok(()),
        }
    }
}
