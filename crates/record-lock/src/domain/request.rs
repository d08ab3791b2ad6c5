//! # Lock Requests
//!
//! Value types describing what kind of lock a caller wants.
//!
//! - `AccessMode`: shared (`Read`) or exclusive (`Write`)
//! - `LockKind`: wait for the lock or fail immediately
//! - `LockRequest`: the `{blocking, exclusive}` pair handed to the lock manager
//! - `LockCommand`: the record operation issued to the OS, including unlock

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

// =============================================================================
// ACCESS MODE
// =============================================================================

/// Whether a lock is shared between readers or held by a single writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AccessMode {
    /// Shared lock. Coexists with other shared locks.
    Read,
    /// Exclusive lock. Requires a descriptor opened for writing.
    #[default]
    Write,
}

impl AccessMode {
    /// True for `Write`.
    pub const fn is_exclusive(self) -> bool {
        matches!(self, AccessMode::Write)
    }

    /// Lowercase name, accepted back by `FromStr`.
    pub const fn as_str(self) -> &'static str {
        match self {
            AccessMode::Read => "read",
            AccessMode::Write => "write",
        }
    }
}

impl From<bool> for AccessMode {
    /// `true` selects `Write`.
    fn from(exclusive: bool) -> Self {
        if exclusive {
            AccessMode::Write
        } else {
            AccessMode::Read
        }
    }
}

impl AsRef<str> for AccessMode {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for AccessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessMode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "read" | "shared" => Ok(AccessMode::Read),
            "write" | "exclusive" => Ok(AccessMode::Write),
            _ => Err(ParseError::new("access mode", s, &["read", "write"])),
        }
    }
}

// =============================================================================
// LOCK KIND
// =============================================================================

/// Whether acquiring waits for a conflicting holder to let go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LockKind {
    /// Fail immediately when the lock is held elsewhere.
    #[default]
    NonBlocking,
    /// Suspend the calling thread until the lock can be granted.
    Blocking,
}

impl LockKind {
    /// True for `Blocking`.
    pub const fn is_blocking(self) -> bool {
        matches!(self, LockKind::Blocking)
    }

    /// Lowercase name, accepted back by `FromStr`.
    pub const fn as_str(self) -> &'static str {
        match self {
            LockKind::NonBlocking => "nonblocking",
            LockKind::Blocking => "blocking",
        }
    }
}

impl From<bool> for LockKind {
    /// `true` selects `Blocking`.
    fn from(blocking: bool) -> Self {
        if blocking {
            LockKind::Blocking
        } else {
            LockKind::NonBlocking
        }
    }
}

impl AsRef<str> for LockKind {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for LockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LockKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nonblocking" | "non-blocking" => Ok(LockKind::NonBlocking),
            "blocking" => Ok(LockKind::Blocking),
            _ => Err(ParseError::new("lock kind", s, &["nonblocking", "blocking"])),
        }
    }
}

/// A string did not name a known `AccessMode` or `LockKind`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid {what} '{value}': expected one of {}", .expected.join(", "))]
pub struct ParseError {
    what: &'static str,
    value: String,
    expected: &'static [&'static str],
}

impl ParseError {
    fn new(what: &'static str, value: &str, expected: &'static [&'static str]) -> Self {
        Self {
            what,
            value: value.to_string(),
            expected,
        }
    }

    /// The rejected input.
    pub fn value(&self) -> &str {
        &self.value
    }
}

// =============================================================================
// LOCK REQUEST
// =============================================================================

/// A single acquire request. Lives for one call only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LockRequest {
    /// Wait for the lock instead of failing immediately.
    pub blocking: bool,
    /// Exclusive (write) lock instead of shared (read).
    pub exclusive: bool,
}

impl LockRequest {
    pub const fn new(blocking: bool, exclusive: bool) -> Self {
        Self {
            blocking,
            exclusive,
        }
    }

    /// Non-blocking exclusive request.
    pub const fn try_exclusive() -> Self {
        Self::new(false, true)
    }

    /// Non-blocking shared request.
    pub const fn try_shared() -> Self {
        Self::new(false, false)
    }

    /// Whether this request waits.
    pub fn kind(&self) -> LockKind {
        LockKind::from(self.blocking)
    }

    /// Whether this request is shared or exclusive.
    pub fn mode(&self) -> AccessMode {
        AccessMode::from(self.exclusive)
    }
}

impl From<(LockKind, AccessMode)> for LockRequest {
    fn from((kind, mode): (LockKind, AccessMode)) -> Self {
        Self::new(kind.is_blocking(), mode.is_exclusive())
    }
}

impl fmt::Display for LockRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind(), self.mode())
    }
}

// =============================================================================
// LOCK COMMAND
// =============================================================================

/// Record lock type as understood by `fcntl`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    /// `F_RDLCK`
    Read,
    /// `F_WRLCK`
    Write,
    /// `F_UNLCK`
    Unlock,
}

/// One whole-file record operation to issue against a descriptor.
///
/// The byte range is always offset 0 to end of file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LockCommand {
    pub record: RecordType,
    /// `F_SETLKW` when true, `F_SETLK` otherwise.
    pub wait: bool,
}

impl LockCommand {
    /// Release whatever lock this process holds on the file. Never waits.
    pub const fn unlock() -> Self {
        Self {
            record: RecordType::Unlock,
            wait: false,
        }
    }
}

impl From<LockRequest> for LockCommand {
    fn from(request: LockRequest) -> Self {
        Self {
            record: if request.exclusive {
                RecordType::Write
            } else {
                RecordType::Read
            },
            wait: request.blocking,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_access_mode_parse() {
        assert_eq!("read".parse::<AccessMode>().unwrap(), AccessMode::Read);
        assert_eq!("WRITE".parse::<AccessMode>().unwrap(), AccessMode::Write);
        assert_eq!("shared".parse::<AccessMode>().unwrap(), AccessMode::Read);
        assert_eq!(" exclusive ".parse::<AccessMode>().unwrap(), AccessMode::Write);
    }

    #[test]
    fn test_lock_kind_parse() {
        assert_eq!("blocking".parse::<LockKind>().unwrap(), LockKind::Blocking);
        assert_eq!("NonBlocking".parse::<LockKind>().unwrap(), LockKind::NonBlocking);
        assert_eq!("non-blocking".parse::<LockKind>().unwrap(), LockKind::NonBlocking);
    }

    #[test]
    fn test_parse_error_lists_expected_values() {
        let err = "sometimes".parse::<LockKind>().unwrap_err();
        assert_eq!(err.value(), "sometimes");
        assert_eq!(
            err.to_string(),
            "Invalid lock kind 'sometimes': expected one of nonblocking, blocking"
        );
    }

    #[test]
    fn test_request_from_kind_and_mode() {
        let request = LockRequest::from((LockKind::Blocking, AccessMode::Read));
        assert!(request.blocking);
        assert!(!request.exclusive);
        assert_eq!(request.kind(), LockKind::Blocking);
        assert_eq!(request.mode(), AccessMode::Read);
        assert_eq!(request.to_string(), "blocking read");
    }

    #[test]
    fn test_command_from_request() {
        let cmd = LockCommand::from(LockRequest::new(true, true));
        assert_eq!(cmd.record, RecordType::Write);
        assert!(cmd.wait);

        let cmd = LockCommand::from(LockRequest::try_shared());
        assert_eq!(cmd.record, RecordType::Read);
        assert!(!cmd.wait);
    }

    #[test]
    fn test_unlock_never_waits() {
        let cmd = LockCommand::unlock();
        assert_eq!(cmd.record, RecordType::Unlock);
        assert!(!cmd.wait);
    }

    #[test]
    fn test_defaults() {
        assert_eq!(AccessMode::default(), AccessMode::Write);
        assert_eq!(LockKind::default(), LockKind::NonBlocking);
    }

    proptest! {
        #[test]
        fn prop_parse_ignores_case(mask in proptest::collection::vec(any::<bool>(), 8)) {
            let word: String = "blocking"
                .chars()
                .zip(mask)
                .map(|(c, upper)| if upper { c.to_ascii_uppercase() } else { c })
                .collect();
            prop_assert_eq!(word.parse::<LockKind>().unwrap(), LockKind::Blocking);
        }

        #[test]
        fn prop_unknown_words_rejected(word in "[a-z]{1,12}") {
            prop_assume!(!["read", "write", "shared", "exclusive"].contains(&word.as_str()));
            prop_assert!(word.parse::<AccessMode>().is_err());
        }
    }
}
