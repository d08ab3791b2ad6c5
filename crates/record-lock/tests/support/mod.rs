//! Helpers for cross-process lock tests.
//!
//! fcntl locks are held per process, so contention can only be observed from
//! a second process. Each test binary re-executes itself running only its
//! `child_entry` test, with the child's job described in environment
//! variables.

#![allow(dead_code)]

use std::env;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Read};
use std::os::fd::AsRawFd;
use std::path::Path;
use std::process::{Child, ChildStdout, Command, Stdio};
use std::thread;
use std::time::Duration;

use record_lock::{AccessMode, LockError, LockKind};

const ENV_ROLE: &str = "RECORD_LOCK_TEST_ROLE";
const ENV_PATH: &str = "RECORD_LOCK_TEST_PATH";
const ENV_KIND: &str = "RECORD_LOCK_TEST_KIND";
const ENV_MODE: &str = "RECORD_LOCK_TEST_MODE";
const ENV_EXPECT: &str = "RECORD_LOCK_TEST_EXPECT";
const ENV_MARKER: &str = "RECORD_LOCK_TEST_MARKER";
const ENV_HOLD_MS: &str = "RECORD_LOCK_TEST_HOLD_MS";

/// Printed by a child whose assertions all passed.
const CHILD_OK: &str = "record-lock-child: ok";
/// Printed by a holder child once its lock is in place.
const CHILD_HELD: &str = "record-lock-child: held";

/// Long enough for any test machine to start a process and reach the lock.
pub const WAIT_TIME: Duration = Duration::from_millis(250);

/// Contents a waiting child expects in the marker file once it gets the lock.
pub const RELEASED: &str = "released";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expect {
    /// The child must obtain the lock.
    Locked,
    /// The child must be refused with a would-block errno.
    Busy,
}

impl Expect {
    fn as_str(self) -> &'static str {
        match self {
            Expect::Locked => "locked",
            Expect::Busy => "busy",
        }
    }
}

// =============================================================================
// PARENT SIDE
// =============================================================================

fn child_command(role: &str, path: &Path, kind: LockKind, mode: AccessMode) -> Command {
    let exe = env::current_exe().expect("test binary path");
    let mut cmd = Command::new(exe);
    cmd.args(["child_entry", "--exact", "--nocapture", "--test-threads=1"])
        .env(ENV_ROLE, role)
        .env(ENV_PATH, path)
        .env(ENV_KIND, kind.as_str())
        .env(ENV_MODE, mode.as_str())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit());
    cmd
}

/// Run a child that tries to lock `path` and report whether it saw `expect`.
pub fn child_sees(path: &Path, kind: LockKind, mode: AccessMode, expect: Expect) -> bool {
    let output = child_command("acquire", path, kind, mode)
        .env(ENV_EXPECT, expect.as_str())
        .output()
        .expect("spawn child");
    output.status.success() && String::from_utf8_lossy(&output.stdout).contains(CHILD_OK)
}

/// Start a child that waits for `path` and then checks `marker` reads
/// `RELEASED`.
pub fn spawn_waiter(path: &Path, mode: AccessMode, marker: &Path) -> Child {
    child_command("acquire", path, LockKind::Blocking, mode)
        .env(ENV_EXPECT, Expect::Locked.as_str())
        .env(ENV_MARKER, marker)
        .spawn()
        .expect("spawn waiting child")
}

/// A child process holding an exclusive lock.
pub struct Holder {
    child: Child,
    stdout: BufReader<ChildStdout>,
}

impl Holder {
    /// Wait for the holder to let go and exit.
    pub fn finish(mut self) -> bool {
        let mut rest = String::new();
        let _ = self.stdout.read_to_string(&mut rest);
        let status = self.child.wait().expect("wait for holder");
        status.success() && rest.contains(CHILD_OK)
    }
}

/// Start a child that holds an exclusive lock on `path` for `hold`. Returns
/// once the lock is in place.
pub fn spawn_holder(path: &Path, hold: Duration) -> Holder {
    let mut child = child_command("hold", path, LockKind::Blocking, AccessMode::Write)
        .env(ENV_HOLD_MS, hold.as_millis().to_string())
        .spawn()
        .expect("spawn holder");
    let mut stdout = BufReader::new(child.stdout.take().expect("holder stdout"));
    wait_for_line(&mut stdout, CHILD_HELD);
    Holder { child, stdout }
}

/// Start a child that repeatedly fails `lock_path` and checks no descriptor
/// leaks. Expects the path to be locked elsewhere.
pub fn child_checks_no_leak(path: &Path) -> bool {
    let output = child_command("leak-check", path, LockKind::NonBlocking, AccessMode::Write)
        .output()
        .expect("spawn leak checker");
    output.status.success() && String::from_utf8_lossy(&output.stdout).contains(CHILD_OK)
}

/// Wait for a child started with `spawn_waiter`.
pub fn finish(child: Child) -> bool {
    let output = child.wait_with_output().expect("wait for child");
    output.status.success() && String::from_utf8_lossy(&output.stdout).contains(CHILD_OK)
}

fn wait_for_line(reader: &mut BufReader<ChildStdout>, needle: &str) {
    let mut line = String::new();
    loop {
        line.clear();
        let read = reader.read_line(&mut line).expect("read child stdout");
        assert!(read > 0, "child exited before printing '{}'", needle);
        if line.contains(needle) {
            return;
        }
    }
}

// =============================================================================
// CHILD SIDE
// =============================================================================

fn open_for(path: &Path, mode: AccessMode) -> File {
    match mode {
        AccessMode::Read => File::open(path),
        AccessMode::Write => OpenOptions::new().read(true).write(true).open(path),
    }
    .expect("child opens lock file")
}

/// Count descriptors currently open in this process.
fn open_descriptors() -> usize {
    (0..1024)
        .filter(|fd| unsafe { libc::fcntl(*fd, libc::F_GETFD) } != -1)
        .count()
}

/// Body of each test binary's `child_entry` test. A no-op unless the test
/// binary was started by one of the parent helpers above.
pub fn run_child_role() {
    let Ok(role) = env::var(ENV_ROLE) else {
        return;
    };
    let path = env::var(ENV_PATH).expect("child path");
    let path = Path::new(&path);
    let kind: LockKind = env::var(ENV_KIND).unwrap().parse().unwrap();
    let mode: AccessMode = env::var(ENV_MODE).unwrap().parse().unwrap();

    match role.as_str() {
        "acquire" => {
            let file = open_for(path, mode);
            let result =
                record_lock::acquire(file.as_raw_fd(), kind.is_blocking(), mode.is_exclusive());

            match env::var(ENV_EXPECT).unwrap().as_str() {
                "locked" => {
                    result.expect("child should get the lock");
                    if let Ok(marker) = env::var(ENV_MARKER) {
                        let seen = fs::read_to_string(marker).expect("marker written before release");
                        assert_eq!(seen, RELEASED, "lock granted before holder released");
                    }
                }
                "busy" => {
                    let err = result.expect_err("child must not get the lock");
                    assert!(matches!(err, LockError::Errno(_)), "unexpected error {:?}", err);
                    assert!(err.is_would_block(), "unexpected errno {:?}", err.errno());
                }
                other => panic!("unknown expectation '{}'", other),
            }
        }
        "hold" => {
            let hold_ms: u64 = env::var(ENV_HOLD_MS).unwrap().parse().unwrap();
            let _lock = record_lock::lock_path(path, true).expect("holder gets the lock");
            println!("{}", CHILD_HELD);
            thread::sleep(Duration::from_millis(hold_ms));
        }
        "leak-check" => {
            let before = open_descriptors();
            for _ in 0..32 {
                let err = record_lock::lock_path(path, false).expect_err("path is held elsewhere");
                assert!(err.is_would_block(), "unexpected error {:?}", err);
            }
            assert_eq!(open_descriptors(), before, "failed lock_path leaked a descriptor");
        }
        other => panic!("unknown child role '{}'", other),
    }

    println!("{}", CHILD_OK);
}
