//! lockctl: advisory record locks from the shell.
//!
//! Exit codes: `0` lock obtained, `1` lock held elsewhere, `2` any other error.

pub mod cli;
pub mod commands;

pub use cli::{Args, Command};
pub use commands::{run, Outcome};
