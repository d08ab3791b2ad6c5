//! lockctl: acquire, hold and probe advisory record locks.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use lockctl::{run, Args};
use record_lock_telemetry::{init_telemetry, TelemetryConfig};

fn main() -> ExitCode {
    let args = Args::parse();

    let mut config = TelemetryConfig::for_service("lockctl");
    if let Some(level) = &args.log_level {
        config = config.with_log_level(level.clone());
    }
    if args.json {
        config = config.with_json_logs(true);
    }
    if let Err(e) = init_telemetry(&config) {
        eprintln!("Warning: {}", e);
    }

    let outcome = run(&args.command, &mut io::stdout().lock());
    ExitCode::from(outcome.exit_code())
}
