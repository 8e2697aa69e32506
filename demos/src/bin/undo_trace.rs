//! Undo Trace
//!
//! Runs a scripted rename, drag and fit session under the tracing undo
//! manager and prints the recorded trace to stderr.
//!
//! Run with: cargo run -p utilkit-demos --bin undo_trace -- --log-file trace.log

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use utilkit_demos::{UtilConfig, session};
use utilkit_undo::{CustomUndoApi, TracingUndoManager};

/// Scripted undo session with debug tracing.
#[derive(Parser, Debug)]
#[command(
    name = "undo_trace",
    about = "Run a scripted editing session and print the undo trace",
    version
)]
struct Args {
    /// TOML file with [undo] and [log] sections.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Also append log records to this file (overrides the config).
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Characters kept when the log file is truncated at startup.
    #[arg(long)]
    max_log_size: Option<usize>,

    /// Disable trace recording.
    #[arg(long)]
    quiet_trace: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => match UtilConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{e}");
                return ExitCode::FAILURE;
            }
        },
        None => UtilConfig::default(),
    };
    if let Some(path) = args.log_file {
        config.log.file = Some(path);
    }
    if let Some(size) = args.max_log_size {
        config.log.max_file_size = size;
    }
    if args.quiet_trace {
        config.undo.enable_debug_logging = false;
    }

    let logger = match utilkit_log::install(&config.log) {
        Ok(handle) => handle,
        Err(e) => {
            eprintln!("Failed to install logger: {e}");
            return ExitCode::FAILURE;
        }
    };
    utilkit_core::init();
    log::info!("undo_trace v{}", utilkit_demos::VERSION);

    let mut undo: TracingUndoManager<session::Sketch> =
        TracingUndoManager::from_config(&config.undo);
    let result = session::run(&mut undo);
    undo.print_debug_log();

    let status = match result {
        Ok(sketch) => {
            log::info!("Session finished: {sketch:?}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Session failed: {e}");
            ExitCode::FAILURE
        }
    };

    match logger.send_log_file(|path, bytes, _text| (path.display().to_string(), bytes.len())) {
        Ok(Some((path, len))) => eprintln!("Log file {path} holds {len} bytes"),
        Ok(None) => {}
        Err(e) => eprintln!("Failed to read back log file: {e}"),
    }
    if let Err(e) = logger.close_log_file() {
        eprintln!("Failed to close log file: {e}");
    }
    status
}
