//! eqnlint CLI library.
//!
//! Argument parsing, configuration layering, logging setup and command
//! execution for the `eqnlint` binary.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::{AllArgs, AuditArgs, Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;

use eqnlint_audit::RunStatus;
use tracing_subscriber::EnvFilter;

/// Exit status of a successful run
pub const EXIT_OK: i32 = 0;

/// Exit status of a fatal error
pub const EXIT_FAILURE: i32 = 1;

/// Exit status of a run cancelled with Ctrl-C
pub const EXIT_CANCELLED: i32 = 130;

/// Exit status for a finished run.
pub fn exit_code(status: RunStatus) -> i32 {
    match status {
        RunStatus::Completed | RunStatus::DryRun => EXIT_OK,
        RunStatus::Cancelled => EXIT_CANCELLED,
    }
}

/// Initialise logging to stderr.
///
/// `RUST_LOG` wins when set; otherwise `verbose` selects debug over info.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
