//! Single-audit command implementation.

use crate::cli::AuditArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use crate::{exit_code, EXIT_OK};
use eqnlint_audit::{AuditKind, AuditMachine, RunOutcome};
use tracing::debug;

/// Execute one audit command.
pub async fn execute_audit(kind: AuditKind, args: &AuditArgs, config: &Config, formatter: &Formatter) -> Result<i32> {
    if args.help_info {
        print!("{}", kind.profile().info_block());
        return Ok(EXIT_OK);
    }

    let outcome = run_audit(kind, args, config).await?;
    eprintln!("{}", formatter.run_summary(kind, &outcome));
    Ok(exit_code(outcome.status))
}

/// Layer settings and drive one audit to its end.
pub(crate) async fn run_audit(kind: AuditKind, args: &AuditArgs, config: &Config) -> Result<RunOutcome> {
    let settings = config.audit_settings(args)?;
    let options = config.backend_options(args);
    debug!(
        audit = %kind,
        model = %settings.model_id,
        rate = settings.rate,
        ollama = %options.ollama_url,
        "Settings resolved"
    );

    let outcome = AuditMachine::new(kind.profile(), settings)
        .with_backend_options(options)
        .run()
        .await?;
    Ok(outcome)
}
