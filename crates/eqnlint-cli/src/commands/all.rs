//! Run-all command implementation.

use super::audit::run_audit;
use crate::cli::{AllArgs, AuditArgs};
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::{EXIT_CANCELLED, EXIT_OK};
use eqnlint_audit::{AuditKind, RunStatus};
use std::path::{Path, PathBuf};

/// Execute the run-all command.
///
/// Audits run one after another; a failed audit is reported and the rest
/// still run. Cancellation stops the whole sequence.
pub async fn execute_all(args: &AllArgs, config: &Config, formatter: &Formatter) -> Result<i32> {
    let kinds = args.selected();

    if args.audit.help_info {
        for kind in &kinds {
            println!("{}", kind.profile().info_block());
        }
        return Ok(EXIT_OK);
    }

    let mut failed = 0;
    for &kind in &kinds {
        eprintln!("{}", formatter.info(&format!("Running {} audit", kind)));
        match run_audit(kind, &args_for(&args.audit, kind), config).await {
            Ok(outcome) => {
                eprintln!("{}", formatter.run_summary(kind, &outcome));
                if outcome.status == RunStatus::Cancelled {
                    return Ok(EXIT_CANCELLED);
                }
            }
            Err(e) => {
                failed += 1;
                eprintln!("{}", formatter.error(&format!("{}: {}", kind, e)));
            }
        }
    }

    if failed > 0 {
        return Err(CliError::AuditsFailed {
            failed,
            total: kinds.len(),
        });
    }
    Ok(EXIT_OK)
}

/// Per-audit copy of the shared flags, with report paths made distinct.
pub fn args_for(shared: &AuditArgs, kind: AuditKind) -> AuditArgs {
    AuditArgs {
        output: shared.output.as_deref().map(|p| per_audit_path(p, kind)),
        json: shared.json.as_deref().map(|p| per_audit_path(p, kind)),
        ..shared.clone()
    }
}

/// `dir/report.txt` becomes `dir/report.<audit>.txt`.
pub fn per_audit_path(path: &Path, kind: AuditKind) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{}.{}.{}", stem, kind, ext.to_string_lossy()),
        None => format!("{}.{}", stem, kind),
    };
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_audit_path() {
        assert_eq!(
            per_audit_path(Path::new("out/report.json"), AuditKind::Units),
            PathBuf::from("out/report.units.json")
        );
        assert_eq!(
            per_audit_path(Path::new("log"), AuditKind::Prose),
            PathBuf::from("log.prose")
        );
    }
}
