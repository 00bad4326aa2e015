//! List command implementation.

use crate::error::Result;
use crate::output::Formatter;
use eqnlint_audit::AuditKind;

/// Execute the list command.
pub fn execute_list(formatter: &Formatter) -> Result<i32> {
    println!("{}", formatter.audit_table(&AuditKind::ALL));
    Ok(0)
}
