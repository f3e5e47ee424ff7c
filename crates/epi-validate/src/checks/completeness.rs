//! Required field completeness.

use super::CheckContext;
use crate::issue::{DataQualityIssue, IssueKind};

/// One issue per record and required field without a value. Required
/// fields that are not dataset columns are skipped.
pub fn check(ctx: &CheckContext<'_>) -> Vec<DataQualityIssue> {
    let mut issues = Vec::new();
    for key in &ctx.config.required_fields {
        let Some(column) = ctx.column(key.trim()) else {
            continue;
        };
        for record in ctx.records {
            let value = record.get(&column.key);
            if value.is_null() || value.to_string().trim().is_empty() {
                issues.push(DataQualityIssue::for_record(
                    IssueKind::MissingRequired {
                        field: column.key.clone(),
                    },
                    record.id(),
                ));
            }
        }
    }
    issues
}
