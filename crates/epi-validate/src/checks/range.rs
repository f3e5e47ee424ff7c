//! Numeric range checks.

use super::{CheckContext, number_value};
use crate::config::FieldRole;
use crate::issue::{DataQualityIssue, IssueKind};

/// Flag ages outside `[age_min, age_max]`.
pub fn check(ctx: &CheckContext<'_>) -> Vec<DataQualityIssue> {
    let Some(column) = ctx.mapped(FieldRole::Age) else {
        return Vec::new();
    };
    let (min, max) = (ctx.config.thresholds.age_min, ctx.config.thresholds.age_max);

    ctx.records
        .iter()
        .filter_map(|record| {
            let age = number_value(record.get(&column.key))?;
            (age < min || age > max).then(|| {
                DataQualityIssue::for_record(
                    IssueKind::AgeOutOfRange {
                        field: column.key.clone(),
                        age,
                        min,
                        max,
                    },
                    record.id(),
                )
            })
        })
        .collect()
}
