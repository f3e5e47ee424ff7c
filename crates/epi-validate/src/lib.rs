//! Data quality rule engine for outbreak case data.
//!
//! [`run_checks`] evaluates every enabled check in a [`DataQualityConfig`]
//! against a dataset's columns and records and returns the issues found.
//! The engine is pure: it holds no state between runs, never fails on a
//! malformed configuration (unmapped roles simply produce no issues), and
//! identical input always yields identical issues with identical ids.

mod checks;
pub mod config;
pub mod issue;
pub mod report;

use epi_model::{Column, Dataset, Record};
use tracing::info_span;

pub use config::{CheckKind, DataQualityConfig, FieldMapping, FieldRole, Thresholds};
pub use issue::{Category, DataQualityIssue, IssueId, IssueKind, Severity};
pub use report::QualityReport;

/// Run every enabled check and return the issues found, undismissed.
pub fn run_checks(
    columns: &[Column],
    records: &[Record],
    config: &DataQualityConfig,
) -> Vec<DataQualityIssue> {
    let span = info_span!(
        "run_checks",
        record_count = records.len(),
        check_count = config.enabled_checks.len()
    );
    let _guard = span.enter();

    let ctx = checks::CheckContext::new(columns, records, config);
    checks::run_all(&ctx)
}

/// Run the checks over a dataset and wrap the issues in a report.
pub fn check_dataset(dataset: &Dataset, config: &DataQualityConfig) -> QualityReport {
    QualityReport::new(run_checks(dataset.columns(), dataset.records(), config))
}
