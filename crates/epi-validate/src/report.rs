//! Aggregated results of one rule engine run.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::issue::{Category, DataQualityIssue, IssueId, Severity};

/// All issues found by one run, with dismissal state and summary counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub issues: Vec<DataQualityIssue>,
}

impl QualityReport {
    pub fn new(issues: Vec<DataQualityIssue>) -> Self {
        Self { issues }
    }

    /// Issues that have not been dismissed.
    pub fn active(&self) -> impl Iterator<Item = &DataQualityIssue> {
        self.issues.iter().filter(|issue| !issue.dismissed)
    }

    /// Dismiss one issue. Returns false when no issue has this id.
    pub fn dismiss(&mut self, id: &IssueId) -> bool {
        let mut found = false;
        for issue in self.issues.iter_mut().filter(|issue| &issue.id == id) {
            issue.dismiss();
            found = true;
        }
        found
    }

    /// Carry dismissals from an earlier run over to this one.
    pub fn apply_dismissals(&mut self, dismissed: &BTreeSet<IssueId>) {
        for issue in &mut self.issues {
            if dismissed.contains(&issue.id) {
                issue.dismiss();
            }
        }
    }

    /// Ids of every dismissed issue.
    pub fn dismissed_ids(&self) -> BTreeSet<IssueId> {
        self.issues
            .iter()
            .filter(|issue| issue.dismissed)
            .map(|issue| issue.id.clone())
            .collect()
    }

    fn count(&self, severity: Severity) -> usize {
        self.active()
            .filter(|issue| issue.severity == severity)
            .count()
    }

    /// Active error-severity issues.
    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    /// Active warning-severity issues.
    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// Active issue counts per category. Categories without issues are
    /// omitted.
    pub fn by_category(&self) -> BTreeMap<Category, usize> {
        let mut counts = BTreeMap::new();
        for issue in self.active() {
            *counts.entry(issue.category).or_default() += 1;
        }
        counts
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use epi_model::RecordId;

    use super::*;
    use crate::issue::IssueKind;

    fn report() -> QualityReport {
        QualityReport::new(vec![
            DataQualityIssue::for_record(
                IssueKind::MissingRequired {
                    field: "onset".to_string(),
                },
                &RecordId::from_row(1),
            ),
            DataQualityIssue::for_record(
                IssueKind::AgeOutOfRange {
                    field: "age".to_string(),
                    age: 140.0,
                    min: 0.0,
                    max: 120.0,
                },
                &RecordId::from_row(2),
            ),
        ])
    }

    #[test]
    fn counts_by_severity_and_category() {
        let report = report();
        assert_eq!(report.error_count(), 1);
        assert_eq!(report.warning_count(), 1);
        assert!(report.has_errors());
        let by_category = report.by_category();
        assert_eq!(by_category.get(&Category::Range), Some(&1));
        assert_eq!(by_category.get(&Category::Completeness), Some(&1));
        assert_eq!(by_category.get(&Category::Duplicate), None);
    }

    #[test]
    fn dismissed_issues_leave_counts_but_stay_listed() {
        let mut report = report();
        let id = report.issues[1].id.clone();
        assert!(report.dismiss(&id));
        assert_eq!(report.len(), 2);
        assert_eq!(report.active().count(), 1);
        assert_eq!(report.error_count(), 0);

        let mut rerun = self::report();
        rerun.apply_dismissals(&report.dismissed_ids());
        assert!(rerun.issues[1].dismissed);
        assert!(!rerun.issues[0].dismissed);
    }
}
