//! Rule engine configuration.
//!
//! A [`DataQualityConfig`] is consumed whole on every run. Every field has a
//! serde default, so a partial JSON or TOML document is a valid config.

use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::issue::Category;

/// The closed set of checks the engine can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    ExactDuplicate,
    FuzzyDuplicate,
    DateOrder,
    FutureDate,
    DateRange,
    Logical,
    Completeness,
    AgeRange,
}

impl CheckKind {
    /// Get all check kinds, in execution order.
    pub const fn all() -> &'static [Self] {
        &[
            Self::ExactDuplicate,
            Self::FuzzyDuplicate,
            Self::DateOrder,
            Self::FutureDate,
            Self::DateRange,
            Self::Logical,
            Self::Completeness,
            Self::AgeRange,
        ]
    }

    /// Stable identifier, matching the serde form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ExactDuplicate => "exact_duplicate",
            Self::FuzzyDuplicate => "fuzzy_duplicate",
            Self::DateOrder => "date_order",
            Self::FutureDate => "future_date",
            Self::DateRange => "date_range",
            Self::Logical => "logical",
            Self::Completeness => "completeness",
            Self::AgeRange => "age_range",
        }
    }

    /// Parse a check kind; accepts `-` or `_` separators, any case.
    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Self::all()
            .iter()
            .copied()
            .find(|kind| kind.as_str() == normalized)
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::ExactDuplicate => "Exact duplicate",
            Self::FuzzyDuplicate => "Possible duplicate",
            Self::DateOrder => "Date order",
            Self::FutureDate => "Future date",
            Self::DateRange => "Date outside range",
            Self::Logical => "Logical consistency",
            Self::Completeness => "Completeness",
            Self::AgeRange => "Age range",
        }
    }

    pub fn category(&self) -> Category {
        match self {
            Self::ExactDuplicate | Self::FuzzyDuplicate => Category::Duplicate,
            Self::DateOrder | Self::FutureDate | Self::DateRange => Category::Temporal,
            Self::Logical => Category::Logical,
            Self::Completeness => Category::Completeness,
            Self::AgeRange => Category::Range,
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Epidemiological roles a dataset column can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldRole {
    CaseId,
    FirstName,
    LastName,
    FullName,
    DateOfBirth,
    ExposureDate,
    OnsetDate,
    ReportDate,
    DeathDate,
    LabResult,
    CaseStatus,
    Hospitalized,
    HospitalName,
    Outcome,
    Age,
}

impl FieldRole {
    /// Roles whose columns hold calendar dates.
    pub const DATES: [Self; 5] = [
        Self::DateOfBirth,
        Self::ExposureDate,
        Self::OnsetDate,
        Self::ReportDate,
        Self::DeathDate,
    ];

    /// Date roles that describe outbreak events (birth excluded).
    pub const EVENT_DATES: [Self; 4] = [
        Self::ExposureDate,
        Self::OnsetDate,
        Self::ReportDate,
        Self::DeathDate,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::CaseId => "case ID",
            Self::FirstName => "first name",
            Self::LastName => "last name",
            Self::FullName => "full name",
            Self::DateOfBirth => "date of birth",
            Self::ExposureDate => "exposure date",
            Self::OnsetDate => "onset date",
            Self::ReportDate => "report date",
            Self::DeathDate => "death date",
            Self::LabResult => "lab result",
            Self::CaseStatus => "case status",
            Self::Hospitalized => "hospitalized",
            Self::HospitalName => "hospital name",
            Self::Outcome => "outcome",
            Self::Age => "age",
        }
    }
}

/// Which dataset column plays which role. Unset roles are unmapped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldMapping {
    pub case_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub full_name: Option<String>,
    pub date_of_birth: Option<String>,
    pub exposure_date: Option<String>,
    pub onset_date: Option<String>,
    pub report_date: Option<String>,
    pub death_date: Option<String>,
    pub lab_result: Option<String>,
    pub case_status: Option<String>,
    pub hospitalized: Option<String>,
    pub hospital_name: Option<String>,
    pub outcome: Option<String>,
    pub age: Option<String>,
}

impl FieldMapping {
    /// Column key mapped to a role, ignoring blank entries.
    pub fn column(&self, role: FieldRole) -> Option<&str> {
        let slot = match role {
            FieldRole::CaseId => &self.case_id,
            FieldRole::FirstName => &self.first_name,
            FieldRole::LastName => &self.last_name,
            FieldRole::FullName => &self.full_name,
            FieldRole::DateOfBirth => &self.date_of_birth,
            FieldRole::ExposureDate => &self.exposure_date,
            FieldRole::OnsetDate => &self.onset_date,
            FieldRole::ReportDate => &self.report_date,
            FieldRole::DeathDate => &self.death_date,
            FieldRole::LabResult => &self.lab_result,
            FieldRole::CaseStatus => &self.case_status,
            FieldRole::Hospitalized => &self.hospitalized,
            FieldRole::HospitalName => &self.hospital_name,
            FieldRole::Outcome => &self.outcome,
            FieldRole::Age => &self.age,
        };
        slot.as_deref().map(str::trim).filter(|key| !key.is_empty())
    }

    /// Map a role to a column key.
    #[must_use]
    pub fn with(mut self, role: FieldRole, column: impl Into<String>) -> Self {
        let column = Some(column.into());
        match role {
            FieldRole::CaseId => self.case_id = column,
            FieldRole::FirstName => self.first_name = column,
            FieldRole::LastName => self.last_name = column,
            FieldRole::FullName => self.full_name = column,
            FieldRole::DateOfBirth => self.date_of_birth = column,
            FieldRole::ExposureDate => self.exposure_date = column,
            FieldRole::OnsetDate => self.onset_date = column,
            FieldRole::ReportDate => self.report_date = column,
            FieldRole::DeathDate => self.death_date = column,
            FieldRole::LabResult => self.lab_result = column,
            FieldRole::CaseStatus => self.case_status = column,
            FieldRole::Hospitalized => self.hospitalized = column,
            FieldRole::HospitalName => self.hospital_name = column,
            FieldRole::Outcome => self.outcome = column,
            FieldRole::Age => self.age = column,
        }
        self
    }
}

/// Numeric limits used by the range, window and fuzzy checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub age_min: f64,
    pub age_max: f64,
    /// Half-width, in months, of the window around the modal date.
    pub date_range_months: u32,
    /// Largest edit distance still reported as a possible duplicate.
    pub fuzzy_max_distance: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            age_min: 0.0,
            age_max: 120.0,
            date_range_months: 12,
            fuzzy_max_distance: 2,
        }
    }
}

fn tokens(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_string()).collect()
}

/// Complete input for one run of the rule engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataQualityConfig {
    pub field_mapping: FieldMapping,
    pub enabled_checks: BTreeSet<CheckKind>,
    /// Column keys that must be present on every record.
    pub required_fields: Vec<String>,
    pub thresholds: Thresholds,
    /// Lab result values that count as positive.
    pub positive_lab_values: Vec<String>,
    /// Case status values that mean "confirmed".
    pub confirmed_status_values: Vec<String>,
    /// Outcome values that mean the case died.
    pub deceased_outcome_values: Vec<String>,
    /// "Now" for the future-date check; today when unset.
    pub reference_date: Option<NaiveDate>,
}

impl Default for DataQualityConfig {
    fn default() -> Self {
        Self {
            field_mapping: FieldMapping::default(),
            enabled_checks: CheckKind::all().iter().copied().collect(),
            required_fields: Vec::new(),
            thresholds: Thresholds::default(),
            positive_lab_values: tokens(&["positive", "pos", "detected", "reactive", "+"]),
            confirmed_status_values: tokens(&["confirmed"]),
            deceased_outcome_values: tokens(&["died", "dead", "deceased", "death"]),
            reference_date: None,
        }
    }
}

impl DataQualityConfig {
    pub fn is_enabled(&self, kind: CheckKind) -> bool {
        self.enabled_checks.contains(&kind)
    }

    /// Restrict the run to the given checks.
    #[must_use]
    pub fn with_only(mut self, kinds: &[CheckKind]) -> Self {
        self.enabled_checks = kinds.iter().copied().collect();
        self
    }

    #[must_use]
    pub fn with_mapping(mut self, field_mapping: FieldMapping) -> Self {
        self.field_mapping = field_mapping;
        self
    }

    #[must_use]
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_enable_every_check() {
        let config = DataQualityConfig::default();
        for kind in CheckKind::all() {
            assert!(config.is_enabled(*kind), "{kind} should be enabled");
        }
        assert_eq!(config.thresholds.age_max, 120.0);
        assert_eq!(config.thresholds.date_range_months, 12);
    }

    #[test]
    fn parses_check_kinds() {
        assert_eq!(CheckKind::parse("fuzzy-duplicate"), Some(CheckKind::FuzzyDuplicate));
        assert_eq!(CheckKind::parse(" AGE_RANGE "), Some(CheckKind::AgeRange));
        assert_eq!(CheckKind::parse("regression"), None);
    }

    #[test]
    fn blank_mapping_is_unmapped() {
        let mapping = FieldMapping::default()
            .with(FieldRole::OnsetDate, "onset")
            .with(FieldRole::Age, "  ");
        assert_eq!(mapping.column(FieldRole::OnsetDate), Some("onset"));
        assert_eq!(mapping.column(FieldRole::Age), None);
        assert_eq!(mapping.column(FieldRole::CaseId), None);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: DataQualityConfig = serde_json::from_str(
            r#"{"enabled_checks": ["exact_duplicate"], "thresholds": {"age_max": 99}}"#,
        )
        .unwrap();
        assert_eq!(config.enabled_checks.len(), 1);
        assert_eq!(config.thresholds.age_max, 99.0);
        assert_eq!(config.thresholds.age_min, 0.0);
        assert_eq!(config.confirmed_status_values, vec!["confirmed"]);
    }
}
