//! Data quality issue types.
//!
//! [`IssueKind`] is a closed sum type: each variant carries only the data
//! its check produced, and severity, category and message all derive from
//! it.

use std::fmt;

use epi_model::{CalendarDate, RecordId};
use serde::{Deserialize, Serialize};

use crate::config::CheckKind;

/// Issue severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Data is wrong and must be corrected.
    Error,
    /// Data is suspicious and should be reviewed.
    Warning,
}

impl Severity {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "error" => Some(Self::Error),
            "warning" => Some(Self::Warning),
            _ => None,
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Error => "Error",
            Self::Warning => "Warning",
        }
    }
}

/// Issue category, used for grouping in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Duplicate,
    Temporal,
    Logical,
    Completeness,
    Range,
}

impl Category {
    pub const fn all() -> &'static [Self] {
        &[
            Self::Duplicate,
            Self::Temporal,
            Self::Logical,
            Self::Completeness,
            Self::Range,
        ]
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "duplicate" | "duplicates" => Some(Self::Duplicate),
            "temporal" => Some(Self::Temporal),
            "logical" => Some(Self::Logical),
            "completeness" => Some(Self::Completeness),
            "range" => Some(Self::Range),
            _ => None,
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Duplicate => "Duplicate",
            Self::Temporal => "Temporal",
            Self::Logical => "Logical",
            Self::Completeness => "Completeness",
            Self::Range => "Range",
        }
    }
}

/// What a check found. Each variant carries only its needed data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IssueKind {
    // Duplicate checks
    /// Records share an identical normalized key.
    ExactDuplicate { field: String, key: String },
    /// Two distinct keys within a small edit distance.
    FuzzyDuplicate {
        field: String,
        first: String,
        second: String,
        distance: usize,
    },

    // Temporal checks
    /// A date precedes one it must follow.
    DateOrder {
        earlier_field: String,
        later_field: String,
        earlier: CalendarDate,
        later: CalendarDate,
    },
    /// A date lies after the reference date.
    FutureDate { field: String, date: CalendarDate },
    /// A date lies outside the window around the field's modal date.
    DateOutsideWindow {
        field: String,
        date: CalendarDate,
        modal: CalendarDate,
        months: u32,
    },

    // Logical checks
    /// Confirmed case status without a positive lab result.
    ConfirmedWithoutPositiveLab {
        status_field: String,
        lab_field: String,
    },
    /// Hospitalized without a hospital name.
    HospitalizedWithoutHospital {
        hospitalized_field: String,
        hospital_field: String,
    },
    /// Deceased outcome without a death date.
    DeceasedWithoutDeathDate {
        outcome_field: String,
        death_field: String,
    },
    /// Death date recorded while the outcome is not deceased.
    DeathDateWithoutDeceased {
        outcome_field: String,
        death_field: String,
    },

    // Completeness checks
    /// A required field has no value.
    MissingRequired { field: String },

    // Range checks
    /// Age below the minimum or above the maximum.
    AgeOutOfRange {
        field: String,
        age: f64,
        min: f64,
        max: f64,
    },
}

impl IssueKind {
    /// The check that produces this kind of issue.
    pub fn check(&self) -> CheckKind {
        match self {
            IssueKind::ExactDuplicate { .. } => CheckKind::ExactDuplicate,
            IssueKind::FuzzyDuplicate { .. } => CheckKind::FuzzyDuplicate,
            IssueKind::DateOrder { .. } => CheckKind::DateOrder,
            IssueKind::FutureDate { .. } => CheckKind::FutureDate,
            IssueKind::DateOutsideWindow { .. } => CheckKind::DateRange,
            IssueKind::ConfirmedWithoutPositiveLab { .. }
            | IssueKind::HospitalizedWithoutHospital { .. }
            | IssueKind::DeceasedWithoutDeathDate { .. }
            | IssueKind::DeathDateWithoutDeceased { .. } => CheckKind::Logical,
            IssueKind::MissingRequired { .. } => CheckKind::Completeness,
            IssueKind::AgeOutOfRange { .. } => CheckKind::AgeRange,
        }
    }

    pub fn category(&self) -> Category {
        self.check().category()
    }

    pub fn default_severity(&self) -> Severity {
        match self {
            IssueKind::FuzzyDuplicate { .. }
            | IssueKind::DateOutsideWindow { .. }
            | IssueKind::HospitalizedWithoutHospital { .. }
            | IssueKind::DeceasedWithoutDeathDate { .. }
            | IssueKind::DeathDateWithoutDeceased { .. }
            | IssueKind::MissingRequired { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Column the issue should be highlighted on.
    pub fn field(&self) -> &str {
        match self {
            IssueKind::ExactDuplicate { field, .. }
            | IssueKind::FuzzyDuplicate { field, .. }
            | IssueKind::FutureDate { field, .. }
            | IssueKind::DateOutsideWindow { field, .. }
            | IssueKind::MissingRequired { field }
            | IssueKind::AgeOutOfRange { field, .. } => field,
            IssueKind::DateOrder { later_field, .. } => later_field,
            IssueKind::ConfirmedWithoutPositiveLab { status_field, .. } => status_field,
            IssueKind::HospitalizedWithoutHospital { hospital_field, .. } => hospital_field,
            IssueKind::DeceasedWithoutDeathDate { death_field, .. }
            | IssueKind::DeathDateWithoutDeceased { death_field, .. } => death_field,
        }
    }

    /// Part of the issue id that tells apart issues of one check on the
    /// same records.
    fn discriminator(&self) -> String {
        match self {
            IssueKind::DateOrder {
                earlier_field,
                later_field,
                ..
            } => format!("{earlier_field}<{later_field}"),
            IssueKind::ConfirmedWithoutPositiveLab { .. } => "confirmed_without_lab".to_string(),
            IssueKind::HospitalizedWithoutHospital { .. } => {
                "hospitalized_without_hospital".to_string()
            }
            IssueKind::DeceasedWithoutDeathDate { .. } => "deceased_without_date".to_string(),
            IssueKind::DeathDateWithoutDeceased { .. } => "date_without_deceased".to_string(),
            other => other.field().to_string(),
        }
    }

    pub fn format_message(&self) -> String {
        match self {
            IssueKind::ExactDuplicate { field, key } => {
                format!("Records share the same {field} value '{key}'")
            }
            IssueKind::FuzzyDuplicate {
                field,
                first,
                second,
                distance,
            } => format!(
                "{field} values '{first}' and '{second}' differ by {distance} character(s); possible duplicate"
            ),
            IssueKind::DateOrder {
                earlier_field,
                later_field,
                earlier,
                later,
            } => format!(
                "{later_field} ({later}) is before {earlier_field} ({earlier})"
            ),
            IssueKind::FutureDate { field, date } => {
                format!("{field} ({date}) is in the future")
            }
            IssueKind::DateOutsideWindow {
                field,
                date,
                modal,
                months,
            } => format!(
                "{field} ({date}) is more than {months} month(s) from the most common date ({modal})"
            ),
            IssueKind::ConfirmedWithoutPositiveLab {
                status_field,
                lab_field,
            } => format!("{status_field} is confirmed but {lab_field} is not positive"),
            IssueKind::HospitalizedWithoutHospital {
                hospitalized_field,
                hospital_field,
            } => format!("{hospitalized_field} is yes but {hospital_field} is empty"),
            IssueKind::DeceasedWithoutDeathDate {
                outcome_field,
                death_field,
            } => format!("{outcome_field} is deceased but {death_field} is empty"),
            IssueKind::DeathDateWithoutDeceased {
                outcome_field,
                death_field,
            } => format!("{death_field} is recorded but {outcome_field} is not deceased"),
            IssueKind::MissingRequired { field } => format!("Required field {field} is empty"),
            IssueKind::AgeOutOfRange {
                field,
                age,
                min,
                max,
            } => format!("{field} {age} is outside the allowed range {min}-{max}"),
        }
    }
}

/// Stable issue identity, derived from the check, the field and the
/// affected records. Identical input always yields identical ids.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssueId(String);

impl IssueId {
    fn derive(kind: &IssueKind, record_ids: &[RecordId]) -> Self {
        let mut ids: Vec<&str> = record_ids.iter().map(RecordId::as_str).collect();
        ids.sort_unstable();
        Self(format!(
            "{}:{}:{}",
            kind.check(),
            kind.discriminator(),
            ids.join("+")
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IssueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One data quality finding, covering one or more records.
///
/// Immutable once created except for `dismissed`, which is review state
/// and never a data correction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataQualityIssue {
    pub id: IssueId,
    pub check: CheckKind,
    pub category: Category,
    pub severity: Severity,
    pub record_ids: Vec<RecordId>,
    pub field: Option<String>,
    pub message: String,
    pub kind: IssueKind,
    #[serde(default)]
    pub dismissed: bool,
}

impl DataQualityIssue {
    pub fn new(kind: IssueKind, record_ids: Vec<RecordId>) -> Self {
        Self {
            id: IssueId::derive(&kind, &record_ids),
            check: kind.check(),
            category: kind.category(),
            severity: kind.default_severity(),
            field: Some(kind.field().to_string()),
            message: kind.format_message(),
            record_ids,
            kind,
            dismissed: false,
        }
    }

    /// Issue for a single record.
    pub fn for_record(kind: IssueKind, record_id: &RecordId) -> Self {
        Self::new(kind, vec![record_id.clone()])
    }

    pub fn dismiss(&mut self) {
        self.dismissed = true;
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}
