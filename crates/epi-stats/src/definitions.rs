//! Outcome and exposure definitions, and the study design.

use std::fmt;

use epi_model::{FALSE_TOKENS, TRUE_TOKENS, Value, parse_bool_token};
use serde::{Deserialize, Serialize};

/// How a record's value falls against a definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Case, or exposed.
    Positive,
    /// Non-case, or unexposed.
    Negative,
    Missing,
    /// Present but in neither recognised set.
    Unrecognized,
}

/// Negative set implied by a positive set of same-polarity boolean tokens:
/// `yes` implies `false/no/0`. Other positive sets imply nothing.
fn implied_negatives(positive: &[String]) -> Option<Vec<String>> {
    let mut polarity = None;
    for token in positive {
        let flag = parse_bool_token(token)?;
        if polarity.is_some_and(|seen| seen != flag) {
            return None;
        }
        polarity = Some(flag);
    }
    let tokens = if polarity? { FALSE_TOKENS } else { TRUE_TOKENS };
    Some(tokens.iter().map(ToString::to_string).collect())
}

fn classify(value: &Value, positive: &[String], negative: Option<&[String]>) -> Classification {
    if value.is_null() || value.to_string().trim().is_empty() {
        return Classification::Missing;
    }
    let matches = |tokens: &[String]| tokens.iter().any(|token| value.matches_token(token));
    if matches(positive) {
        return Classification::Positive;
    }
    let implied = if negative.is_none() {
        implied_negatives(positive)
    } else {
        None
    };
    match negative.or(implied.as_deref()) {
        Some(tokens) if !matches(tokens) => Classification::Unrecognized,
        _ => Classification::Negative,
    }
}

/// Which outcome values make a record a case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeDefinition {
    pub column: String,
    pub case_values: Vec<String>,
    /// Values that make a record a non-case. When `None` and the case
    /// values are boolean tokens (`yes`, `true`, `1`), only the opposite
    /// tokens are non-cases; otherwise every present value outside
    /// `case_values` is a non-case.
    #[serde(default)]
    pub non_case_values: Option<Vec<String>>,
}

impl OutcomeDefinition {
    pub fn new<I, S>(column: impl Into<String>, case_values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            column: column.into(),
            case_values: case_values.into_iter().map(Into::into).collect(),
            non_case_values: None,
        }
    }

    #[must_use]
    pub fn with_non_case_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.non_case_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn classify(&self, value: &Value) -> Classification {
        classify(value, &self.case_values, self.non_case_values.as_deref())
    }
}

/// Which exposure values make a record exposed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExposureDefinition {
    pub column: String,
    pub exposed_values: Vec<String>,
    /// Values that make a record unexposed. When `None`, the same rule as
    /// [`OutcomeDefinition::non_case_values`] applies.
    #[serde(default)]
    pub unexposed_values: Option<Vec<String>>,
}

impl ExposureDefinition {
    pub fn new<I, S>(column: impl Into<String>, exposed_values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            column: column.into(),
            exposed_values: exposed_values.into_iter().map(Into::into).collect(),
            unexposed_values: None,
        }
    }

    #[must_use]
    pub fn with_unexposed_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.unexposed_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn classify(&self, value: &Value) -> Classification {
        classify(value, &self.exposed_values, self.unexposed_values.as_deref())
    }
}

/// Study design; decides which measure is primary and how percentages are
/// taken.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudyDesign {
    /// Retrospective cohort: risk ratio, row percentages.
    #[default]
    Cohort,
    /// Case-control: odds ratio, column percentages.
    CaseControl,
}

impl StudyDesign {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "cohort" => Some(Self::Cohort),
            "case_control" => Some(Self::CaseControl),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Cohort => "Cohort",
            Self::CaseControl => "Case-control",
        }
    }
}

impl fmt::Display for StudyDesign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
