//! Column definitions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Declared type of a column.
///
/// Assigned once at ingestion (or by the form that created the dataset)
/// and immutable afterwards. Governs how cells are parsed and validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    #[default]
    Text,
    Number,
    Date,
    Boolean,
    /// Text drawn from a fixed set of options (form-defined selects).
    Categorical,
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Text => "text",
            ColumnType::Number => "number",
            ColumnType::Date => "date",
            ColumnType::Boolean => "boolean",
            ColumnType::Categorical => "categorical",
        }
    }

    /// Returns true for columns whose values are stored as text.
    pub fn is_textual(&self) -> bool {
        matches!(self, ColumnType::Text | ColumnType::Categorical)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "string" => Ok(ColumnType::Text),
            "number" | "numeric" => Ok(ColumnType::Number),
            "date" => Ok(ColumnType::Date),
            "boolean" | "bool" => Ok(ColumnType::Boolean),
            "categorical" | "select" => Ok(ColumnType::Categorical),
            _ => Err(ModelError::UnknownColumnType(s.to_string())),
        }
    }
}

/// A dataset column: machine key, display label, declared type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub key: String,
    pub label: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
}

impl Column {
    pub fn new(key: impl Into<String>, label: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            column_type,
        }
    }
}
