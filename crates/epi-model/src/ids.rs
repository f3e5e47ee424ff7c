use std::fmt;

use crate::ModelError;

/// Stable identifier of a record within a dataset.
///
/// Ingestion assigns `row-N` where N is the 1-based data row of the source
/// file; form-entered records carry whatever identifier the caller assigns.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(value: impl Into<String>) -> Result<Self, ModelError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ModelError::InvalidRecordId(value));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Identifier for the given 1-based data row.
    pub fn from_row(row: usize) -> Self {
        Self(format!("row-{row}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_id_trims() {
        let id = RecordId::new("  case-7 ").unwrap();
        assert_eq!(id.as_str(), "case-7");
    }

    #[test]
    fn record_id_rejects_blank() {
        assert!(RecordId::new("   ").is_err());
    }

    #[test]
    fn record_id_from_row() {
        assert_eq!(RecordId::from_row(12).to_string(), "row-12");
    }
}
