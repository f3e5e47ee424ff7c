use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::column::Column;
use crate::error::{ModelError, Result};
use crate::ids::RecordId;
use crate::value::Value;

static NULL: Value = Value::Null;

/// One case record: a stable id plus typed values keyed by column key.
///
/// Absent keys and `Value::Null` both mean "missing".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    id: RecordId,
    values: BTreeMap<String, Value>,
}

impl Record {
    /// Build a record, validating every value against the column schema.
    pub fn new(
        id: RecordId,
        values: BTreeMap<String, Value>,
        columns: &[Column],
    ) -> Result<Self> {
        let record = Self { id, values };
        record.validate(columns)?;
        Ok(record)
    }

    /// Check that every key is declared and every value type-checks.
    pub fn validate(&self, columns: &[Column]) -> Result<()> {
        for (key, value) in &self.values {
            let Some(column) = columns.iter().find(|column| &column.key == key) else {
                return Err(ModelError::UnknownColumn {
                    record: self.id.to_string(),
                    key: key.clone(),
                });
            };
            if !value.type_checks(column.column_type) {
                return Err(ModelError::TypeMismatch {
                    record: self.id.to_string(),
                    key: key.clone(),
                    expected: column.column_type,
                    found: value.kind(),
                });
            }
        }
        Ok(())
    }

    pub fn id(&self) -> &RecordId {
        &self.id
    }

    /// Value for a column key; `Value::Null` when absent.
    pub fn get(&self, key: &str) -> &Value {
        self.values.get(key).unwrap_or(&NULL)
    }

    pub fn is_missing(&self, key: &str) -> bool {
        self.get(key).is_null()
    }

    pub fn values(&self) -> &BTreeMap<String, Value> {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::ColumnType;

    fn columns() -> Vec<Column> {
        vec![
            Column::new("age", "Age", ColumnType::Number),
            Column::new("name", "Name", ColumnType::Text),
        ]
    }

    #[test]
    fn record_accepts_matching_values() {
        let values = BTreeMap::from([
            ("age".to_string(), Value::Number(42.0)),
            ("name".to_string(), Value::Null),
        ]);
        let record = Record::new(RecordId::from_row(1), values, &columns()).unwrap();
        assert_eq!(record.get("age"), &Value::Number(42.0));
        assert!(record.is_missing("name"));
        assert!(record.is_missing("not_a_column"));
    }

    #[test]
    fn record_rejects_unknown_key() {
        let values = BTreeMap::from([("weight".to_string(), Value::Number(70.0))]);
        let err = Record::new(RecordId::from_row(1), values, &columns()).unwrap_err();
        assert!(matches!(err, ModelError::UnknownColumn { .. }));
    }

    #[test]
    fn record_rejects_type_mismatch() {
        let values = BTreeMap::from([("age".to_string(), Value::Text("forty".into()))]);
        let err = Record::new(RecordId::from_row(1), values, &columns()).unwrap_err();
        assert!(matches!(
            err,
            ModelError::TypeMismatch {
                expected: ColumnType::Number,
                found: "text",
                ..
            }
        ));
    }
}
