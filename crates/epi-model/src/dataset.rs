//! Datasets: ordered columns, ordered records, provenance.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::column::Column;
use crate::error::{ModelError, Result};
use crate::ids::RecordId;
use crate::record::Record;
use crate::value::Value;

/// Where a dataset came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Parsed from a delimited text file.
    Import,
    /// Entered through a data-collection form.
    Form,
}

/// A schema-checked table of case records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    columns: Vec<Column>,
    records: Vec<Record>,
    provenance: Provenance,
}

impl Dataset {
    /// Build a dataset, validating column keys and every record.
    pub fn new(columns: Vec<Column>, records: Vec<Record>, provenance: Provenance) -> Result<Self> {
        let mut dataset = Self::empty(columns, provenance)?;
        for record in records {
            dataset.push_record(record)?;
        }
        Ok(dataset)
    }

    /// A dataset with columns but no records.
    pub fn empty(columns: Vec<Column>, provenance: Provenance) -> Result<Self> {
        let mut seen = BTreeSet::new();
        for column in &columns {
            if !seen.insert(column.key.as_str()) {
                return Err(ModelError::DuplicateColumnKey(column.key.clone()));
            }
        }
        Ok(Self {
            columns,
            records: Vec::new(),
            provenance,
        })
    }

    /// Append a record after validating it against the schema.
    pub fn push_record(&mut self, record: Record) -> Result<()> {
        record.validate(&self.columns)?;
        if self.record(record.id()).is_some() {
            return Err(ModelError::DuplicateRecordId(record.id().to_string()));
        }
        self.records.push(record);
        Ok(())
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn provenance(&self) -> Provenance {
        self.provenance
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn column(&self, key: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.key == key)
    }

    pub fn record(&self, id: &RecordId) -> Option<&Record> {
        self.records.iter().find(|record| record.id() == id)
    }

    /// Values of one column, in record order.
    pub fn values<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a Value> + 'a {
        self.records.iter().map(move |record| record.get(key))
    }

    pub fn into_parts(self) -> (Vec<Column>, Vec<Record>, Provenance) {
        (self.columns, self.records, self.provenance)
    }
}
