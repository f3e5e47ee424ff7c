//! Delimited text to columns and records.

use std::collections::BTreeMap;
use std::fmt;

use epi_locale::LocaleProfile;
use epi_model::{Column, Dataset, ModelError, Provenance, Record, RecordId, Value};
use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span, warn};

use crate::error::{IngestError, Result};

use super::header::CsvHeader;
use super::inference::{DEFAULT_SAMPLE_SIZE, coerce_cell, infer_column_type};
use super::line::{LogicalLine, detect_delimiter, parse_csv_line, split_records};

/// Options for [`parse_csv`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvReadOptions {
    /// Force a delimiter instead of detecting it from the header row.
    pub delimiter: Option<char>,
    /// Leading data rows sampled per column for type inference.
    pub sample_size: usize,
}

impl Default for CsvReadOptions {
    fn default() -> Self {
        Self {
            delimiter: None,
            sample_size: DEFAULT_SAMPLE_SIZE,
        }
    }
}

impl CsvReadOptions {
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    #[must_use]
    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size;
        self
    }
}

/// A row-scoped problem found while parsing.
///
/// Rows with the wrong number of fields are skipped; cells that do not fit
/// their column type are kept as missing. Neither aborts the parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowError {
    /// 1-based physical line in the source text.
    pub line: usize,
    pub message: String,
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {}: {}", self.line, self.message)
    }
}

/// Outcome of [`parse_csv`].
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCsv {
    pub columns: Vec<Column>,
    pub records: Vec<Record>,
    pub delimiter: char,
    pub errors: Vec<RowError>,
}

impl ParsedCsv {
    /// Row errors rendered as strings.
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    /// Wrap the parsed rows into an imported dataset.
    pub fn into_dataset(self) -> std::result::Result<Dataset, ModelError> {
        Dataset::new(self.columns, self.records, Provenance::Import)
    }
}

struct DataRow {
    line: usize,
    ordinal: usize,
    fields: Vec<String>,
}

/// Parse delimited text into typed columns and records.
///
/// The first non-blank record is the header. Column types are inferred
/// from the first `sample_size` well-formed data rows.
///
/// # Errors
///
/// Returns [`IngestError::EmptyInput`] for blank input and
/// [`IngestError::NoColumns`] when the header row has no names.
pub fn parse_csv(text: &str, profile: &LocaleProfile, options: &CsvReadOptions) -> Result<ParsedCsv> {
    let span = debug_span!("parse_csv", locale = profile.tag());
    let _guard = span.enter();

    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let delimiter = match options.delimiter {
        Some(delimiter) => delimiter,
        None => {
            let Some(header_line) = split_records(text, None).into_iter().next() else {
                return Err(IngestError::EmptyInput);
            };
            detect_delimiter(&header_line.text)
        }
    };
    let mut lines = split_records(text, Some(delimiter)).into_iter();
    let Some(header_line) = lines.next() else {
        return Err(IngestError::EmptyInput);
    };
    let labels = parse_csv_line(&header_line.text, delimiter);
    if labels.iter().all(String::is_empty) {
        return Err(IngestError::NoColumns);
    }
    let header = CsvHeader::from_labels(labels);

    let mut errors = Vec::new();
    let rows = collect_rows(lines, delimiter, header.len(), &mut errors);

    let columns: Vec<Column> = header
        .keys
        .iter()
        .zip(&header.labels)
        .enumerate()
        .map(|(index, (key, label))| {
            let samples = rows
                .iter()
                .take(options.sample_size)
                .map(|row| row.fields[index].as_str());
            let label = if label.is_empty() { key } else { label };
            Column::new(key.clone(), label.clone(), infer_column_type(samples, profile))
        })
        .collect();

    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        let mut values = BTreeMap::new();
        for (column, raw) in columns.iter().zip(&row.fields) {
            let value = match coerce_cell(raw, column.column_type, profile) {
                Ok(value) => value,
                Err(err) => {
                    errors.push(RowError {
                        line: row.line,
                        message: format!("column '{}': {err}; stored as missing", column.key),
                    });
                    Value::Null
                }
            };
            if !value.is_null() {
                values.insert(column.key.clone(), value);
            }
        }
        match Record::new(RecordId::from_row(row.ordinal), values, &columns) {
            Ok(record) => records.push(record),
            Err(err) => errors.push(RowError {
                line: row.line,
                message: err.to_string(),
            }),
        }
    }

    if !errors.is_empty() {
        warn!(error_count = errors.len(), "CSV rows reported problems");
    }
    debug!(
        delimiter = %delimiter.escape_default(),
        column_count = columns.len(),
        record_count = records.len(),
        "parsed CSV"
    );

    Ok(ParsedCsv {
        columns,
        records,
        delimiter,
        errors,
    })
}

fn collect_rows(
    lines: impl Iterator<Item = LogicalLine>,
    delimiter: char,
    width: usize,
    errors: &mut Vec<RowError>,
) -> Vec<DataRow> {
    let mut rows = Vec::new();
    for (index, line) in lines.enumerate() {
        let fields = parse_csv_line(&line.text, delimiter);
        if fields.len() != width {
            errors.push(RowError {
                line: line.line,
                message: format!("expected {width} fields, found {}; row skipped", fields.len()),
            });
            continue;
        }
        rows.push(DataRow {
            line: line.line,
            ordinal: index + 1,
            fields,
        });
    }
    rows
}

#[cfg(test)]
mod tests {
    use epi_model::{CalendarDate, ColumnType};

    use super::*;

    fn parse(text: &str) -> ParsedCsv {
        parse_csv(text, &LocaleProfile::en_us(), &CsvReadOptions::default()).unwrap()
    }

    #[test]
    fn parses_header_types_and_values() {
        let parsed = parse("Case ID;Age;Onset Date;Ill\nA1;34;2024-05-01;yes\nA2;;2024-05-03;no\n");
        assert_eq!(parsed.delimiter, ';');
        let types: Vec<ColumnType> = parsed.columns.iter().map(|c| c.column_type).collect();
        assert_eq!(
            types,
            vec![
                ColumnType::Text,
                ColumnType::Number,
                ColumnType::Date,
                ColumnType::Boolean
            ]
        );
        assert_eq!(parsed.columns[2].key, "onset_date");
        assert_eq!(parsed.columns[2].label, "Onset Date");

        let second = &parsed.records[1];
        assert_eq!(second.id().as_str(), "row-2");
        assert!(second.is_missing("age"));
        assert_eq!(
            second.get("onset_date"),
            &Value::Date(CalendarDate::from_ymd(2024, 5, 3).unwrap())
        );
        assert_eq!(second.get("ill"), &Value::Boolean(false));
    }

    #[test]
    fn arity_mismatch_skips_row_only() {
        let parsed = parse("a,b\n1,2\n3\n4,5,6\n7,8\n");
        assert_eq!(parsed.records.len(), 2);
        assert_eq!(
            parsed.error_messages(),
            vec![
                "row 3: expected 2 fields, found 1; row skipped",
                "row 4: expected 2 fields, found 3; row skipped",
            ]
        );
        // Ids keep pointing at source data rows.
        assert_eq!(parsed.records[1].id().as_str(), "row-4");
    }

    #[test]
    fn late_type_mismatch_is_kept_as_missing() {
        let mut text = String::from("age\n");
        for n in 1..=10 {
            text.push_str(&format!("{n}\n"));
        }
        text.push_str("unknown\n");
        let parsed = parse(&text);
        assert_eq!(parsed.columns[0].column_type, ColumnType::Number);
        assert_eq!(parsed.records.len(), 11);
        assert!(parsed.records[10].is_missing("age"));
        assert_eq!(
            parsed.error_messages(),
            vec!["row 12: column 'age': 'unknown' is not a valid number; stored as missing"]
        );
    }

    #[test]
    fn empty_and_headerless_inputs_fail() {
        let profile = LocaleProfile::en_us();
        let options = CsvReadOptions::default();
        assert!(matches!(
            parse_csv("", &profile, &options),
            Err(IngestError::EmptyInput)
        ));
        assert!(matches!(
            parse_csv("\n  \r\n", &profile, &options),
            Err(IngestError::EmptyInput)
        ));
        assert!(matches!(
            parse_csv(",,\n1,2,3\n", &profile, &options),
            Err(IngestError::NoColumns)
        ));
    }

    #[test]
    fn strips_bom_and_honours_forced_delimiter() {
        let options = CsvReadOptions::default().with_delimiter('|');
        let parsed = parse_csv("\u{feff}name|note\nAnn|a,b\n", &LocaleProfile::en_us(), &options)
            .unwrap();
        assert_eq!(parsed.columns[0].key, "name");
        assert_eq!(parsed.records[0].get("note"), &Value::Text("a,b".to_string()));
    }

    #[test]
    fn german_profile_reads_comma_decimals() {
        let parsed = parse_csv(
            "Gewicht;Datum\n72,5;17.05.2024\n1.080,25;18.05.2024\n",
            &LocaleProfile::de_de(),
            &CsvReadOptions::default(),
        )
        .unwrap();
        assert_eq!(parsed.records[0].get("gewicht"), &Value::Number(72.5));
        assert_eq!(parsed.records[1].get("gewicht"), &Value::Number(1080.25));
        assert_eq!(parsed.columns[1].column_type, ColumnType::Date);
    }
}
