//! Records back to delimited text.

use epi_locale::format_csv_number;
use epi_model::{Column, Record, Value};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{IngestError, Result};

/// Which column name goes in the header row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderStyle {
    /// Column keys; re-importing reproduces the same keys.
    #[default]
    Keys,
    /// Human-readable labels.
    Labels,
}

/// Options for [`export_to_csv`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvWriteOptions {
    pub delimiter: char,
    pub header: HeaderStyle,
}

impl Default for CsvWriteOptions {
    fn default() -> Self {
        Self {
            delimiter: ',',
            header: HeaderStyle::Keys,
        }
    }
}

/// Serialize records as delimited text, header row first.
///
/// Numbers are always written with a period decimal and no grouping, dates
/// as ISO `YYYY-MM-DD`, and missing values as empty cells. Fields that
/// contain the delimiter, quotes, or line breaks are quoted.
///
/// # Errors
///
/// Returns [`IngestError::InvalidDelimiter`] for a non-ASCII delimiter.
pub fn export_to_csv(
    columns: &[Column],
    records: &[Record],
    options: &CsvWriteOptions,
) -> Result<String> {
    let delimiter = u8::try_from(options.delimiter)
        .ok()
        .filter(u8::is_ascii)
        .ok_or(IngestError::InvalidDelimiter(options.delimiter))?;

    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(Vec::new());

    writer.write_record(columns.iter().map(|column| match options.header {
        HeaderStyle::Keys => column.key.as_str(),
        HeaderStyle::Labels => column.label.as_str(),
    }))?;
    for record in records {
        writer.write_record(columns.iter().map(|column| render_cell(record.get(&column.key))))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| IngestError::Write(err.to_string()))?;
    debug!(
        column_count = columns.len(),
        record_count = records.len(),
        "exported CSV"
    );
    String::from_utf8(bytes).map_err(|err| IngestError::Write(err.to_string()))
}

fn render_cell(value: &Value) -> String {
    match value {
        Value::Number(number) => format_csv_number(*number),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
