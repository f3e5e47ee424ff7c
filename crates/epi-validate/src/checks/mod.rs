//! Data quality check modules.
//!
//! Each module performs one family of checks and returns its issues; the
//! engine concatenates them without cross-check deduplication.

mod completeness;
mod duplicates;
mod logical;
mod range;
mod temporal;

use chrono::{Local, NaiveDate};
use epi_model::{CalendarDate, Column, ColumnType, Record, Value, parse_bool_token};
use tracing::debug;

use crate::config::{CheckKind, DataQualityConfig, FieldRole};
use crate::issue::DataQualityIssue;

/// Shared, read-only view of one engine run.
pub(crate) struct CheckContext<'a> {
    pub columns: &'a [Column],
    pub records: &'a [Record],
    pub config: &'a DataQualityConfig,
    /// Dates after this day are in the future.
    pub today: NaiveDate,
}

impl<'a> CheckContext<'a> {
    pub fn new(columns: &'a [Column], records: &'a [Record], config: &'a DataQualityConfig) -> Self {
        Self {
            columns,
            records,
            config,
            today: config
                .reference_date
                .unwrap_or_else(|| Local::now().date_naive()),
        }
    }

    /// Column mapped to a role, if it exists in the dataset.
    pub fn mapped(&self, role: FieldRole) -> Option<&'a Column> {
        let key = self.config.field_mapping.column(role)?;
        self.column(key)
    }

    pub fn column(&self, key: &str) -> Option<&'a Column> {
        self.columns.iter().find(|column| column.key == key)
    }

    pub fn is_enabled(&self, kind: CheckKind) -> bool {
        self.config.is_enabled(kind)
    }
}

/// Run every enabled check.
pub(crate) fn run_all(ctx: &CheckContext<'_>) -> Vec<DataQualityIssue> {
    let mut issues = Vec::new();

    // 1. Exact and fuzzy duplicates over the mapped key fields
    issues.extend(duplicates::check(ctx));

    // 2. Date ordering, future dates, modal-date window
    issues.extend(temporal::check(ctx));

    // 3. Contradictory status fields
    if ctx.is_enabled(CheckKind::Logical) {
        issues.extend(logical::check(ctx));
    }

    // 4. Required fields
    if ctx.is_enabled(CheckKind::Completeness) {
        issues.extend(completeness::check(ctx));
    }

    // 5. Age bounds
    if ctx.is_enabled(CheckKind::AgeRange) {
        issues.extend(range::check(ctx));
    }

    debug!(issue_count = issues.len(), "checks complete");
    issues
}

/// Date value of a cell. Text cells holding ISO dates are accepted too.
pub(crate) fn date_value(value: &Value) -> Option<CalendarDate> {
    match value {
        Value::Date(date) => Some(*date),
        Value::Text(text) => text.trim().parse().ok(),
        _ => None,
    }
}

/// Numeric value of a cell. Text cells holding plain numbers are accepted.
pub(crate) fn number_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => Some(*number),
        Value::Text(text) => text.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

/// Truthiness of a yes/no cell.
pub(crate) fn flag_value(value: &Value) -> Option<bool> {
    match value {
        Value::Boolean(flag) => Some(*flag),
        Value::Text(text) => parse_bool_token(text),
        Value::Number(number) if *number == 1.0 => Some(true),
        Value::Number(number) if *number == 0.0 => Some(false),
        _ => None,
    }
}

/// Lower-cased text with internal whitespace collapsed to single spaces.
pub(crate) fn normalize_text(value: &Value) -> String {
    value
        .to_string()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

pub(crate) fn matches_any(value: &Value, tokens: &[String]) -> bool {
    tokens.iter().any(|token| value.matches_token(token))
}

/// Columns whose declared type is a date, in dataset order.
pub(crate) fn date_columns<'a>(columns: &'a [Column]) -> impl Iterator<Item = &'a Column> + 'a {
    columns
        .iter()
        .filter(|column| column.column_type == ColumnType::Date)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_case_and_whitespace() {
        assert_eq!(normalize_text(&Value::text("  Jane   DOE ")), "jane doe");
        assert_eq!(normalize_text(&Value::Null), "");
    }

    #[test]
    fn reads_flags_from_several_shapes() {
        assert_eq!(flag_value(&Value::Boolean(true)), Some(true));
        assert_eq!(flag_value(&Value::text("Yes")), Some(true));
        assert_eq!(flag_value(&Value::Number(0.0)), Some(false));
        assert_eq!(flag_value(&Value::text("maybe")), None);
    }

    #[test]
    fn reads_iso_text_dates() {
        assert_eq!(
            date_value(&Value::text("2024-02-29")),
            CalendarDate::from_ymd(2024, 2, 29)
        );
        assert_eq!(date_value(&Value::text("29/02/2024")), None);
    }
}
