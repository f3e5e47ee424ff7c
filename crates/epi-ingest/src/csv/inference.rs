//! Column type inference and cell coercion.
//!
//! Priority order for inference (highest to lowest):
//! 1. Number: every sample parses as a flexible number
//! 2. Date: every sample has a numeric date shape and is a real calendar date
//! 3. Boolean: every sample is a boolean token
//! 4. Text (default)

use epi_locale::{LocaleProfile, is_flexible_number, looks_like_date, parse_date, parse_flexible_number};
use epi_model::{ColumnType, Value, parse_bool_token};
use thiserror::Error;

/// Number of leading data rows sampled per column.
pub const DEFAULT_SAMPLE_SIZE: usize = 10;

/// Tokens that always mean "missing", whatever the column type.
const MISSING_TOKENS: &[&str] = &["null", "undefined"];

/// Returns true for empty text and the `null`/`undefined` tokens.
pub fn is_missing_token(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.is_empty()
        || MISSING_TOKENS
            .iter()
            .any(|token| trimmed.eq_ignore_ascii_case(token))
}

/// Infer a column type from sample cell texts. Missing samples are ignored;
/// a column with no present samples is text.
pub fn infer_column_type<'a, I>(samples: I, profile: &LocaleProfile) -> ColumnType
where
    I: IntoIterator<Item = &'a str>,
{
    let present: Vec<&str> = samples
        .into_iter()
        .map(str::trim)
        .filter(|text| !is_missing_token(text))
        .collect();

    if present.is_empty() {
        return ColumnType::Text;
    }
    if present.iter().all(|text| is_flexible_number(text, profile)) {
        return ColumnType::Number;
    }
    if present
        .iter()
        .all(|text| looks_like_date(text) && parse_date(text, profile).is_some())
    {
        return ColumnType::Date;
    }
    if present.iter().all(|text| parse_bool_token(text).is_some()) {
        return ColumnType::Boolean;
    }
    ColumnType::Text
}

/// A cell whose text does not fit its column type.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("'{raw}' is not a valid {expected}")]
pub struct CellError {
    pub raw: String,
    pub expected: ColumnType,
}

/// Convert cell text into a typed value for the given column type.
pub fn coerce_cell(
    text: &str,
    column_type: ColumnType,
    profile: &LocaleProfile,
) -> Result<Value, CellError> {
    let trimmed = text.trim();
    if is_missing_token(trimmed) {
        return Ok(Value::Null);
    }
    let invalid = || CellError {
        raw: trimmed.to_string(),
        expected: column_type,
    };
    match column_type {
        ColumnType::Number => {
            let value = parse_flexible_number(trimmed, profile);
            if value.is_finite() {
                Ok(Value::Number(value))
            } else {
                Err(invalid())
            }
        }
        ColumnType::Date => parse_date(trimmed, profile)
            .map(Value::Date)
            .ok_or_else(invalid),
        ColumnType::Boolean => parse_bool_token(trimmed)
            .map(Value::Boolean)
            .ok_or_else(invalid),
        ColumnType::Text | ColumnType::Categorical => Ok(Value::Text(trimmed.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use epi_model::CalendarDate;

    use super::*;

    fn infer(samples: &[&str]) -> ColumnType {
        infer_column_type(samples.iter().copied(), &LocaleProfile::en_us())
    }

    #[test]
    fn infers_number() {
        assert_eq!(infer(&["1", "2", "3"]), ColumnType::Number);
        assert_eq!(infer(&["1,200.5", "", "-3"]), ColumnType::Number);
    }

    #[test]
    fn infers_date() {
        assert_eq!(infer(&["2024-01-01", "2024-01-02"]), ColumnType::Date);
        assert_eq!(infer(&["01/31/2024", "null"]), ColumnType::Date);
    }

    #[test]
    fn impossible_dates_fall_back_to_text() {
        assert_eq!(infer(&["2024-01-01", "2024-02-31"]), ColumnType::Text);
    }

    #[test]
    fn infers_boolean() {
        assert_eq!(infer(&["yes", "no", "yes"]), ColumnType::Boolean);
        assert_eq!(infer(&["TRUE", "false"]), ColumnType::Boolean);
    }

    #[test]
    fn zero_one_columns_are_numbers() {
        assert_eq!(infer(&["1", "0", "1"]), ColumnType::Number);
    }

    #[test]
    fn infers_text() {
        assert_eq!(infer(&["abc", "2024"]), ColumnType::Text);
        assert_eq!(infer(&["", "undefined"]), ColumnType::Text);
    }

    #[test]
    fn locale_changes_number_inference() {
        let samples = ["1,5", "2,25"];
        assert_eq!(
            infer_column_type(samples.iter().copied(), &LocaleProfile::de_de()),
            ColumnType::Number
        );
        assert_eq!(infer(&samples), ColumnType::Text);
    }

    #[test]
    fn coerce_missing_tokens_to_null_for_every_type() {
        let us = LocaleProfile::en_us();
        for column_type in [ColumnType::Number, ColumnType::Date, ColumnType::Text] {
            assert_eq!(coerce_cell("NULL", column_type, &us), Ok(Value::Null));
            assert_eq!(coerce_cell("  ", column_type, &us), Ok(Value::Null));
        }
    }

    #[test]
    fn coerce_typed_values() {
        let gb = LocaleProfile::en_gb();
        assert_eq!(
            coerce_cell("03/02/2024", ColumnType::Date, &gb),
            Ok(Value::Date(CalendarDate::from_ymd(2024, 2, 3).unwrap()))
        );
        assert_eq!(
            coerce_cell("Yes", ColumnType::Boolean, &gb),
            Ok(Value::Boolean(true))
        );
        assert_eq!(
            coerce_cell("abc", ColumnType::Number, &gb),
            Err(CellError {
                raw: "abc".to_string(),
                expected: ColumnType::Number
            })
        );
    }
}
