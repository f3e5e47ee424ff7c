//! Typed cell values.
//!
//! Every cell of a [`Record`](crate::Record) is one of these variants. Dates
//! are held as [`CalendarDate`], the canonical ISO representation, so a
//! dataset never depends on the locale it was imported under.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::ModelError;
use crate::column::ColumnType;

/// Boolean tokens accepted on input, case-insensitive.
pub const TRUE_TOKENS: &[&str] = &["true", "yes", "1"];
pub const FALSE_TOKENS: &[&str] = &["false", "no", "0"];

/// Parse one of the fixed boolean tokens (`true/false/yes/no/1/0`).
pub fn parse_bool_token(token: &str) -> Option<bool> {
    let normalized = token.trim().to_lowercase();
    if TRUE_TOKENS.contains(&normalized.as_str()) {
        Some(true)
    } else if FALSE_TOKENS.contains(&normalized.as_str()) {
        Some(false)
    } else {
        None
    }
}

/// A calendar date with an optional time of day.
///
/// Displays and parses as `YYYY-MM-DD` or `YYYY-MM-DD HH:MM[:SS]`; a `T`
/// separator is accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate {
    date: NaiveDate,
    time: Option<NaiveTime>,
}

impl CalendarDate {
    pub fn new(date: NaiveDate) -> Self {
        Self { date, time: None }
    }

    pub fn with_time(date: NaiveDate, time: NaiveTime) -> Self {
        Self {
            date,
            time: Some(time),
        }
    }

    /// Build from year/month/day, returning `None` for impossible dates.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self::new)
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn time(&self) -> Option<NaiveTime> {
        self.time
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.date.format("%Y-%m-%d"))?;
        match self.time {
            Some(time) if time.second() != 0 => write!(f, " {}", time.format("%H:%M:%S")),
            Some(time) => write!(f, " {}", time.format("%H:%M")),
            None => Ok(()),
        }
    }
}

impl FromStr for CalendarDate {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || ModelError::InvalidDate(s.to_string());
        let (date_part, time_part) = match trimmed.split_once(['T', ' ']) {
            Some((date, time)) => (date, Some(time.trim())),
            None => (trimmed, None),
        };
        let date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(|_| invalid())?;
        let time = match time_part {
            Some(text) => Some(
                NaiveTime::parse_from_str(text, "%H:%M:%S")
                    .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M"))
                    .map_err(|_| invalid())?,
            ),
            None => None,
        };
        Ok(Self { date, time })
    }
}

impl Serialize for CalendarDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CalendarDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A single typed cell.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum Value {
    Text(String),
    Number(f64),
    Date(CalendarDate),
    Boolean(bool),
    #[default]
    Null,
}

impl Value {
    /// Text value, mapping blank strings to `Null`.
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.trim().is_empty() {
            Value::Null
        } else {
            Value::Text(value)
        }
    }

    /// Numeric value, mapping non-finite numbers to `Null`.
    pub fn number(value: f64) -> Self {
        if value.is_finite() {
            Value::Number(value)
        } else {
            Value::Null
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Name of the variant, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Text(_) => "text",
            Value::Number(_) => "number",
            Value::Date(_) => "date",
            Value::Boolean(_) => "boolean",
            Value::Null => "null",
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<CalendarDate> {
        match self {
            Value::Date(date) => Some(*date),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(flag) => Some(*flag),
            _ => None,
        }
    }

    /// Whether this value may be stored in a column of the given type.
    ///
    /// `Null` type-checks against every column.
    pub fn type_checks(&self, column_type: ColumnType) -> bool {
        match self {
            Value::Null => true,
            Value::Text(_) => column_type.is_textual(),
            Value::Number(_) => column_type == ColumnType::Number,
            Value::Date(_) => column_type == ColumnType::Date,
            Value::Boolean(_) => column_type == ColumnType::Boolean,
        }
    }

    /// Compare against a user-entered token (e.g. "yes", "Confirmed", "1").
    ///
    /// Text compares case-insensitively after trimming; booleans use the
    /// fixed token set; numbers compare numerically; dates by calendar value.
    pub fn matches_token(&self, token: &str) -> bool {
        let token = token.trim();
        match self {
            Value::Null => false,
            Value::Text(text) => text.trim().to_lowercase() == token.to_lowercase(),
            Value::Number(value) => token.parse::<f64>().is_ok_and(|parsed| parsed == *value),
            Value::Boolean(flag) => parse_bool_token(token) == Some(*flag),
            Value::Date(date) => token
                .parse::<CalendarDate>()
                .is_ok_and(|parsed| parsed == *date),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(text) => f.write_str(text),
            Value::Number(value) => write!(f, "{value}"),
            Value::Date(date) => write!(f, "{date}"),
            Value::Boolean(flag) => write!(f, "{flag}"),
            Value::Null => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_tokens_are_case_insensitive() {
        assert_eq!(parse_bool_token("YES"), Some(true));
        assert_eq!(parse_bool_token(" 0 "), Some(false));
        assert_eq!(parse_bool_token("maybe"), None);
    }

    #[test]
    fn calendar_date_round_trips_with_time() {
        let parsed: CalendarDate = "2024-03-05T14:30".parse().unwrap();
        assert_eq!(parsed.to_string(), "2024-03-05 14:30");
        let with_seconds: CalendarDate = "2024-03-05 14:30:15".parse().unwrap();
        assert_eq!(with_seconds.to_string(), "2024-03-05 14:30:15");
    }

    #[test]
    fn calendar_date_rejects_impossible_day() {
        assert!("2023-02-29".parse::<CalendarDate>().is_err());
        assert!("2024-02-29".parse::<CalendarDate>().is_ok());
    }

    #[test]
    fn null_type_checks_everywhere() {
        for column_type in [
            ColumnType::Text,
            ColumnType::Number,
            ColumnType::Date,
            ColumnType::Boolean,
            ColumnType::Categorical,
        ] {
            assert!(Value::Null.type_checks(column_type));
        }
        assert!(Value::Text("a".into()).type_checks(ColumnType::Categorical));
        assert!(!Value::Number(1.0).type_checks(ColumnType::Text));
    }

    #[test]
    fn matches_token_by_variant() {
        assert!(Value::Text("Confirmed ".into()).matches_token("confirmed"));
        assert!(Value::Boolean(true).matches_token("Yes"));
        assert!(!Value::Boolean(false).matches_token("1"));
        assert!(Value::Number(3.0).matches_token("3"));
        assert!(Value::Date(CalendarDate::from_ymd(2024, 1, 2).unwrap()).matches_token("2024-01-02"));
        assert!(!Value::Null.matches_token(""));
    }

    #[test]
    fn constructors_map_blank_and_non_finite_to_null() {
        assert_eq!(Value::text("   "), Value::Null);
        assert_eq!(Value::number(f64::NAN), Value::Null);
        assert_eq!(Value::number(2.5), Value::Number(2.5));
    }

    #[test]
    fn value_serializes_tagged() {
        let json = serde_json::to_string(&Value::Date(
            CalendarDate::from_ymd(2024, 6, 1).unwrap(),
        ))
        .unwrap();
        assert_eq!(json, r#"{"kind":"Date","value":"2024-06-01"}"#);
    }
}
