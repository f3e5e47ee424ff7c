//! Locale profiles.
//!
//! A [`LocaleProfile`] is an immutable value passed explicitly into every
//! parse/format call. There is no ambient "current locale".

use serde::{Deserialize, Serialize};

use crate::error::{LocaleError, Result};

/// Order of day, month and year in numeric dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateOrder {
    /// `2024-05-17`
    YearFirst,
    /// `17/05/2024`
    DayFirst,
    /// `05/17/2024`
    MonthFirst,
}

/// Numeric and date conventions for one locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleProfile {
    tag: String,
    decimal_separator: char,
    group_separator: Option<char>,
    csv_delimiter: char,
    date_order: DateOrder,
    date_separator: char,
}

impl LocaleProfile {
    /// Build a custom profile.
    pub fn new(
        tag: impl Into<String>,
        decimal_separator: char,
        group_separator: Option<char>,
        csv_delimiter: char,
        date_order: DateOrder,
    ) -> Result<Self> {
        for separator in std::iter::once(decimal_separator).chain(group_separator) {
            if separator.is_ascii_digit() || matches!(separator, '+' | '-' | '"') {
                return Err(LocaleError::InvalidSeparator(separator));
            }
        }
        if group_separator == Some(decimal_separator) {
            return Err(LocaleError::SeparatorClash(decimal_separator));
        }
        let date_separator = match date_order {
            DateOrder::YearFirst => '-',
            _ => '/',
        };
        Ok(Self {
            tag: tag.into(),
            decimal_separator,
            group_separator,
            csv_delimiter,
            date_order,
            date_separator,
        })
    }

    /// US English: `1,234.5`, comma-delimited CSV, month-first dates.
    pub fn en_us() -> Self {
        Self::preset("en-US", '.', Some(','), ',', DateOrder::MonthFirst, '/')
    }

    /// British English: `1,234.5`, comma-delimited CSV, day-first dates.
    pub fn en_gb() -> Self {
        Self::preset("en-GB", '.', Some(','), ',', DateOrder::DayFirst, '/')
    }

    /// German: `1.234,5`, semicolon-delimited CSV, `17.05.2024`.
    pub fn de_de() -> Self {
        Self::preset("de-DE", ',', Some('.'), ';', DateOrder::DayFirst, '.')
    }

    /// French: `1 234,5` (narrow no-break space), semicolon CSV, day-first.
    pub fn fr_fr() -> Self {
        Self::preset("fr-FR", ',', Some('\u{202f}'), ';', DateOrder::DayFirst, '/')
    }

    /// Machine profile: period decimal, no grouping, ISO dates.
    pub fn iso() -> Self {
        Self::preset("iso", '.', None, ',', DateOrder::YearFirst, '-')
    }

    fn preset(
        tag: &str,
        decimal_separator: char,
        group_separator: Option<char>,
        csv_delimiter: char,
        date_order: DateOrder,
        date_separator: char,
    ) -> Self {
        Self {
            tag: tag.to_string(),
            decimal_separator,
            group_separator,
            csv_delimiter,
            date_order,
            date_separator,
        }
    }

    /// Resolve a locale tag such as `de-DE`, `en_GB.UTF-8` or `fr`.
    ///
    /// Matches on language first and region second. Comma-decimal European
    /// languages without their own preset share the German conventions.
    pub fn from_tag(tag: &str) -> Result<Self> {
        let base = tag.split(['.', '@']).next().unwrap_or_default().trim();
        let mut parts = base.split(['-', '_']);
        let language = parts.next().unwrap_or_default().to_lowercase();
        let region = parts.next().map(str::to_uppercase);

        let profile = match (language.as_str(), region.as_deref()) {
            ("iso" | "c" | "posix", _) => Self::iso(),
            ("en", None | Some("US" | "PH" | "CA")) => Self::en_us(),
            ("en", Some(_)) => Self::en_gb(),
            ("fr", _) => Self::fr_fr(),
            ("de", _) => Self::de_de(),
            ("es" | "it" | "nl" | "pt" | "da" | "id" | "tr", _) => {
                let mut profile = Self::de_de();
                profile.tag = base.to_string();
                profile
            }
            _ => return Err(LocaleError::UnknownTag(tag.to_string())),
        };
        Ok(profile)
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn decimal_separator(&self) -> char {
        self.decimal_separator
    }

    pub fn group_separator(&self) -> Option<char> {
        self.group_separator
    }

    pub fn csv_delimiter(&self) -> char {
        self.csv_delimiter
    }

    pub fn date_order(&self) -> DateOrder {
        self.date_order
    }

    pub fn date_separator(&self) -> char {
        self.date_separator
    }

    /// Whether `ch` counts as this profile's group separator.
    ///
    /// Space-like group separators accept any of the usual space variants,
    /// since spreadsheets export them interchangeably.
    pub fn is_group_separator(&self, ch: char) -> bool {
        match self.group_separator {
            Some(group) if is_space_like(group) => is_space_like(ch),
            Some(group) => ch == group,
            None => false,
        }
    }
}

impl Default for LocaleProfile {
    fn default() -> Self {
        Self::en_us()
    }
}

fn is_space_like(ch: char) -> bool {
    matches!(ch, ' ' | '\u{a0}' | '\u{202f}')
}
