//! Number parsing and formatting.
//!
//! Parsing follows the caller's [`LocaleProfile`]. CSV output always uses
//! a period decimal separator and no grouping, whatever the profile, so
//! exported files stay readable by statistical packages.

use crate::profile::LocaleProfile;

/// Parse a number written with the profile's separators.
///
/// Accepts an optional leading sign, digits, at most one decimal separator
/// and correctly placed group separators. Anything else, including an empty
/// string, yields `NaN`.
pub fn parse_flexible_number(text: &str, profile: &LocaleProfile) -> f64 {
    try_parse_number(text, profile).unwrap_or(f64::NAN)
}

/// Returns true if `text` parses under [`parse_flexible_number`].
pub fn is_flexible_number(text: &str, profile: &LocaleProfile) -> bool {
    try_parse_number(text, profile).is_some()
}

fn try_parse_number(text: &str, profile: &LocaleProfile) -> Option<f64> {
    let trimmed = text.trim();
    let (negative, body) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let (integer, fraction) = match body.split_once(profile.decimal_separator()) {
        Some((integer, fraction)) => (integer, fraction),
        None => (body, ""),
    };
    if !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let groups: Vec<&str> = integer
        .split(|ch: char| profile.is_group_separator(ch))
        .collect();
    let mut digits = String::with_capacity(integer.len());
    for (index, group) in groups.iter().enumerate() {
        if !group.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        // Grouped numbers need 1-3 leading digits, then blocks of exactly 3.
        if groups.len() > 1 {
            let well_placed = if index == 0 {
                (1..=3).contains(&group.len())
            } else {
                group.len() == 3
            };
            if !well_placed {
                return None;
            }
        }
        digits.push_str(group);
    }

    if digits.is_empty() && fraction.is_empty() {
        return None;
    }
    let literal = format!(
        "{sign}{integer}.{fraction}",
        sign = if negative { "-" } else { "" },
        integer = if digits.is_empty() { "0" } else { &digits },
        fraction = if fraction.is_empty() { "0" } else { fraction },
    );
    literal.parse().ok()
}

/// Render a number for CSV export: period decimal, no grouping.
///
/// Uses the shortest representation that reads back to the same `f64`.
/// Non-finite values are written as an empty (missing) cell.
pub fn format_csv_number(value: f64) -> String {
    if value.is_finite() {
        format!("{value}")
    } else {
        String::new()
    }
}

/// Render a number for display with the profile's separators.
pub fn format_number(value: f64, decimals: usize, profile: &LocaleProfile) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let fixed = format!("{:.*}", decimals, value.abs());
    let (integer, fraction) = match fixed.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (fixed.as_str(), None),
    };

    let mut out = String::with_capacity(fixed.len() + integer.len() / 3 + 1);
    if value < 0.0 && fixed.bytes().any(|b| matches!(b, b'1'..=b'9')) {
        out.push('-');
    }
    match profile.group_separator() {
        Some(group) => {
            for (index, ch) in integer.chars().enumerate() {
                if index > 0 && (integer.len() - index) % 3 == 0 {
                    out.push(group);
                }
                out.push(ch);
            }
        }
        None => out.push_str(integer),
    }
    if let Some(fraction) = fraction {
        out.push(profile.decimal_separator());
        out.push_str(fraction);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_integer() {
        let us = LocaleProfile::en_us();
        assert_eq!(parse_flexible_number("123", &us), 123.0);
        assert_eq!(parse_flexible_number("-456", &us), -456.0);
        assert_eq!(parse_flexible_number("+7", &us), 7.0);
    }

    #[test]
    fn test_decimal_per_profile() {
        assert_eq!(parse_flexible_number("1,234.5", &LocaleProfile::en_us()), 1234.5);
        assert_eq!(parse_flexible_number("1.234,5", &LocaleProfile::de_de()), 1234.5);
        assert_eq!(parse_flexible_number("1 234,5", &LocaleProfile::fr_fr()), 1234.5);
        assert_eq!(parse_flexible_number("0,25", &LocaleProfile::de_de()), 0.25);
    }

    #[test]
    fn test_bare_fraction_and_trailing_separator() {
        let us = LocaleProfile::en_us();
        assert_eq!(parse_flexible_number(".5", &us), 0.5);
        assert_eq!(parse_flexible_number("5.", &us), 5.0);
    }

    #[test]
    fn test_whitespace() {
        assert_eq!(parse_flexible_number("  38.5  ", &LocaleProfile::en_us()), 38.5);
    }

    #[test]
    fn test_rejects_everything_else() {
        let us = LocaleProfile::en_us();
        for text in ["", "  ", "-", ".", "abc", "12.34.56", "1,23", "2024-01-01", "1e5", "- 5"] {
            assert!(
                parse_flexible_number(text, &us).is_nan(),
                "expected NaN for {text:?}"
            );
        }
    }

    #[test]
    fn test_other_profile_separators_rejected() {
        // A period is a group separator in German, so "1.5" is malformed.
        assert!(parse_flexible_number("1.5", &LocaleProfile::de_de()).is_nan());
        assert!(parse_flexible_number("1,000", &LocaleProfile::iso()).is_nan());
    }

    #[test]
    fn test_csv_number_always_uses_period() {
        assert_eq!(format_csv_number(1234.5), "1234.5");
        assert_eq!(format_csv_number(3.0), "3");
        assert_eq!(format_csv_number(-0.125), "-0.125");
        assert_eq!(format_csv_number(f64::NAN), "");
        assert_eq!(format_csv_number(f64::INFINITY), "");
    }

    #[test]
    fn test_format_number_grouping() {
        assert_eq!(format_number(1234567.891, 2, &LocaleProfile::en_us()), "1,234,567.89");
        assert_eq!(format_number(1234567.891, 1, &LocaleProfile::de_de()), "1.234.567,9");
        assert_eq!(format_number(-1234.0, 0, &LocaleProfile::iso()), "-1234");
        assert_eq!(format_number(-0.001, 2, &LocaleProfile::en_us()), "0.00");
        assert_eq!(format_number(999.0, 0, &LocaleProfile::en_us()), "999");
    }
}
