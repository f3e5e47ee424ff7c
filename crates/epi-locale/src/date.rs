//! Date parsing and formatting.

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveTime};
use epi_model::CalendarDate;
use regex::Regex;

use crate::profile::{DateOrder, LocaleProfile};

/// Numeric dates with `-`, `/` or `.` separators and an optional time.
static DATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(\d{1,4})([-/.])(\d{1,2})([-/.])(\d{1,4})(?:[T ](\d{1,2}):(\d{2})(?::(\d{2}))?)?$",
    )
    .expect("Invalid date regex")
});

/// Returns true if `text` has the shape of a numeric date.
///
/// Shape only: `2024-02-30` looks like a date but does not parse.
pub fn looks_like_date(text: &str) -> bool {
    DATE_PATTERN.is_match(text.trim())
}

/// Parse a numeric date under the profile's day/month order.
///
/// A four-digit leading part is always read year-first. Otherwise the
/// profile decides between day-first and month-first; year-first profiles
/// read such dates day-first. Two-digit years map 00-68 to 20xx and 69-99
/// to 19xx. Returns `None` for impossible calendar dates.
pub fn parse_date(text: &str, profile: &LocaleProfile) -> Option<CalendarDate> {
    let caps = DATE_PATTERN.captures(text.trim())?;
    if caps[2] != caps[4] {
        return None;
    }
    let first = &caps[1];
    let middle: u32 = caps[3].parse().ok()?;
    let last = &caps[5];

    let (year, month, day) = if first.len() == 4 {
        if last.len() > 2 {
            return None;
        }
        (first.parse().ok()?, middle, last.parse().ok()?)
    } else {
        let year = expand_year(last)?;
        let first: u32 = first.parse().ok()?;
        match profile.date_order() {
            DateOrder::MonthFirst => (year, first, middle),
            DateOrder::DayFirst | DateOrder::YearFirst => (year, middle, first),
        }
    };
    let date = NaiveDate::from_ymd_opt(year, month, day)?;

    let Some(hour) = caps.get(6) else {
        return Some(CalendarDate::new(date));
    };
    let hour: u32 = hour.as_str().parse().ok()?;
    let minute: u32 = caps[7].parse().ok()?;
    let second: u32 = match caps.get(8) {
        Some(second) => second.as_str().parse().ok()?,
        None => 0,
    };
    let time = NaiveTime::from_hms_opt(hour, minute, second)?;
    Some(CalendarDate::with_time(date, time))
}

fn expand_year(text: &str) -> Option<i32> {
    let value: i32 = text.parse().ok()?;
    match text.len() {
        4 => Some(value),
        1 | 2 if value <= 68 => Some(2000 + value),
        1 | 2 => Some(1900 + value),
        _ => None,
    }
}

/// Render a date for display in the profile's order.
pub fn format_date(date: &CalendarDate, profile: &LocaleProfile) -> String {
    let sep = profile.date_separator();
    let pattern = match profile.date_order() {
        DateOrder::YearFirst => format!("%Y{sep}%m{sep}%d"),
        DateOrder::DayFirst => format!("%d{sep}%m{sep}%Y"),
        DateOrder::MonthFirst => format!("%m{sep}%d{sep}%Y"),
    };
    let mut out = date.date().format(&pattern).to_string();
    if let Some(time) = date.time() {
        out.push(' ');
        out.push_str(&time.format("%H:%M").to_string());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(year: i32, month: u32, day: u32) -> CalendarDate {
        CalendarDate::from_ymd(year, month, day).unwrap()
    }

    #[test]
    fn year_first_is_unambiguous() {
        for profile in [LocaleProfile::en_us(), LocaleProfile::de_de()] {
            assert_eq!(parse_date("2024-05-17", &profile), Some(ymd(2024, 5, 17)));
            assert_eq!(parse_date("2024/5/7", &profile), Some(ymd(2024, 5, 7)));
        }
    }

    #[test]
    fn slashed_dates_follow_profile_order() {
        assert_eq!(
            parse_date("05/17/2024", &LocaleProfile::en_us()),
            Some(ymd(2024, 5, 17))
        );
        assert_eq!(
            parse_date("17/05/2024", &LocaleProfile::en_gb()),
            Some(ymd(2024, 5, 17))
        );
        assert_eq!(parse_date("17/05/2024", &LocaleProfile::en_us()), None);
        assert_eq!(
            parse_date("17.05.2024", &LocaleProfile::de_de()),
            Some(ymd(2024, 5, 17))
        );
    }

    #[test]
    fn two_digit_years_pivot() {
        let gb = LocaleProfile::en_gb();
        assert_eq!(parse_date("01/02/24", &gb), Some(ymd(2024, 2, 1)));
        assert_eq!(parse_date("01/02/85", &gb), Some(ymd(1985, 2, 1)));
    }

    #[test]
    fn time_component_is_kept() {
        let parsed = parse_date("2024-05-17T08:45", &LocaleProfile::iso()).unwrap();
        assert_eq!(parsed.to_string(), "2024-05-17 08:45");
        assert!(parse_date("2024-05-17 25:00", &LocaleProfile::iso()).is_none());
    }

    #[test]
    fn rejects_invalid_calendar_and_mixed_separators() {
        let iso = LocaleProfile::iso();
        assert!(looks_like_date("2023-02-30"));
        assert_eq!(parse_date("2023-02-30", &iso), None);
        assert_eq!(parse_date("2024-01/05", &iso), None);
        assert_eq!(parse_date("2024", &iso), None);
    }

    #[test]
    fn format_date_per_profile() {
        let date = ymd(2024, 5, 7);
        assert_eq!(format_date(&date, &LocaleProfile::en_us()), "05/07/2024");
        assert_eq!(format_date(&date, &LocaleProfile::de_de()), "07.05.2024");
        assert_eq!(format_date(&date, &LocaleProfile::iso()), "2024-05-07");
    }
}
