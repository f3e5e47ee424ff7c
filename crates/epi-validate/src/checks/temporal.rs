//! Temporal consistency: date ordering, future dates, modal-date window.

use std::collections::BTreeMap;

use chrono::{Months, NaiveDate};
use epi_model::{CalendarDate, Column, Record};

use super::{CheckContext, date_columns, date_value};
use crate::config::{CheckKind, FieldRole};
use crate::issue::{DataQualityIssue, IssueKind};

/// Role pairs where the first date may not come after the second.
const ORDERED_PAIRS: [(FieldRole, FieldRole); 4] = [
    (FieldRole::ExposureDate, FieldRole::OnsetDate),
    (FieldRole::OnsetDate, FieldRole::ReportDate),
    (FieldRole::OnsetDate, FieldRole::DeathDate),
    (FieldRole::DateOfBirth, FieldRole::OnsetDate),
];

pub fn check(ctx: &CheckContext<'_>) -> Vec<DataQualityIssue> {
    let mut issues = Vec::new();
    if ctx.is_enabled(CheckKind::DateOrder) {
        issues.extend(date_order(ctx));
    }
    if ctx.is_enabled(CheckKind::FutureDate) {
        issues.extend(future_dates(ctx));
    }
    if ctx.is_enabled(CheckKind::DateRange) {
        issues.extend(date_window(ctx));
    }
    issues
}

fn date_order(ctx: &CheckContext<'_>) -> Vec<DataQualityIssue> {
    let mut issues = Vec::new();
    for (earlier_role, later_role) in ORDERED_PAIRS {
        let (Some(earlier_col), Some(later_col)) = (ctx.mapped(earlier_role), ctx.mapped(later_role))
        else {
            continue;
        };
        for record in ctx.records {
            let (Some(earlier), Some(later)) = (
                date_value(record.get(&earlier_col.key)),
                date_value(record.get(&later_col.key)),
            ) else {
                continue;
            };
            if later.date() < earlier.date() {
                issues.push(DataQualityIssue::for_record(
                    IssueKind::DateOrder {
                        earlier_field: earlier_col.key.clone(),
                        later_field: later_col.key.clone(),
                        earlier,
                        later,
                    },
                    record.id(),
                ));
            }
        }
    }
    issues
}

/// Mapped date roles first, then any other date-typed column.
fn future_date_columns<'a>(ctx: &CheckContext<'a>) -> Vec<&'a Column> {
    let mut columns: Vec<&Column> = FieldRole::DATES
        .into_iter()
        .filter_map(|role| ctx.mapped(role))
        .collect();
    for column in date_columns(ctx.columns) {
        if !columns.iter().any(|seen| seen.key == column.key) {
            columns.push(column);
        }
    }
    columns
}

fn future_dates(ctx: &CheckContext<'_>) -> Vec<DataQualityIssue> {
    let mut issues = Vec::new();
    for column in future_date_columns(ctx) {
        for record in ctx.records {
            let Some(date) = date_value(record.get(&column.key)) else {
                continue;
            };
            if date.date() > ctx.today {
                issues.push(DataQualityIssue::for_record(
                    IssueKind::FutureDate {
                        field: column.key.clone(),
                        date,
                    },
                    record.id(),
                ));
            }
        }
    }
    issues
}

/// Most frequent date; ties resolve to the earliest.
fn modal_date(dates: &[NaiveDate]) -> Option<NaiveDate> {
    let mut counts: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for date in dates {
        *counts.entry(*date).or_default() += 1;
    }
    let mut best: Option<(NaiveDate, usize)> = None;
    for (date, count) in counts {
        if best.is_none_or(|(_, top)| count > top) {
            best = Some((date, count));
        }
    }
    best.map(|(date, _)| date)
}

fn date_window(ctx: &CheckContext<'_>) -> Vec<DataQualityIssue> {
    let months = ctx.config.thresholds.date_range_months;
    let mut issues = Vec::new();
    let mut seen: Vec<&str> = Vec::new();

    for role in FieldRole::EVENT_DATES {
        let Some(column) = ctx.mapped(role) else {
            continue;
        };
        if seen.contains(&column.key.as_str()) {
            continue;
        }
        seen.push(&column.key);

        let dated: Vec<(&Record, CalendarDate)> = ctx
            .records
            .iter()
            .filter_map(|record| date_value(record.get(&column.key)).map(|date| (record, date)))
            .collect();
        let days: Vec<NaiveDate> = dated.iter().map(|(_, date)| date.date()).collect();
        let Some(modal) = modal_date(&days) else {
            continue;
        };
        let window = Months::new(months);
        let start = modal.checked_sub_months(window).unwrap_or(NaiveDate::MIN);
        let end = modal.checked_add_months(window).unwrap_or(NaiveDate::MAX);

        for (record, date) in dated {
            if date.date() < start || date.date() > end {
                issues.push(DataQualityIssue::for_record(
                    IssueKind::DateOutsideWindow {
                        field: column.key.clone(),
                        date,
                        modal: CalendarDate::new(modal),
                        months,
                    },
                    record.id(),
                ));
            }
        }
    }
    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn modal_date_prefers_earliest_on_tie() {
        let dates = [day(2024, 3, 2), day(2024, 3, 1), day(2024, 3, 2), day(2024, 3, 1)];
        assert_eq!(modal_date(&dates), Some(day(2024, 3, 1)));
        assert_eq!(modal_date(&[]), None);
    }

    #[test]
    fn modal_date_picks_most_frequent() {
        let dates = [day(2024, 1, 9), day(2024, 3, 2), day(2024, 3, 2)];
        assert_eq!(modal_date(&dates), Some(day(2024, 3, 2)));
    }
}
