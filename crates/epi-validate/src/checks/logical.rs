//! Logical consistency between status fields.

use epi_model::Value;

use super::{CheckContext, flag_value, matches_any};
use crate::config::FieldRole;
use crate::issue::{DataQualityIssue, IssueKind};

pub fn check(ctx: &CheckContext<'_>) -> Vec<DataQualityIssue> {
    let mut issues = Vec::new();
    confirmed_without_lab(ctx, &mut issues);
    hospitalized_without_hospital(ctx, &mut issues);
    outcome_vs_death_date(ctx, &mut issues);
    issues
}

fn is_blank(value: &Value) -> bool {
    value.is_null() || value.to_string().trim().is_empty()
}

fn confirmed_without_lab(ctx: &CheckContext<'_>, issues: &mut Vec<DataQualityIssue>) {
    let (Some(status), Some(lab)) = (
        ctx.mapped(FieldRole::CaseStatus),
        ctx.mapped(FieldRole::LabResult),
    ) else {
        return;
    };
    let config = ctx.config;
    for record in ctx.records {
        let confirmed = matches_any(record.get(&status.key), &config.confirmed_status_values);
        if confirmed && !matches_any(record.get(&lab.key), &config.positive_lab_values) {
            issues.push(DataQualityIssue::for_record(
                IssueKind::ConfirmedWithoutPositiveLab {
                    status_field: status.key.clone(),
                    lab_field: lab.key.clone(),
                },
                record.id(),
            ));
        }
    }
}

fn hospitalized_without_hospital(ctx: &CheckContext<'_>, issues: &mut Vec<DataQualityIssue>) {
    let (Some(flag), Some(hospital)) = (
        ctx.mapped(FieldRole::Hospitalized),
        ctx.mapped(FieldRole::HospitalName),
    ) else {
        return;
    };
    for record in ctx.records {
        if flag_value(record.get(&flag.key)) == Some(true) && is_blank(record.get(&hospital.key)) {
            issues.push(DataQualityIssue::for_record(
                IssueKind::HospitalizedWithoutHospital {
                    hospitalized_field: flag.key.clone(),
                    hospital_field: hospital.key.clone(),
                },
                record.id(),
            ));
        }
    }
}

fn outcome_vs_death_date(ctx: &CheckContext<'_>, issues: &mut Vec<DataQualityIssue>) {
    let (Some(outcome), Some(death)) = (
        ctx.mapped(FieldRole::Outcome),
        ctx.mapped(FieldRole::DeathDate),
    ) else {
        return;
    };
    let deceased_values = &ctx.config.deceased_outcome_values;
    for record in ctx.records {
        let outcome_value = record.get(&outcome.key);
        let has_death_date = !is_blank(record.get(&death.key));
        let deceased = matches_any(outcome_value, deceased_values);

        let kind = if deceased && !has_death_date {
            IssueKind::DeceasedWithoutDeathDate {
                outcome_field: outcome.key.clone(),
                death_field: death.key.clone(),
            }
        } else if has_death_date && !deceased && !is_blank(outcome_value) {
            IssueKind::DeathDateWithoutDeceased {
                outcome_field: outcome.key.clone(),
                death_field: death.key.clone(),
            }
        } else {
            continue;
        };
        issues.push(DataQualityIssue::for_record(kind, record.id()));
    }
}
