//! Exact and near-duplicate case detection.
//!
//! Exact matching compares a key built from the case ID, or from the name
//! fields (plus date of birth) when no case ID is mapped. Fuzzy matching
//! always compares the name key: case IDs are assigned, not typed, and
//! neighbouring IDs differ by a character or two.

use std::collections::BTreeMap;

use epi_model::{Record, RecordId};
use rapidfuzz::distance::levenshtein;

use super::{CheckContext, normalize_text};
use crate::config::{CheckKind, FieldRole};
use crate::issue::{DataQualityIssue, IssueKind};

/// Keys shorter than this are too short to compare by edit distance.
const MIN_FUZZY_KEY_CHARS: usize = 3;

/// How records are keyed for duplicate comparison.
struct KeySpec {
    /// Column reported on issues.
    field: String,
    /// Columns whose normalized values form the key.
    parts: Vec<String>,
}

impl KeySpec {
    fn case_id(ctx: &CheckContext<'_>) -> Option<Self> {
        ctx.mapped(FieldRole::CaseId).map(|column| Self {
            field: column.key.clone(),
            parts: vec![column.key.clone()],
        })
    }

    fn names(ctx: &CheckContext<'_>) -> Option<Self> {
        let mut parts: Vec<String> = match ctx.mapped(FieldRole::FullName) {
            Some(full) => vec![full.key.clone()],
            None => [FieldRole::FirstName, FieldRole::LastName]
                .into_iter()
                .filter_map(|role| ctx.mapped(role))
                .map(|column| column.key.clone())
                .collect(),
        };
        let field = parts.first()?.clone();
        if let Some(dob) = ctx.mapped(FieldRole::DateOfBirth) {
            parts.push(dob.key.clone());
        }
        Some(Self { field, parts })
    }

    /// Normalized key, or `None` when every part is empty.
    fn key_for(&self, record: &Record) -> Option<String> {
        let values: Vec<String> = self
            .parts
            .iter()
            .map(|part| normalize_text(record.get(part)))
            .collect();
        if values.iter().all(String::is_empty) {
            return None;
        }
        Some(values.join(" | "))
    }
}

/// Run the exact and fuzzy duplicate checks that are enabled.
pub fn check(ctx: &CheckContext<'_>) -> Vec<DataQualityIssue> {
    let exact = ctx.is_enabled(CheckKind::ExactDuplicate);
    let fuzzy = ctx.is_enabled(CheckKind::FuzzyDuplicate);
    if !exact && !fuzzy {
        return Vec::new();
    }
    let case_id = KeySpec::case_id(ctx);
    let names = KeySpec::names(ctx);

    let mut issues = Vec::new();
    if exact && let Some(spec) = case_id.as_ref().or(names.as_ref()) {
        let groups = group_by_key(spec, ctx.records);
        issues.extend(exact_duplicates(spec, &groups));
    }
    if fuzzy && let Some(spec) = &names {
        let groups = group_by_key(spec, ctx.records);
        issues.extend(fuzzy_duplicates(
            spec,
            &groups,
            ctx.config.thresholds.fuzzy_max_distance,
        ));
    }
    issues
}

/// Records per distinct key, keys in first-seen order.
fn group_by_key(spec: &KeySpec, records: &[Record]) -> Vec<(String, Vec<RecordId>)> {
    let mut index: BTreeMap<String, usize> = BTreeMap::new();
    let mut groups: Vec<(String, Vec<RecordId>)> = Vec::new();
    for record in records {
        let Some(key) = spec.key_for(record) else {
            continue;
        };
        match index.get(&key) {
            Some(&slot) => groups[slot].1.push(record.id().clone()),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push((key, vec![record.id().clone()]));
            }
        }
    }
    groups
}

fn exact_duplicates(spec: &KeySpec, groups: &[(String, Vec<RecordId>)]) -> Vec<DataQualityIssue> {
    groups
        .iter()
        .filter(|(_, ids)| ids.len() > 1)
        .map(|(key, ids)| {
            DataQualityIssue::new(
                IssueKind::ExactDuplicate {
                    field: spec.field.clone(),
                    key: key.clone(),
                },
                ids.clone(),
            )
        })
        .collect()
}

fn fuzzy_duplicates(
    spec: &KeySpec,
    groups: &[(String, Vec<RecordId>)],
    max_distance: usize,
) -> Vec<DataQualityIssue> {
    let mut issues = Vec::new();
    if max_distance == 0 {
        return issues;
    }
    let lengths: Vec<usize> = groups.iter().map(|(key, _)| key.chars().count()).collect();

    for (i, (first, first_ids)) in groups.iter().enumerate() {
        if lengths[i] < MIN_FUZZY_KEY_CHARS {
            continue;
        }
        for (j, (second, second_ids)) in groups.iter().enumerate().skip(i + 1) {
            if lengths[j] < MIN_FUZZY_KEY_CHARS || lengths[i].abs_diff(lengths[j]) > max_distance {
                continue;
            }
            let distance = levenshtein::distance(first.chars(), second.chars());
            if distance == 0 || distance > max_distance {
                continue;
            }
            let record_ids = first_ids.iter().chain(second_ids).cloned().collect();
            issues.push(DataQualityIssue::new(
                IssueKind::FuzzyDuplicate {
                    field: spec.field.clone(),
                    first: first.clone(),
                    second: second.clone(),
                    distance,
                },
                record_ids,
            ));
        }
    }
    issues
}
