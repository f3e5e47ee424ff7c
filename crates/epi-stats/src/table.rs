//! Building a 2×2 table from records.

use epi_model::Record;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::definitions::{Classification, ExposureDefinition, OutcomeDefinition};

/// Cell counts of a 2×2 table.
///
/// |           | case | non-case |
/// |-----------|------|----------|
/// | exposed   | `a`  | `b`      |
/// | unexposed | `c`  | `d`      |
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwoByTwoCounts {
    pub a: u64,
    pub b: u64,
    pub c: u64,
    pub d: u64,
}

impl TwoByTwoCounts {
    pub fn new(a: u64, b: u64, c: u64, d: u64) -> Self {
        Self { a, b, c, d }
    }

    pub fn exposed_total(&self) -> u64 {
        self.a + self.b
    }

    pub fn unexposed_total(&self) -> u64 {
        self.c + self.d
    }

    pub fn case_total(&self) -> u64 {
        self.a + self.c
    }

    pub fn non_case_total(&self) -> u64 {
        self.b + self.d
    }

    pub fn total(&self) -> u64 {
        self.a + self.b + self.c + self.d
    }

    /// Cells as floats, in `a, b, c, d` order.
    pub(crate) fn as_f64(&self) -> [f64; 4] {
        [self.a, self.b, self.c, self.d].map(|n| n as f64)
    }
}

/// A table plus the records that could not be placed in it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableBuild {
    pub counts: TwoByTwoCounts,
    /// Records with no exposure or outcome value.
    pub excluded_missing: u64,
    /// Records whose value is in neither recognised set.
    pub excluded_unrecognized: u64,
}

/// Count records into a 2×2 table in a single pass.
///
/// Records with a missing or unrecognised exposure or outcome are counted
/// as excluded; they never fall into a default cell.
pub fn build_table(
    records: &[Record],
    outcome: &OutcomeDefinition,
    exposure: &ExposureDefinition,
) -> TableBuild {
    let mut build = TableBuild::default();
    for record in records {
        let exposed = exposure.classify(record.get(&exposure.column));
        let case = outcome.classify(record.get(&outcome.column));
        let cell = match (exposed, case) {
            (Classification::Positive, Classification::Positive) => &mut build.counts.a,
            (Classification::Positive, Classification::Negative) => &mut build.counts.b,
            (Classification::Negative, Classification::Positive) => &mut build.counts.c,
            (Classification::Negative, Classification::Negative) => &mut build.counts.d,
            (Classification::Missing, _) | (_, Classification::Missing) => {
                &mut build.excluded_missing
            }
            _ => &mut build.excluded_unrecognized,
        };
        *cell += 1;
    }
    debug!(
        exposure = %exposure.column,
        outcome = %outcome.column,
        included = build.counts.total(),
        excluded_missing = build.excluded_missing,
        excluded_unrecognized = build.excluded_unrecognized,
        "built 2x2 table"
    );
    build
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use epi_model::{Column, ColumnType, RecordId, Value};

    use super::*;

    fn records(rows: &[(Option<&str>, Option<&str>)]) -> Vec<Record> {
        let columns = vec![
            Column::new("ate", "Ate", ColumnType::Text),
            Column::new("ill", "Ill", ColumnType::Text),
        ];
        rows.iter()
            .enumerate()
            .map(|(index, (ate, ill))| {
                let mut values = BTreeMap::new();
                if let Some(ate) = ate {
                    values.insert("ate".to_string(), Value::text(*ate));
                }
                if let Some(ill) = ill {
                    values.insert("ill".to_string(), Value::text(*ill));
                }
                Record::new(RecordId::from_row(index + 1), values, &columns).unwrap()
            })
            .collect()
    }

    #[test]
    fn counts_cells_and_exclusions() {
        let records = records(&[
            (Some("yes"), Some("yes")),
            (Some("yes"), Some("no")),
            (Some("no"), Some("yes")),
            (Some("no"), Some("no")),
            (Some("no"), Some("no")),
            (None, Some("yes")),
            (Some("maybe"), Some("no")),
        ]);
        let outcome = OutcomeDefinition::new("ill", ["yes"]);
        let exposure = ExposureDefinition::new("ate", ["yes"]).with_unexposed_values(["no"]);
        let build = build_table(&records, &outcome, &exposure);
        assert_eq!(build.counts, TwoByTwoCounts::new(1, 1, 1, 2));
        assert_eq!(build.excluded_missing, 1);
        assert_eq!(build.excluded_unrecognized, 1);
    }

    #[test]
    fn unknown_exposure_is_not_counted_as_unexposed() {
        let records = records(&[
            (Some("yes"), Some("yes")),
            (Some("no"), Some("no")),
            (Some("unknown"), Some("yes")),
            (Some("unknown"), Some("yes")),
        ]);
        let outcome = OutcomeDefinition::new("ill", ["yes"]);
        let exposure = ExposureDefinition::new("ate", ["yes"]);
        let build = build_table(&records, &outcome, &exposure);
        assert_eq!(build.counts, TwoByTwoCounts::new(1, 0, 0, 1));
        assert_eq!(build.excluded_unrecognized, 2);
        assert_eq!(build.excluded_missing, 0);
    }

    #[test]
    fn totals() {
        let counts = TwoByTwoCounts::new(10, 5, 2, 20);
        assert_eq!(counts.exposed_total(), 15);
        assert_eq!(counts.unexposed_total(), 22);
        assert_eq!(counts.case_total(), 12);
        assert_eq!(counts.non_case_total(), 25);
        assert_eq!(counts.total(), 37);
    }
}
