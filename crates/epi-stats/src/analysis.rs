//! Single- and multi-exposure analyses.

use epi_model::Record;
use serde::{Deserialize, Serialize};
use tracing::{debug, info_span};

use crate::definitions::{ExposureDefinition, OutcomeDefinition, StudyDesign};
use crate::measures::{RatioEstimate, attack_rate, odds_ratio, risk_ratio};
use crate::significance::{ChiSquareTest, chi_square, fisher_exact};
use crate::table::{TableBuild, TwoByTwoCounts, build_table};

/// Which margin percentages are taken over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PercentageBasis {
    /// Share of each exposure group (cohort).
    Row,
    /// Share of cases and of non-cases (case-control).
    Column,
}

/// Each cell as a percentage of its row or column total. `NaN` for an
/// empty row or column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellPercentages {
    pub basis: PercentageBasis,
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl CellPercentages {
    pub fn for_design(counts: &TwoByTwoCounts, design: StudyDesign) -> Self {
        let pct = |n: u64, total: u64| attack_rate(n, total) * 100.0;
        match design {
            StudyDesign::Cohort => Self {
                basis: PercentageBasis::Row,
                a: pct(counts.a, counts.exposed_total()),
                b: pct(counts.b, counts.exposed_total()),
                c: pct(counts.c, counts.unexposed_total()),
                d: pct(counts.d, counts.unexposed_total()),
            },
            StudyDesign::CaseControl => Self {
                basis: PercentageBasis::Column,
                a: pct(counts.a, counts.case_total()),
                b: pct(counts.b, counts.non_case_total()),
                c: pct(counts.c, counts.case_total()),
                d: pct(counts.d, counts.non_case_total()),
            },
        }
    }
}

/// The measure surfaced as primary for a design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasureKind {
    RiskRatio,
    OddsRatio,
}

impl MeasureKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::RiskRatio => "Risk ratio",
            Self::OddsRatio => "Odds ratio",
        }
    }
}

/// Everything derived from one exposure's 2×2 table.
///
/// Both ratio measures are always computed; the design only decides which
/// is primary and how percentages are taken.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TwoByTwoResults {
    pub design: StudyDesign,
    pub exposure: String,
    pub outcome: String,
    pub counts: TwoByTwoCounts,
    pub excluded_missing: u64,
    pub excluded_unrecognized: u64,
    pub attack_rate_exposed: f64,
    pub attack_rate_unexposed: f64,
    pub risk_ratio: RatioEstimate,
    pub odds_ratio: RatioEstimate,
    pub chi_square: ChiSquareTest,
    pub fisher_p_value: f64,
    pub percentages: CellPercentages,
}

impl TwoByTwoResults {
    /// Derive every measure from a table.
    pub fn from_table(
        build: TableBuild,
        outcome: &OutcomeDefinition,
        exposure: &ExposureDefinition,
        design: StudyDesign,
    ) -> Self {
        let counts = build.counts;
        Self {
            design,
            exposure: exposure.column.clone(),
            outcome: outcome.column.clone(),
            counts,
            excluded_missing: build.excluded_missing,
            excluded_unrecognized: build.excluded_unrecognized,
            attack_rate_exposed: attack_rate(counts.a, counts.exposed_total()),
            attack_rate_unexposed: attack_rate(counts.c, counts.unexposed_total()),
            risk_ratio: risk_ratio(&counts),
            odds_ratio: odds_ratio(&counts),
            chi_square: chi_square(&counts),
            fisher_p_value: fisher_exact(&counts),
            percentages: CellPercentages::for_design(&counts, design),
        }
    }

    /// Risk ratio for cohort designs, odds ratio for case-control.
    pub fn primary(&self) -> (MeasureKind, &RatioEstimate) {
        match self.design {
            StudyDesign::Cohort => (MeasureKind::RiskRatio, &self.risk_ratio),
            StudyDesign::CaseControl => (MeasureKind::OddsRatio, &self.odds_ratio),
        }
    }
}

/// Analyze one exposure against an outcome.
pub fn analyze(
    records: &[Record],
    outcome: &OutcomeDefinition,
    exposure: &ExposureDefinition,
    design: StudyDesign,
) -> TwoByTwoResults {
    let build = build_table(records, outcome, exposure);
    TwoByTwoResults::from_table(build, outcome, exposure, design)
}

/// Analyze each exposure independently, results in input order.
pub fn analyze_exposures(
    records: &[Record],
    outcome: &OutcomeDefinition,
    exposures: &[ExposureDefinition],
    design: StudyDesign,
) -> Vec<TwoByTwoResults> {
    let span = info_span!(
        "analyze_exposures",
        outcome = %outcome.column,
        exposure_count = exposures.len(),
        design = design.label()
    );
    let _guard = span.enter();

    let results: Vec<TwoByTwoResults> = exposures
        .iter()
        .map(|exposure| analyze(records, outcome, exposure, design))
        .collect();
    debug!(
        undefined = results
            .iter()
            .filter(|result| !result.primary().1.value.is_finite())
            .count(),
        "analyses complete"
    );
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_percentages_for_cohort() {
        let pct = CellPercentages::for_design(&TwoByTwoCounts::new(10, 5, 2, 20), StudyDesign::Cohort);
        assert_eq!(pct.basis, PercentageBasis::Row);
        assert!((pct.a + pct.b - 100.0).abs() < 1e-9);
        assert!((pct.c - 200.0 / 22.0).abs() < 1e-9);
    }

    #[test]
    fn column_percentages_for_case_control() {
        let pct =
            CellPercentages::for_design(&TwoByTwoCounts::new(10, 5, 2, 20), StudyDesign::CaseControl);
        assert_eq!(pct.basis, PercentageBasis::Column);
        assert!((pct.a - 1000.0 / 12.0).abs() < 1e-9);
        assert!((pct.b - 20.0).abs() < 1e-9);
        assert!((pct.a + pct.c - 100.0).abs() < 1e-9);
        assert!((pct.b + pct.d - 100.0).abs() < 1e-9);
    }
}
