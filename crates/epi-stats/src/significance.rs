//! Significance tests on a 2×2 table.

use serde::{Deserialize, Serialize};
use statrs::distribution::{ChiSquared, ContinuousCDF, Discrete, Hypergeometric};

use crate::table::TwoByTwoCounts;

/// Below this smallest expected count the chi-square approximation is
/// unreliable and Fisher's exact test should be read instead.
pub const MIN_EXPECTED_FOR_CHI_SQUARE: f64 = 5.0;

/// Relative tolerance when comparing table probabilities in Fisher's test.
const FISHER_RELATIVE_TOLERANCE: f64 = 1e-7;

/// Pearson chi-square test with one degree of freedom.
///
/// `statistic` is uncorrected; the Yates continuity-corrected variant is
/// reported alongside. Every field is `NaN` when a margin is zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChiSquareTest {
    pub statistic: f64,
    pub p_value: f64,
    pub yates_statistic: f64,
    pub yates_p_value: f64,
    /// Smallest expected cell count under independence.
    pub min_expected: f64,
}

impl ChiSquareTest {
    /// True when some expected count is under five.
    pub fn fisher_recommended(&self) -> bool {
        self.min_expected.is_nan() || self.min_expected < MIN_EXPECTED_FOR_CHI_SQUARE
    }
}

/// Upper-tail probability of a chi-square(1) statistic.
pub fn chi_square_p_value(statistic: f64) -> f64 {
    if !statistic.is_finite() {
        return f64::NAN;
    }
    match ChiSquared::new(1.0) {
        Ok(dist) => dist.sf(statistic).clamp(0.0, 1.0),
        Err(_) => f64::NAN,
    }
}

pub fn chi_square(counts: &TwoByTwoCounts) -> ChiSquareTest {
    let [a, b, c, d] = counts.as_f64();
    let n = a + b + c + d;
    let margins = [a + b, c + d, a + c, b + d];
    if margins.iter().any(|&m| m == 0.0) {
        return ChiSquareTest {
            statistic: f64::NAN,
            p_value: f64::NAN,
            yates_statistic: f64::NAN,
            yates_p_value: f64::NAN,
            min_expected: f64::NAN,
        };
    }

    let denominator: f64 = margins.iter().product();
    let diff = (a * d - b * c).abs();
    let statistic = n * diff * diff / denominator;
    let corrected = (diff - n / 2.0).max(0.0);
    let yates_statistic = n * corrected * corrected / denominator;

    let [row1, row2, col1, col2] = margins;
    let min_expected = [row1 * col1, row1 * col2, row2 * col1, row2 * col2]
        .into_iter()
        .fold(f64::INFINITY, f64::min)
        / n;

    ChiSquareTest {
        statistic,
        p_value: chi_square_p_value(statistic),
        yates_statistic,
        yates_p_value: chi_square_p_value(yates_statistic),
        min_expected,
    }
}

/// Two-sided Fisher exact p-value.
///
/// Sums the probabilities of every table with the observed margins that is
/// no more likely than the observed one. `NaN` for an empty table.
pub fn fisher_exact(counts: &TwoByTwoCounts) -> f64 {
    let population = counts.total();
    let successes = counts.exposed_total();
    let draws = counts.case_total();
    let Ok(dist) = Hypergeometric::new(population, successes, draws) else {
        return f64::NAN;
    };
    if population == 0 {
        return f64::NAN;
    }

    let observed = dist.pmf(counts.a);
    let threshold = observed * (1.0 + FISHER_RELATIVE_TOLERANCE);
    let low = (successes + draws).saturating_sub(population);
    let high = successes.min(draws);
    let p: f64 = (low..=high)
        .map(|k| dist.pmf(k))
        .filter(|&p| p <= threshold)
        .sum();
    p.min(1.0)
}
