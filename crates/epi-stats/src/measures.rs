//! Attack rates and ratio measures with 95% confidence intervals.
//!
//! Zero denominators never panic. They follow IEEE-754 division
//! (`x/0 = ∞`, `0/0 = NaN`), except that an attack rate over an empty group
//! is always `NaN`: a group with no members has no rate. Intervals whose
//! log-scale standard error needs a zero cell are `NaN` on both bounds.

use serde::{Deserialize, Serialize};

use crate::table::TwoByTwoCounts;

/// Standard normal quantile for a two-sided 95% interval.
pub const Z_95: f64 = 1.959_963_984_540_054;

/// Proportion of a group with the outcome; `NaN` for an empty group.
pub fn attack_rate(cases: u64, total: u64) -> f64 {
    if total == 0 {
        f64::NAN
    } else {
        cases as f64 / total as f64
    }
}

/// A point estimate with its confidence interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatioEstimate {
    pub value: f64,
    pub lower: f64,
    pub upper: f64,
}

impl RatioEstimate {
    /// Estimate with an interval `exp(ln(value) ± z·se)`.
    fn log_interval(value: f64, se: f64) -> Self {
        if !value.is_finite() || value <= 0.0 || !se.is_finite() {
            return Self {
                value,
                lower: f64::NAN,
                upper: f64::NAN,
            };
        }
        let log = value.ln();
        Self {
            value,
            lower: (log - Z_95 * se).exp(),
            upper: (log + Z_95 * se).exp(),
        }
    }

    /// True when the estimate and both bounds are finite.
    pub fn is_defined(&self) -> bool {
        self.value.is_finite() && self.lower.is_finite() && self.upper.is_finite()
    }
}

/// Risk ratio with a Katz log-transform interval.
pub fn risk_ratio(counts: &TwoByTwoCounts) -> RatioEstimate {
    let exposed = attack_rate(counts.a, counts.exposed_total());
    let unexposed = attack_rate(counts.c, counts.unexposed_total());
    let value = exposed / unexposed;

    let [a, _, c, _] = counts.as_f64();
    let se = if counts.a > 0 && counts.c > 0 {
        (1.0 / a - 1.0 / counts.exposed_total() as f64 + 1.0 / c
            - 1.0 / counts.unexposed_total() as f64)
            .sqrt()
    } else {
        f64::NAN
    };
    RatioEstimate::log_interval(value, se)
}

/// Odds ratio `ad/bc` with a Woolf log-odds interval.
pub fn odds_ratio(counts: &TwoByTwoCounts) -> RatioEstimate {
    let [a, b, c, d] = counts.as_f64();
    let value = (a * d) / (b * c);
    let se = if [a, b, c, d].iter().all(|&n| n > 0.0) {
        (1.0 / a + 1.0 / b + 1.0 / c + 1.0 / d).sqrt()
    } else {
        f64::NAN
    };
    RatioEstimate::log_interval(value, se)
}
