//! Rendering helpers for analysis results.

use epi_locale::{LocaleProfile, format_number};

use crate::measures::RatioEstimate;

/// Text shown in place of a non-finite result.
pub const UNDEFINED: &str = "Undefined";

/// Format a measure with the profile's separators; non-finite values are
/// [`UNDEFINED`].
pub fn format_measure(value: f64, decimals: usize, profile: &LocaleProfile) -> String {
    if value.is_finite() {
        format_number(value, decimals, profile)
    } else {
        UNDEFINED.to_string()
    }
}

/// Format a proportion as a percentage, e.g. `66.7%`.
pub fn format_percent(proportion: f64, decimals: usize, profile: &LocaleProfile) -> String {
    if proportion.is_finite() {
        format!("{}%", format_number(proportion * 100.0, decimals, profile))
    } else {
        UNDEFINED.to_string()
    }
}

/// `value (lower - upper)`, or the point estimate alone when the interval is
/// undefined.
pub fn format_estimate(estimate: &RatioEstimate, decimals: usize, profile: &LocaleProfile) -> String {
    let value = format_measure(estimate.value, decimals, profile);
    if estimate.lower.is_finite() && estimate.upper.is_finite() {
        format!(
            "{value} ({} - {})",
            format_measure(estimate.lower, decimals, profile),
            format_measure(estimate.upper, decimals, profile)
        )
    } else {
        value
    }
}

/// P-values below 0.001 are shown as `<0.001`.
pub fn format_p_value(p: f64, profile: &LocaleProfile) -> String {
    if p.is_finite() && p < 0.001 {
        format!("<{}", format_number(0.001, 3, profile))
    } else {
        format_measure(p, 3, profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_finite_is_undefined() {
        let profile = LocaleProfile::en_us();
        assert_eq!(format_measure(f64::NAN, 2, &profile), "Undefined");
        assert_eq!(format_measure(f64::INFINITY, 2, &profile), "Undefined");
        assert_eq!(format_measure(7.333_33, 2, &profile), "7.33");
    }

    #[test]
    fn honours_locale_separators() {
        let german = LocaleProfile::de_de();
        assert_eq!(format_measure(1234.5, 1, &german), "1.234,5");
        assert_eq!(format_percent(0.6667, 1, &german), "66,7%");
        assert_eq!(format_p_value(0.00024, &german), "<0,001");
        assert_eq!(format_p_value(0.0427, &german), "0,043");
    }

    #[test]
    fn estimate_without_interval() {
        let profile = LocaleProfile::en_us();
        let estimate = RatioEstimate {
            value: 0.0,
            lower: f64::NAN,
            upper: f64::NAN,
        };
        assert_eq!(format_estimate(&estimate, 2, &profile), "0.00");
        let estimate = RatioEstimate {
            value: 7.3333,
            lower: 1.8653,
            upper: 28.8304,
        };
        assert_eq!(format_estimate(&estimate, 2, &profile), "7.33 (1.87 - 28.83)");
    }
}
