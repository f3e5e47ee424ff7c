//! Two-by-two table analysis for outbreak investigations.
//!
//! [`analyze`] counts records into a 2×2 table for one exposure and derives
//! attack rates, a risk ratio (Katz interval), an odds ratio (Woolf
//! interval), a chi-square test and Fisher's exact test. The study design
//! only chooses the primary measure and the percentage basis.
//!
//! Zero cells never panic: ratios become `∞` or `NaN`, and
//! [`format_measure`] renders those as `Undefined`.

pub mod analysis;
pub mod definitions;
pub mod display;
pub mod measures;
pub mod significance;
pub mod table;

pub use analysis::{
    CellPercentages, MeasureKind, PercentageBasis, TwoByTwoResults, analyze, analyze_exposures,
};
pub use definitions::{Classification, ExposureDefinition, OutcomeDefinition, StudyDesign};
pub use display::{UNDEFINED, format_estimate, format_measure, format_p_value, format_percent};
pub use measures::{RatioEstimate, Z_95, attack_rate, odds_ratio, risk_ratio};
pub use significance::{ChiSquareTest, chi_square, chi_square_p_value, fisher_exact};
pub use table::{TableBuild, TwoByTwoCounts, build_table};
