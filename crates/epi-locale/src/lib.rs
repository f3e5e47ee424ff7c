//! Locale numeric formatter.
//!
//! Parses and formats numbers and dates according to an explicit
//! [`LocaleProfile`], while guaranteeing a fixed period-decimal form for
//! CSV export via [`format_csv_number`].
//!
//! # Example
//!
//! ```
//! use epi_locale::{LocaleProfile, format_csv_number, parse_flexible_number};
//!
//! let german = LocaleProfile::de_de();
//! let value = parse_flexible_number("1.234,5", &german);
//! assert_eq!(value, 1234.5);
//! assert_eq!(format_csv_number(value), "1234.5");
//! ```

mod date;
mod error;
mod number;
mod profile;

pub use date::{format_date, looks_like_date, parse_date};
pub use error::{LocaleError, Result};
pub use number::{format_csv_number, format_number, is_flexible_number, parse_flexible_number};
pub use profile::{DateOrder, LocaleProfile};
