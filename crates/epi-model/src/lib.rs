//! Case data model for outbreak investigations.
//!
//! A [`Dataset`] is an ordered list of [`Column`]s and [`Record`]s. Each
//! record maps column keys to typed [`Value`]s and is validated against the
//! column schema when it is constructed, not when it is read.

pub mod column;
pub mod dataset;
pub mod error;
pub mod ids;
pub mod record;
pub mod value;

pub use column::{Column, ColumnType};
pub use dataset::{Dataset, Provenance};
pub use error::{ModelError, Result};
pub use ids::RecordId;
pub use record::Record;
pub use value::{CalendarDate, FALSE_TOKENS, TRUE_TOKENS, Value, parse_bool_token};
