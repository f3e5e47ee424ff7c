//! Case data ingestion.
//!
//! [`parse_csv`] turns delimited text into typed columns and records,
//! detecting the delimiter and inferring column types from a sample of
//! leading rows. [`export_to_csv`] writes records back out in a
//! locale-independent form that re-imports to the same values.

pub mod csv;
pub mod error;

pub use crate::csv::{
    CsvReadOptions, CsvWriteOptions, HeaderStyle, ParsedCsv, RowError, detect_delimiter,
    export_to_csv, infer_column_type, parse_csv,
};
pub use error::{IngestError, Result};
