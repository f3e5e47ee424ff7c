//! CSV import and export.

mod header;
mod inference;
mod line;
mod reader;
mod writer;

pub use header::{CsvHeader, sanitize_key};
pub use inference::{CellError, DEFAULT_SAMPLE_SIZE, coerce_cell, infer_column_type, is_missing_token};
pub use line::{CANDIDATE_DELIMITERS, LogicalLine, detect_delimiter, parse_csv_line, split_records};
pub use reader::{CsvReadOptions, ParsedCsv, RowError, parse_csv};
pub use writer::{CsvWriteOptions, HeaderStyle, export_to_csv};
