//! CLI argument definitions for `outbreak`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use epi_stats::StudyDesign;

use epi_cli::workflow::parse_delimiter;

#[derive(Parser)]
#[command(
    name = "outbreak",
    version,
    about = "Outbreak case data - import, quality checks and 2x2 analysis",
    long_about = "Work with outbreak line lists from the command line.\n\n\
                  Imports locale-formatted CSV files, runs data quality checks,\n\
                  computes risk and odds ratios per exposure, and re-exports\n\
                  data in a locale-independent CSV form."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow cell values in log output.
    ///
    /// Case data identifies people, so values are redacted unless this is set.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show detected columns, inferred types and row problems.
    Inspect(InspectArgs),

    /// Run data quality checks and list the issues found.
    Check(CheckArgs),

    /// Build a 2x2 table and measures of association per exposure.
    Analyze(AnalyzeArgs),

    /// Re-write a CSV file with period decimals and ISO dates.
    Export(ExportArgs),
}

/// Input arguments shared by every subcommand.
#[derive(Args)]
pub struct CsvInputArgs {
    /// CSV file to read.
    #[arg(value_name = "CSV")]
    pub path: PathBuf,

    /// Locale used to read numbers and dates (default: from LANG, else en-US).
    #[arg(long = "locale", value_name = "TAG")]
    pub locale: Option<String>,

    /// Field delimiter (default: detected from the header row).
    #[arg(long = "delimiter", value_name = "CHAR", value_parser = parse_delimiter)]
    pub delimiter: Option<char>,
}

#[derive(Args)]
pub struct InspectArgs {
    #[command(flatten)]
    pub input: CsvInputArgs,
}

#[derive(Args)]
pub struct CheckArgs {
    #[command(flatten)]
    pub input: CsvInputArgs,

    /// Check configuration file (.toml or .json).
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the report as JSON instead of a table.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Args)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub input: CsvInputArgs,

    /// Outcome column.
    #[arg(long = "outcome", value_name = "COLUMN")]
    pub outcome: String,

    /// Value(s) that mark a case.
    #[arg(long = "case", value_name = "VALUE", required = true, num_args = 1..)]
    pub case_values: Vec<String>,

    /// Value(s) that mark a non-case (default: any other non-missing value).
    #[arg(long = "non-case", value_name = "VALUE", num_args = 1..)]
    pub non_case_values: Vec<String>,

    /// Exposure as COLUMN=EXPOSED[,...][/UNEXPOSED[,...]]; repeat for several
    /// exposures.
    ///
    /// Without an unexposed list, yes/true/1 style values imply the opposite
    /// tokens and any other value counts as unexposed. Values outside the
    /// recognised sets are excluded from the table.
    #[arg(long = "exposure", value_name = "COLUMN=VALUE", required = true)]
    pub exposures: Vec<String>,

    /// Study design; selects the primary measure.
    #[arg(long = "design", value_enum, default_value = "cohort")]
    pub design: DesignArg,

    /// Decimal places for ratios and percentages.
    #[arg(long = "decimals", value_name = "N", default_value_t = 2)]
    pub decimals: usize,

    /// Print results as JSON instead of tables.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Args)]
pub struct ExportArgs {
    /// CSV file to read.
    #[arg(value_name = "CSV")]
    pub path: PathBuf,

    /// Locale used to read numbers and dates (default: from LANG, else en-US).
    #[arg(long = "locale", value_name = "TAG")]
    pub locale: Option<String>,

    /// Input field delimiter (default: detected from the header row).
    #[arg(long = "input-delimiter", value_name = "CHAR", value_parser = parse_delimiter)]
    pub input_delimiter: Option<char>,

    /// Output file (default: stdout).
    #[arg(long = "output", short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output field delimiter.
    #[arg(
        long = "delimiter",
        value_name = "CHAR",
        default_value = ",",
        value_parser = parse_delimiter
    )]
    pub delimiter: char,

    /// Write column labels instead of keys in the header row.
    #[arg(long = "labels")]
    pub labels: bool,
}

impl ExportArgs {
    pub fn input(&self) -> CsvInputArgs {
        CsvInputArgs {
            path: self.path.clone(),
            locale: self.locale.clone(),
            delimiter: self.input_delimiter,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum DesignArg {
    Cohort,
    CaseControl,
}

impl From<DesignArg> for StudyDesign {
    fn from(value: DesignArg) -> Self {
        match value {
            DesignArg::Cohort => StudyDesign::Cohort,
            DesignArg::CaseControl => StudyDesign::CaseControl,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
