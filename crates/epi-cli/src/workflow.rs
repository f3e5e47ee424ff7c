//! File-level steps shared by the subcommands.
//!
//! Everything that touches the filesystem or the environment lives here;
//! the library crates only see text and in-memory values.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use epi_ingest::{CsvReadOptions, CsvWriteOptions, HeaderStyle, ParsedCsv, export_to_csv, parse_csv};
use epi_locale::{
    LocaleProfile, format_csv_number, is_flexible_number, looks_like_date, parse_date,
    parse_flexible_number,
};
use epi_stats::{ExposureDefinition, OutcomeDefinition};
use epi_validate::{DataQualityConfig, QualityReport, run_checks};
use tracing::{debug, info, warn};

use crate::logging::redact_value;

/// Environment variables consulted, in order, when no locale is given.
const LOCALE_ENV_VARS: [&str; 3] = ["LC_ALL", "LC_NUMERIC", "LANG"];

/// Resolve the locale profile: explicit tag first, then the environment,
/// then `en-US`.
pub fn resolve_locale(tag: Option<&str>) -> Result<LocaleProfile> {
    if let Some(tag) = tag {
        return LocaleProfile::from_tag(tag).with_context(|| format!("invalid --locale '{tag}'"));
    }
    for var in LOCALE_ENV_VARS {
        let Ok(value) = std::env::var(var) else {
            continue;
        };
        if value.trim().is_empty() {
            continue;
        }
        match LocaleProfile::from_tag(&value) {
            Ok(profile) => {
                debug!(source = var, locale = profile.tag(), "locale from environment");
                return Ok(profile);
            }
            Err(error) => debug!(source = var, %error, "ignoring environment locale"),
        }
    }
    Ok(LocaleProfile::default())
}

/// Parse a delimiter argument: a single character, or `tab`.
pub fn parse_delimiter(value: &str) -> std::result::Result<char, String> {
    match value {
        "tab" | "\\t" => Ok('\t'),
        _ => {
            let mut chars = value.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) => Ok(ch),
                _ => Err(format!("delimiter must be a single character or 'tab', got '{value}'")),
            }
        }
    }
}

/// Read and parse a CSV file. Row problems are logged, not fatal.
pub fn read_csv(path: &Path, profile: &LocaleProfile, options: &CsvReadOptions) -> Result<ParsedCsv> {
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let parsed = parse_csv(&text, profile, options)
        .with_context(|| format!("parse {}", path.display()))?;
    for error in &parsed.errors {
        warn!(line = error.line, "{}", error.message);
    }
    info!(
        path = %path.display(),
        columns = parsed.columns.len(),
        records = parsed.records.len(),
        row_errors = parsed.errors.len(),
        "loaded CSV"
    );
    Ok(parsed)
}

/// Load a rule engine config from a `.toml` or `.json` file, or the
/// defaults when no path is given.
pub fn load_quality_config(path: Option<&Path>) -> Result<DataQualityConfig> {
    let Some(path) = path else {
        return Ok(DataQualityConfig::default());
    };
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let is_toml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    let config = if is_toml {
        toml::from_str(&text).with_context(|| format!("parse TOML config {}", path.display()))?
    } else {
        serde_json::from_str(&text)
            .with_context(|| format!("parse JSON config {}", path.display()))?
    };
    Ok(config)
}

/// Parse `COLUMN=EXPOSED[,EXPOSED...][/UNEXPOSED[,UNEXPOSED...]]` into an
/// exposure definition, e.g. `salad=yes,y/no,n`.
///
/// Values are read with the file's locale, see [`locale_tokens`].
pub fn parse_exposure(spec: &str, profile: &LocaleProfile) -> Result<ExposureDefinition> {
    let (column, values) = spec
        .split_once('=')
        .ok_or_else(|| anyhow!("exposure '{spec}' must look like COLUMN=VALUE"))?;
    let column = column.trim();
    let (exposed, unexposed) = match values.split_once('/') {
        Some((exposed, unexposed)) => (exposed, Some(unexposed)),
        None => (values, None),
    };
    let exposed = split_values(exposed);
    if column.is_empty() || exposed.is_empty() {
        bail!("exposure '{spec}' needs a column and at least one exposed value");
    }
    debug!(column, values = redact_value(values), "exposure definition");
    let exposure = ExposureDefinition::new(column, locale_tokens(&exposed, profile));
    match unexposed.map(split_values) {
        Some(unexposed) if unexposed.is_empty() => {
            bail!("exposure '{spec}' lists no unexposed value after '/'")
        }
        Some(unexposed) => Ok(exposure.with_unexposed_values(locale_tokens(&unexposed, profile))),
        None => Ok(exposure),
    }
}

fn split_values(values: &str) -> Vec<&str> {
    values
        .split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .collect()
}

/// Command-line tokens plus their canonical forms.
///
/// Cells are stored canonically (`1.5`, `2024-06-02`) while users type
/// values the way the file writes them (`1,5`, `02.06.2024`). A token that
/// reads as a number or date under `profile` is kept and its canonical form
/// added, so it matches both text and typed cells.
pub fn locale_tokens(values: &[&str], profile: &LocaleProfile) -> Vec<String> {
    let mut tokens = Vec::with_capacity(values.len());
    for value in values {
        tokens.push((*value).to_string());
        let canonical = if is_flexible_number(value, profile) {
            Some(format_csv_number(parse_flexible_number(value, profile)))
        } else if looks_like_date(value) {
            parse_date(value, profile).map(|date| date.to_string())
        } else {
            None
        };
        if let Some(canonical) = canonical
            && !canonical.is_empty()
            && !tokens.contains(&canonical)
        {
            tokens.push(canonical);
        }
    }
    tokens
}

/// Build the outcome definition from `--case`/`--non-case` values.
pub fn outcome_definition(
    column: &str,
    case_values: &[String],
    non_case_values: &[String],
    profile: &LocaleProfile,
) -> Result<OutcomeDefinition> {
    let case_values = trimmed_values(case_values);
    if case_values.is_empty() {
        bail!("outcome '{column}' needs at least one case value");
    }
    let outcome = OutcomeDefinition::new(column, locale_tokens(&case_values, profile));
    let non_case_values = trimmed_values(non_case_values);
    if non_case_values.is_empty() {
        Ok(outcome)
    } else {
        Ok(outcome.with_non_case_values(locale_tokens(&non_case_values, profile)))
    }
}

fn trimmed_values(values: &[String]) -> Vec<&str> {
    values
        .iter()
        .map(String::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .collect()
}

/// Run the rule engine over a parsed file.
pub fn quality_report(parsed: &ParsedCsv, config: &DataQualityConfig) -> QualityReport {
    QualityReport::new(run_checks(&parsed.columns, &parsed.records, config))
}

/// Re-serialize a parsed file.
pub fn export_parsed(parsed: &ParsedCsv, delimiter: char, labels: bool) -> Result<String> {
    let options = CsvWriteOptions {
        delimiter,
        header: if labels {
            HeaderStyle::Labels
        } else {
            HeaderStyle::Keys
        },
    };
    export_to_csv(&parsed.columns, &parsed.records, &options).context("export CSV")
}

/// Check that every named column exists in the parsed file.
pub fn require_columns<'a>(parsed: &ParsedCsv, keys: impl IntoIterator<Item = &'a str>) -> Result<()> {
    let missing: Vec<&str> = keys
        .into_iter()
        .filter(|key| !parsed.columns.iter().any(|column| column.key == *key))
        .collect();
    if missing.is_empty() {
        return Ok(());
    }
    let available: Vec<&str> = parsed.columns.iter().map(|c| c.key.as_str()).collect();
    bail!(
        "unknown column(s): {}; available: {}",
        missing.join(", "),
        available.join(", ")
    )
}

/// Write text to a file, or stdout when no path is given.
pub fn write_output(path: Option<&Path>, text: &str) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("write {}", path.display()))?;
            info!(path = %path.display(), bytes = text.len(), "wrote output");
        }
        None => print!("{text}"),
    }
    Ok(())
}
