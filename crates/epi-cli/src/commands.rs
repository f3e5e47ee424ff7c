use anyhow::{Context, Result};
use epi_cli::workflow::{
    export_parsed, load_quality_config, outcome_definition, parse_exposure, quality_report,
    read_csv, require_columns, resolve_locale, write_output,
};
use epi_ingest::{CsvReadOptions, ParsedCsv};
use epi_locale::LocaleProfile;
use epi_stats::{ExposureDefinition, analyze_exposures};
use tracing::{info, info_span};

use crate::cli::{AnalyzeArgs, CheckArgs, CsvInputArgs, ExportArgs, InspectArgs};
use crate::summary::{print_analysis, print_inspect, print_report};

fn load_input(input: &CsvInputArgs) -> Result<(ParsedCsv, LocaleProfile)> {
    let profile = resolve_locale(input.locale.as_deref())?;
    let mut options = CsvReadOptions::default();
    if let Some(delimiter) = input.delimiter {
        options = options.with_delimiter(delimiter);
    }
    let parsed = read_csv(&input.path, &profile, &options)?;
    Ok((parsed, profile))
}

pub fn run_inspect(args: &InspectArgs) -> Result<()> {
    let (parsed, profile) = load_input(&args.input)?;
    print_inspect(&parsed, &profile);
    Ok(())
}

/// Returns true when error-severity issues were found.
pub fn run_check(args: &CheckArgs) -> Result<bool> {
    let span = info_span!("check", path = %args.input.path.display());
    let _guard = span.enter();
    let config = load_quality_config(args.config.as_deref())?;
    let (parsed, _) = load_input(&args.input)?;
    let report = quality_report(&parsed, &config);
    info!(
        issues = report.len(),
        errors = report.error_count(),
        warnings = report.warning_count(),
        "checks complete"
    );
    if args.json {
        let json = serde_json::to_string_pretty(&report).context("serialize report")?;
        println!("{json}");
    } else {
        print_report(&report);
    }
    Ok(report.has_errors())
}

pub fn run_analyze(args: &AnalyzeArgs) -> Result<()> {
    let span = info_span!("analyze", path = %args.input.path.display());
    let _guard = span.enter();
    let (parsed, profile) = load_input(&args.input)?;
    let outcome = outcome_definition(
        &args.outcome,
        &args.case_values,
        &args.non_case_values,
        &profile,
    )?;
    let exposures = args
        .exposures
        .iter()
        .map(|spec| parse_exposure(spec, &profile))
        .collect::<Result<Vec<ExposureDefinition>>>()?;
    require_columns(
        &parsed,
        std::iter::once(outcome.column.as_str())
            .chain(exposures.iter().map(|exposure| exposure.column.as_str())),
    )?;
    let results = analyze_exposures(&parsed.records, &outcome, &exposures, args.design.into());
    if args.json {
        let json = serde_json::to_string_pretty(&results).context("serialize results")?;
        println!("{json}");
    } else {
        print_analysis(&results, &profile, args.decimals);
    }
    Ok(())
}

pub fn run_export(args: &ExportArgs) -> Result<()> {
    let (parsed, _) = load_input(&args.input())?;
    let text = export_parsed(&parsed, args.delimiter, args.labels)?;
    write_output(args.output.as_deref(), &text)
}
