use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use epi_ingest::ParsedCsv;
use epi_locale::LocaleProfile;
use epi_model::RecordId;
use epi_stats::{
    MeasureKind, TwoByTwoResults, format_estimate, format_measure, format_p_value, format_percent,
};
use epi_validate::{DataQualityIssue, QualityReport, Severity};

pub fn print_inspect(parsed: &ParsedCsv, profile: &LocaleProfile) {
    println!("Locale: {}", profile.tag());
    println!("Delimiter: {}", delimiter_label(parsed.delimiter));
    println!("Records: {}", parsed.records.len());
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Key"),
        header_cell("Label"),
        header_cell("Type"),
        header_cell("Missing"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    for column in &parsed.columns {
        let missing = parsed
            .records
            .iter()
            .filter(|record| record.is_missing(&column.key))
            .count();
        table.add_row(vec![
            Cell::new(&column.key)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(&column.label),
            Cell::new(column.column_type),
            count_cell(missing, Color::Yellow),
        ]);
    }
    println!("{table}");
    if !parsed.errors.is_empty() {
        eprintln!("Row problems:");
        for error in &parsed.errors {
            eprintln!("- {error}");
        }
    }
}

pub fn print_report(report: &QualityReport) {
    let mut issues: Vec<&DataQualityIssue> = report.active().collect();
    if issues.is_empty() {
        println!("No data quality issues found.");
        return;
    }
    issues.sort_by(|a, b| {
        a.severity
            .cmp(&b.severity)
            .then_with(|| a.category.cmp(&b.category))
            .then_with(|| a.id.cmp(&b.id))
    });
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Severity"),
        header_cell("Category"),
        header_cell("Check"),
        header_cell("Field"),
        header_cell("Records"),
        header_cell("Message"),
    ]);
    apply_issue_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Center);
    for issue in issues {
        let records: Vec<&str> = issue.record_ids.iter().map(RecordId::as_str).collect();
        table.add_row(vec![
            severity_cell(issue.severity),
            Cell::new(issue.category.label()),
            Cell::new(issue.check.label()),
            issue
                .field
                .as_deref()
                .map_or_else(|| dim_cell("-"), Cell::new),
            Cell::new(records.join(", ")),
            Cell::new(&issue.message),
        ]);
    }
    println!("{table}");

    let mut totals = Table::new();
    totals.set_header(vec![header_cell("Category"), header_cell("Issues")]);
    apply_table_style(&mut totals);
    align_column(&mut totals, 1, CellAlignment::Right);
    for (category, count) in report.by_category() {
        totals.add_row(vec![Cell::new(category.label()), Cell::new(count)]);
    }
    totals.add_row(vec![
        Cell::new("Errors").fg(Color::Red).add_attribute(Attribute::Bold),
        count_cell(report.error_count(), Color::Red).add_attribute(Attribute::Bold),
    ]);
    totals.add_row(vec![
        Cell::new("Warnings")
            .fg(Color::Yellow)
            .add_attribute(Attribute::Bold),
        count_cell(report.warning_count(), Color::Yellow).add_attribute(Attribute::Bold),
    ]);
    println!();
    println!("{totals}");
}

pub fn print_analysis(results: &[TwoByTwoResults], profile: &LocaleProfile, decimals: usize) {
    for result in results {
        println!();
        println!(
            "Exposure: {}  Outcome: {}  Design: {}",
            result.exposure,
            result.outcome,
            result.design.label()
        );
        println!("{}", two_by_two_table(result, profile, decimals));
        println!("{}", measures_table(result, profile, decimals));
        if result.excluded_missing > 0 || result.excluded_unrecognized > 0 {
            println!(
                "Excluded: {} missing, {} unrecognized",
                result.excluded_missing, result.excluded_unrecognized
            );
        }
    }
}

fn two_by_two_table(result: &TwoByTwoResults, profile: &LocaleProfile, decimals: usize) -> Table {
    let counts = &result.counts;
    let pct = &result.percentages;
    let cell = |count: u64, share: f64| {
        Cell::new(format!(
            "{count} ({})",
            format_percent(share, decimals.min(1), profile)
        ))
    };
    let mut table = Table::new();
    table.set_header(vec![
        header_cell(""),
        header_cell("Cases"),
        header_cell("Non-cases"),
        header_cell("Total"),
    ]);
    apply_table_style(&mut table);
    for index in 1..4 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    table.add_row(vec![
        Cell::new("Exposed").add_attribute(Attribute::Bold),
        cell(counts.a, pct.a),
        cell(counts.b, pct.b),
        Cell::new(counts.exposed_total()),
    ]);
    table.add_row(vec![
        Cell::new("Unexposed").add_attribute(Attribute::Bold),
        cell(counts.c, pct.c),
        cell(counts.d, pct.d),
        Cell::new(counts.unexposed_total()),
    ]);
    table.add_row(vec![
        Cell::new("Total").fg(Color::Cyan).add_attribute(Attribute::Bold),
        Cell::new(counts.case_total()),
        Cell::new(counts.non_case_total()),
        Cell::new(counts.total()).add_attribute(Attribute::Bold),
    ]);
    table
}

fn measures_table(result: &TwoByTwoResults, profile: &LocaleProfile, decimals: usize) -> Table {
    let (primary, _) = result.primary();
    let mut table = Table::new();
    table.set_header(vec![header_cell("Measure"), header_cell("Value")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    let ratio_label = |kind: MeasureKind| {
        if kind == primary {
            Cell::new(format!("{} *", kind.label())).add_attribute(Attribute::Bold)
        } else {
            Cell::new(kind.label())
        }
    };
    table.add_row(vec![
        Cell::new("Attack rate (exposed)"),
        Cell::new(format_percent(result.attack_rate_exposed, decimals, profile)),
    ]);
    table.add_row(vec![
        Cell::new("Attack rate (unexposed)"),
        Cell::new(format_percent(result.attack_rate_unexposed, decimals, profile)),
    ]);
    table.add_row(vec![
        ratio_label(MeasureKind::RiskRatio),
        Cell::new(format_estimate(&result.risk_ratio, decimals, profile)),
    ]);
    table.add_row(vec![
        ratio_label(MeasureKind::OddsRatio),
        Cell::new(format_estimate(&result.odds_ratio, decimals, profile)),
    ]);
    table.add_row(vec![
        Cell::new("Chi-square"),
        Cell::new(format_measure(result.chi_square.statistic, decimals, profile)),
    ]);
    table.add_row(vec![
        Cell::new("p (chi-square)"),
        Cell::new(format_p_value(result.chi_square.p_value, profile)),
    ]);
    let fisher_label = if result.chi_square.fisher_recommended() {
        Cell::new("p (Fisher exact) *").add_attribute(Attribute::Bold)
    } else {
        Cell::new("p (Fisher exact)")
    };
    table.add_row(vec![
        fisher_label,
        Cell::new(format_p_value(result.fisher_p_value, profile)),
    ]);
    table
}

fn delimiter_label(delimiter: char) -> String {
    match delimiter {
        '\t' => "tab".to_string(),
        other => format!("'{other}'"),
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_issue_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(160);
    if table.column_count() >= 6 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Fixed(9)),
            ColumnConstraint::UpperBoundary(Width::Fixed(14)),
            ColumnConstraint::UpperBoundary(Width::Fixed(22)),
            ColumnConstraint::UpperBoundary(Width::Fixed(18)),
            ColumnConstraint::UpperBoundary(Width::Percentage(20)),
            ColumnConstraint::UpperBoundary(Width::Percentage(45)),
        ]);
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn severity_cell(severity: Severity) -> Cell {
    match severity {
        Severity::Error => Cell::new("ERROR")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        Severity::Warning => Cell::new("WARN").fg(Color::Yellow),
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
