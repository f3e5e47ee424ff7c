//! File-level workflow tests.

use std::fs;
use std::path::PathBuf;

use epi_cli::workflow::{
    export_parsed, load_quality_config, outcome_definition, parse_exposure, quality_report,
    read_csv, require_columns, write_output,
};
use epi_ingest::CsvReadOptions;
use epi_locale::LocaleProfile;
use epi_stats::{StudyDesign, analyze_exposures};
use epi_validate::{CheckKind, FieldRole};
use tempfile::TempDir;

fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

const PICNIC: &str = "\
case_id;ill;salad;chicken;onset
1;ja;ja;nein;02.06.2024
2;ja;ja;ja;02.06.2024
3;nein;nein;ja;
4;ja;ja;nein;03.06.2024
5;nein;nein;nein;
6;nein;ja;ja;
";

#[test]
fn reads_german_file_and_analyzes_exposures() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "picknick.csv", PICNIC);
    let parsed = read_csv(&path, &LocaleProfile::de_de(), &CsvReadOptions::default()).unwrap();
    assert_eq!(parsed.delimiter, ';');
    assert_eq!(parsed.records.len(), 6);

    let german = LocaleProfile::de_de();
    let outcome =
        outcome_definition("ill", &["ja".to_string()], &["nein".to_string()], &german).unwrap();
    let exposures = vec![
        parse_exposure("salad=ja", &german).unwrap(),
        parse_exposure("chicken=ja", &german).unwrap(),
    ];
    require_columns(&parsed, ["ill", "salad", "chicken"]).unwrap();
    let results = analyze_exposures(&parsed.records, &outcome, &exposures, StudyDesign::Cohort);
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].exposure, "salad");
    let salad = results[0].counts;
    assert_eq!((salad.a, salad.b, salad.c, salad.d), (3, 1, 0, 2));
    let chicken = results[1].counts;
    assert_eq!((chicken.a, chicken.b, chicken.c, chicken.d), (1, 2, 2, 1));
}

#[test]
fn unlisted_exposure_values_are_excluded() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "picknick.csv",
        "ill;salad\nja;ja\nja;unbekannt\nnein;nein\nja;nein\nnein;vielleicht\n",
    );
    let parsed = read_csv(&path, &LocaleProfile::de_de(), &CsvReadOptions::default()).unwrap();
    let german = LocaleProfile::de_de();
    let outcome =
        outcome_definition("ill", &["ja".to_string()], &["nein".to_string()], &german).unwrap();
    let exposures = vec![parse_exposure("salad=ja/nein", &german).unwrap()];
    let results = analyze_exposures(&parsed.records, &outcome, &exposures, StudyDesign::Cohort);
    let salad = &results[0];
    assert_eq!(
        (salad.counts.a, salad.counts.b, salad.counts.c, salad.counts.d),
        (1, 0, 1, 1)
    );
    assert_eq!(salad.excluded_unrecognized, 2);
}

#[test]
fn german_number_and_date_values_match_typed_cells() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "dosis.csv",
        "dosis;beginn;krank\n1,5;02.06.2024;ja\n2;02.06.2024;nein\n1,5;03.06.2024;nein\n2;03.06.2024;nein\n",
    );
    let german = LocaleProfile::de_de();
    let parsed = read_csv(&path, &german, &CsvReadOptions::default()).unwrap();
    let outcome =
        outcome_definition("dosis", &["1,5".to_string()], &["2".to_string()], &german).unwrap();
    let exposures = vec![parse_exposure("beginn=02.06.2024/03.06.2024", &german).unwrap()];
    let results = analyze_exposures(&parsed.records, &outcome, &exposures, StudyDesign::Cohort);
    let counts = results[0].counts;
    assert_eq!((counts.a, counts.b, counts.c, counts.d), (1, 1, 1, 1));
    assert_eq!(results[0].excluded_unrecognized, 0);
}

#[test]
fn unknown_columns_are_reported() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "picknick.csv", PICNIC);
    let parsed = read_csv(&path, &LocaleProfile::de_de(), &CsvReadOptions::default()).unwrap();
    let error = require_columns(&parsed, ["ill", "dessert"]).unwrap_err();
    let message = error.to_string();
    assert!(message.contains("dessert"));
    assert!(message.contains("available: case_id"));
}

#[test]
fn missing_file_has_context() {
    let dir = TempDir::new().unwrap();
    let error = read_csv(
        &dir.path().join("absent.csv"),
        &LocaleProfile::default(),
        &CsvReadOptions::default(),
    )
    .unwrap_err();
    assert!(error.to_string().starts_with("read "));
}

#[test]
fn loads_toml_and_json_configs() {
    let dir = TempDir::new().unwrap();
    let toml_path = write_file(
        &dir,
        "quality.toml",
        r#"
enabled_checks = ["exact_duplicate"]

[field_mapping]
case_id = "case_id"
"#,
    );
    let json_path = write_file(
        &dir,
        "quality.json",
        r#"{"thresholds": {"age_max": 99}}"#,
    );

    let from_toml = load_quality_config(Some(&toml_path)).unwrap();
    assert!(from_toml.is_enabled(CheckKind::ExactDuplicate));
    assert!(!from_toml.is_enabled(CheckKind::FuzzyDuplicate));
    assert_eq!(
        from_toml.field_mapping.column(FieldRole::CaseId),
        Some("case_id")
    );

    let from_json = load_quality_config(Some(&json_path)).unwrap();
    assert_eq!(from_json.thresholds.age_max, 99.0);
    assert_eq!(from_json.thresholds.age_min, 0.0);

    let defaults = load_quality_config(None).unwrap();
    assert!(defaults.is_enabled(CheckKind::DateOrder));
}

#[test]
fn bad_config_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "quality.toml", "enabled_checks = 3\n");
    assert!(load_quality_config(Some(&path)).is_err());
}

#[test]
fn check_finds_duplicate_case_ids() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "cases.csv",
        "case_id,name\nA1,Ann\nA1,Ann\nB2,Bob\n",
    );
    let config_path = write_file(
        &dir,
        "quality.toml",
        "enabled_checks = [\"exact_duplicate\"]\n[field_mapping]\ncase_id = \"case_id\"\n",
    );
    let parsed = read_csv(&path, &LocaleProfile::default(), &CsvReadOptions::default()).unwrap();
    let config = load_quality_config(Some(&config_path)).unwrap();
    let report = quality_report(&parsed, &config);
    assert_eq!(report.len(), 1);
    assert!(report.has_errors());
}

#[test]
fn export_writes_period_decimals() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "gewichte.csv", "Name;Gewicht\nAnna;1.234,5\nBen;70\n");
    let parsed = read_csv(&path, &LocaleProfile::de_de(), &CsvReadOptions::default()).unwrap();

    let text = export_parsed(&parsed, ',', false).unwrap();
    assert_eq!(text, "name,gewicht\nAnna,1234.5\nBen,70\n");

    let labelled = export_parsed(&parsed, '\t', true).unwrap();
    assert!(labelled.starts_with("Name\tGewicht\n"));

    let out = dir.path().join("out.csv");
    write_output(Some(&out), &text).unwrap();
    assert_eq!(fs::read_to_string(&out).unwrap(), text);
}
