use epi_ingest::{
    CsvReadOptions, CsvWriteOptions, HeaderStyle, IngestError, detect_delimiter, export_to_csv,
    infer_column_type, parse_csv,
};
use epi_locale::LocaleProfile;
use epi_model::{ColumnType, Provenance, Value};

fn parse(text: &str) -> epi_ingest::ParsedCsv {
    parse_csv(text, &LocaleProfile::en_us(), &CsvReadOptions::default()).expect("parse csv")
}

#[test]
fn detects_delimiters() {
    assert_eq!(detect_delimiter("a;b;c"), ';');
    assert_eq!(detect_delimiter("a,b,c"), ',');
    assert_eq!(detect_delimiter("a\tb\tc"), '\t');
    assert_eq!(detect_delimiter("a|b|c"), '|');
    assert_eq!(detect_delimiter("single column"), ',');
    assert_eq!(detect_delimiter("\"x;y;z\",b,c"), ',');
}

#[test]
fn infers_column_types_from_samples() {
    let profile = LocaleProfile::en_us();
    assert_eq!(infer_column_type(["1", "2", "3"], &profile), ColumnType::Number);
    assert_eq!(
        infer_column_type(["2024-01-01", "2024-01-02"], &profile),
        ColumnType::Date
    );
    assert_eq!(infer_column_type(["yes", "no", "yes"], &profile), ColumnType::Boolean);
    assert_eq!(infer_column_type(["abc", "2024"], &profile), ColumnType::Text);
}

#[test]
fn only_first_sample_rows_drive_inference() {
    let mut text = String::from("code\n");
    for n in 0..10 {
        text.push_str(&format!("{n}\n"));
    }
    text.push_str("A7\n");
    let options = CsvReadOptions::default().with_sample_size(11);
    let parsed = parse_csv(&text, &LocaleProfile::en_us(), &options).expect("parse csv");
    assert_eq!(parsed.columns[0].column_type, ColumnType::Text);
    assert!(parsed.errors.is_empty());

    let parsed = parse(&text);
    assert_eq!(parsed.columns[0].column_type, ColumnType::Number);
    assert_eq!(parsed.errors.len(), 1);
}

#[test]
fn quoted_fields_keep_delimiters_quotes_and_newlines() {
    let parsed = parse(
        "id,notes\r\n1,\"ate \"\"chicken\"\", salad\"\r\n2,\"line one\nline two\"\r\n\r\n3,plain\r\n",
    );
    assert!(parsed.errors.is_empty());
    assert_eq!(parsed.records.len(), 3);
    assert_eq!(
        parsed.records[0].get("notes"),
        &Value::Text("ate \"chicken\", salad".to_string())
    );
    assert_eq!(
        parsed.records[1].get("notes"),
        &Value::Text("line one\nline two".to_string())
    );
    assert_eq!(parsed.records[2].id().as_str(), "row-3");
}

#[test]
fn stray_mid_field_quote_keeps_following_rows() {
    let parsed = parse("id,name,height\n1,Ann,5'4\n2,Bob \"Bobby,6\n3,Cy,5\n4,Di,6\n5,Ed,7\n");
    assert!(parsed.errors.is_empty(), "{:?}", parsed.error_messages());
    assert_eq!(parsed.records.len(), 5);
    assert_eq!(
        parsed.records[1].get("name"),
        &Value::text("Bob \"Bobby")
    );
    assert_eq!(parsed.records[4].get("name"), &Value::text("Ed"));
}

#[test]
fn unterminated_quote_skips_only_its_own_row() {
    let parsed = parse("id,name,height\n1,Ann,5\n2,\"Bob,6\n3,Cy,5\n4,Di,6\n");
    assert_eq!(parsed.records.len(), 3);
    assert_eq!(
        parsed.error_messages(),
        vec!["row 3: expected 3 fields, found 2; row skipped"]
    );
    assert_eq!(parsed.records[2].get("name"), &Value::text("Di"));
}

#[test]
fn header_keys_are_sanitized_and_unique() {
    let parsed = parse("Case ID,  Date of Onset (DD/MM) ,case id,\nA,1,B,x\n");
    let keys: Vec<&str> = parsed.columns.iter().map(|c| c.key.as_str()).collect();
    assert_eq!(keys, vec!["case_id", "date_of_onset_dd_mm", "case_id_2", "column_4"]);
    assert_eq!(parsed.columns[1].label, "Date of Onset (DD/MM)");
}

#[test]
fn missing_tokens_are_null_in_every_type() {
    let parsed = parse("n,d,b,t\n1,2024-01-01,yes,a\nnull,undefined,,NULL\n");
    let record = &parsed.records[1];
    for key in ["n", "d", "b", "t"] {
        assert!(record.is_missing(key), "{key} should be missing");
    }
}

#[test]
fn empty_input_reports_error() {
    let err = parse_csv("", &LocaleProfile::en_us(), &CsvReadOptions::default()).unwrap_err();
    assert!(matches!(err, IngestError::EmptyInput));
    assert_eq!(err.to_string(), "input is empty");
}

#[test]
fn parsed_rows_become_an_imported_dataset() {
    let dataset = parse("id,age\n1,30\n2,41\n").into_dataset().expect("dataset");
    assert_eq!(dataset.provenance(), Provenance::Import);
    assert_eq!(dataset.len(), 2);
    let ages: Vec<f64> = dataset.values("age").filter_map(Value::as_number).collect();
    assert_eq!(ages, vec![30.0, 41.0]);
}

#[test]
fn german_import_exports_with_period_decimals() {
    let parsed = parse_csv(
        "Fall;Temperatur;Beginn\nA;38,5;03.04.2024\nB;1.040,75;04.04.2024\n",
        &LocaleProfile::de_de(),
        &CsvReadOptions::default(),
    )
    .expect("parse csv");
    let out = export_to_csv(&parsed.columns, &parsed.records, &CsvWriteOptions::default())
        .expect("export csv");
    insta::assert_snapshot!(out, @r"
    fall,temperatur,beginn
    A,38.5,2024-04-03
    B,1040.75,2024-04-04
    ");

    let labelled = export_to_csv(
        &parsed.columns,
        &parsed.records,
        &CsvWriteOptions {
            delimiter: ';',
            header: HeaderStyle::Labels,
        },
    )
    .expect("export csv");
    assert!(labelled.starts_with("Fall;Temperatur;Beginn\n"));
}
