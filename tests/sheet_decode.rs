use std::fs;
use std::path::PathBuf;

use league_tables::sheet_decode::{CellValue, WarningKind, decode_sheet};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn decodes_standings_fixture() {
    let sheet = decode_sheet(&read_fixture("standings.csv"));

    // Seven data lines, one of them entirely blank.
    assert_eq!(sheet.rows.len(), 6);
    assert_eq!(sheet.headers.len(), 14);
    assert_eq!(sheet.header_set().len(), 13);
    assert!(!sheet.header_set().iter().any(|h| h.trim().is_empty()));

    let first = &sheet.rows[0];
    assert_eq!(first.get("team"), Some(&CellValue::Text("Balingen Lions".to_string())));
    assert_eq!(first.get("W"), Some(&CellValue::Number(5.0)));
    assert_eq!(first.get("win_pct"), Some(&CellValue::Number(0.625)));
    // Values under the blank header stay on the row.
    assert_eq!(first.get(""), Some(&CellValue::Text("x".to_string())));

    let munich = &sheet.rows[2];
    assert_eq!(
        munich.get("win_pct_sorted"),
        Some(&CellValue::Text("62.5%".to_string()))
    );
    let dresden = &sheet.rows[4];
    assert_eq!(
        dresden.get("win_pct_sorted"),
        Some(&CellValue::Text("0,714".to_string()))
    );
}

#[test]
fn short_lines_warn_and_keep_row() {
    let sheet = decode_sheet(&read_fixture("standings.csv"));
    assert_eq!(sheet.warnings.len(), 1);
    let warning = &sheet.warnings[0];
    assert_eq!(warning.kind, WarningKind::TooFewFields);
    assert_eq!(warning.line, 8);

    let hamburg = sheet.rows.last().expect("short row kept");
    assert_eq!(hamburg.text("team"), "Hamburg Pioneers");
    assert_eq!(hamburg.get("win_pct_sorted"), Some(&CellValue::Empty));
}

#[test]
fn long_lines_warn_and_keep_extras_unnamed() {
    let sheet = decode_sheet("a,b\n1,2,Lions\n");
    assert_eq!(sheet.rows.len(), 1);
    assert_eq!(sheet.warnings[0].kind, WarningKind::TooManyFields);
    assert_eq!(sheet.header_set(), vec!["a", "b"]);

    let row = &sheet.rows[0];
    assert_eq!(row.fields().len(), 3);
    assert_eq!(row.get("b"), Some(&CellValue::Number(2.0)));
    assert_eq!(row.fields()[2], (String::new(), CellValue::Text("Lions".to_string())));
}

#[test]
fn whitespace_only_rows_are_dropped() {
    let text = "Team,W\n  ,   \nLions,3\n , \n";
    let sheet = decode_sheet(text);
    assert_eq!(sheet.rows.len(), 1);
    assert_eq!(sheet.rows[0].text("Team"), "Lions");
}

#[test]
fn never_more_rows_than_data_lines() {
    let text = read_fixture("matchups.csv");
    let data_lines = text.lines().count() - 1;
    let sheet = decode_sheet(&text);
    assert!(sheet.rows.len() <= data_lines);
    assert_eq!(sheet.rows.len(), 2);
}

#[test]
fn decoding_is_deterministic() {
    let text = read_fixture("standings.csv");
    assert_eq!(decode_sheet(&text), decode_sheet(&text));
}

#[test]
fn header_only_and_empty_input_yield_no_rows() {
    let sheet = decode_sheet("Rank,Team,Score\n");
    assert!(sheet.is_empty());
    assert_eq!(sheet.header_set(), vec!["Rank", "Team", "Score"]);

    assert!(decode_sheet("").is_empty());
}

#[test]
fn quoted_fields_keep_delimiters() {
    let sheet = decode_sheet("Team,Note\n\"Lions, Balingen\",\"said \"\"hi\"\"\"\n");
    assert_eq!(sheet.rows[0].text("Team"), "Lions, Balingen");
    assert_eq!(sheet.rows[0].text("Note"), "said \"hi\"");
}
