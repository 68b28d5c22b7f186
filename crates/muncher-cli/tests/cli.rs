use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use muncher_cli::sink::JsonLinesSink;
use muncher_cli::source::read_csv_sheet;
use muncher_core::RecordSink;
use muncher_model::{CanonicalRecord, CellValue, IssueKind, LayoutProfile, ValidationIssue, Value};
use muncher_schema::load_schema;
use tempfile::TempDir;

fn bundled_schema() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../schema/procedures.yaml")
}

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write csv");
    path
}

#[test]
fn reads_headers_from_first_row_and_strips_bom() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "theatre.csv", "\u{feff}MRN , DOB\nA1,17/10/2017\n,\nA2\n");

    let sheet = read_csv_sheet(&path, &LayoutProfile::new("clinicA")).unwrap();

    assert_eq!(sheet.name, "theatre");
    assert_eq!(sheet.layout, "clinicA");
    assert_eq!(sheet.headers, vec!["MRN", "DOB"]);
    assert_eq!(sheet.rows.len(), 3);
    assert_eq!(sheet.rows[0].position, 2);
    assert!(sheet.rows[1].is_blank());
    assert_eq!(sheet.rows[2].cell(1), Some(&CellValue::Empty));
}

#[test]
fn heading_row_below_a_title_line() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "diary.csv", "Theatre Diary,,\nHospital No,First Name\nB7,Ann\n");
    let mut profile = LayoutProfile::new("clinicB");
    profile.header_row = 2;

    let sheet = read_csv_sheet(&path, &profile).unwrap();

    assert_eq!(sheet.headers, vec!["Hospital No", "First Name"]);
    assert_eq!(sheet.rows.len(), 1);
    assert_eq!(sheet.rows[0].position, 3);
    assert_eq!(sheet.rows[0].cell(1), Some(&CellValue::from("Ann")));
}

#[test]
fn positions_follow_file_lines_across_blank_lines() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "gaps.csv", "MRN,DOB\nA1,01/01/1980\n\nA2,bad\n");

    let sheet = read_csv_sheet(&path, &LayoutProfile::new("clinicA")).unwrap();

    let positions: Vec<usize> = sheet.rows.iter().map(|row| row.position).collect();
    assert_eq!(positions, vec![2, 4]);
    assert_eq!(sheet.rows[1].cell(0), Some(&CellValue::from("A2")));
}

#[test]
fn heading_row_counts_blank_lines() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "diary.csv",
        "Theatre Diary export\n\nHospital No,Date of Birth\nB1,01/01/1980\n",
    );
    let mut profile = LayoutProfile::new("clinicB");
    profile.header_row = 3;

    let sheet = read_csv_sheet(&path, &profile).unwrap();

    assert_eq!(sheet.headers, vec!["Hospital No", "Date of Birth"]);
    assert_eq!(sheet.rows.len(), 1);
    assert_eq!(sheet.rows[0].position, 4);
    assert_eq!(sheet.rows[0].cell(0), Some(&CellValue::from("B1")));
}

#[test]
fn letter_headers_without_heading_row() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "export.csv", "C9,Bo\nC10,Cy,Dee\n");
    let mut profile = LayoutProfile::new("clinicC");
    profile.header_row = 0;

    let sheet = read_csv_sheet(&path, &profile).unwrap();

    assert_eq!(sheet.headers, vec!["A", "B", "C"]);
    assert_eq!(sheet.rows.len(), 2);
    assert_eq!(sheet.rows[0].position, 1);
}

#[test]
fn missing_heading_row_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "short.csv", "only one line\n");
    let mut profile = LayoutProfile::new("clinicB");
    profile.header_row = 2;

    let error = read_csv_sheet(&path, &profile).unwrap_err();
    assert!(error.to_string().contains("has no headers on line 2"));
}

#[test]
fn json_lines_sink_writes_one_object_per_record() {
    let schema = load_schema(&bundled_schema()).unwrap().schema;
    let mut record = CanonicalRecord::new("clinicA", "theatre", 2);
    record.values.insert("idmrn".into(), Value::Text("A1".into()));
    record.values.insert("nhs_number".into(), Value::Absent);
    record.values.insert("sex".into(), Value::Integer(1));
    record.values.insert("cancelled".into(), Value::Absent);
    let issue = ValidationIssue::new("nhs_number", 2, IssueKind::RequiredMissing, "required value is missing");

    let mut sink = JsonLinesSink::new(&schema, Vec::new());
    sink.write(&record, &[issue]).unwrap();
    sink.write(&record, &[]).unwrap();
    assert_eq!(sink.written(), 2);
    let bytes = sink.finish().unwrap();

    let text = String::from_utf8(bytes).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(first["sheet"], "theatre");
    assert_eq!(first["row"], 2);
    assert_eq!(first["values"]["idmrn"], "A1");
    assert!(first["values"]["nhs_number"].is_null());
    assert_eq!(first["issues"][0]["kind"], "required_missing");
    assert_eq!(first["values"]["sex"], 1);
    assert_eq!(first["labels"]["sex"], "Male");
    assert!(first["labels"].get("cancelled").is_none());
    assert!(first["labels"].get("idmrn").is_none());
    let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
    assert_eq!(second["issues"].as_array().map(Vec::len), Some(0));
}

#[test]
fn munch_writes_records_and_report() {
    let dir = TempDir::new().unwrap();
    let input = write(
        &dir,
        "list.csv",
        "MRN,Forename,Surname,DOB,NHS No,Sex,Procedure,Date,PACU\n\
         A1,Ann,Lee,17/10/1970,4010232137,F,Hip replacement,17/10/2017,Y\n\
         A2,Bo,Kay,01/02/1980,123,M,Knee arthroscopy,,N\n",
    );
    let output = dir.path().join("records.jsonl");
    let report = dir.path().join("report.json");

    let status = Command::new(env!("CARGO_BIN_EXE_muncher"))
        .arg("munch")
        .arg("--schema")
        .arg(bundled_schema())
        .args(["--layout", "clinicA"])
        .arg("--output")
        .arg(&output)
        .arg("--report")
        .arg(&report)
        .arg(&input)
        .output()
        .expect("run muncher");
    assert!(status.status.success(), "{}", String::from_utf8_lossy(&status.stderr));

    let records = fs::read_to_string(&output).unwrap();
    let lines: Vec<serde_json::Value> = records
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["values"]["date_of_birth"], "1970-10-17");
    assert_eq!(lines[0]["values"]["sex"], 0);
    assert_eq!(lines[0]["labels"]["sex"], "Female");
    assert_eq!(lines[0]["labels"]["pacu_request"], "Yes");
    assert_eq!(lines[0]["values"]["surgical_pathway"], "Orthopaedics");
    assert_eq!(lines[1]["values"]["nhs_number"], "123");
    assert_eq!(lines[1]["values"]["surgical_date"], "2017-10-17");

    let report: serde_json::Value = serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(report["totals"]["records"], 2);
    assert_eq!(report["totals"]["flagged_rows"], 1);
    let stdout = String::from_utf8_lossy(&status.stdout);
    assert!(stdout.contains("NHS number must be 10 digits"));
}

#[test]
fn fields_lists_the_bundled_schema() {
    let output = Command::new(env!("CARGO_BIN_EXE_muncher"))
        .arg("fields")
        .arg("--schema")
        .arg(bundled_schema())
        .output()
        .expect("run muncher");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("nhs_number"));
    assert!(stdout.contains("clinicA: MRN"));
    assert!(stdout.contains("1 = Male"));
}

#[test]
fn unreadable_schema_fails() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "list.csv", "MRN\nA1\n");
    let output = Command::new(env!("CARGO_BIN_EXE_muncher"))
        .arg("munch")
        .arg("--schema")
        .arg(dir.path().join("missing.yaml"))
        .args(["--layout", "clinicA"])
        .arg(&input)
        .output()
        .expect("run muncher");
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("load schema"));
}
