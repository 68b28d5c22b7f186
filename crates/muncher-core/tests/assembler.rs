use chrono::NaiveDate;
use muncher_core::{
    IngestOptions, MemorySink, RecordAssembler, RecordSink, RowDisposition, SheetStatus, SinkError,
};
use muncher_model::{
    CanonicalRecord, CellValue, IssueKind, SchemaModel, Sheet, ValidationIssue, Value, Workbook,
};
use muncher_schema::load_schema_str;

const SCHEMA: &str = r#"
tables:
  yes_no: {yes: 1, y: 1, no: 0, n: 0}
layouts:
  clinicA:
    constants: {surgical_pathway: Orthopaedics}
    fill_down: [surgical_date]
  clinicB:
    sheets: [Theatre Diary]
fields:
  - name: idmrn
    type: text
    max_length: 8
    required: true
    aliases: {clinicA: MRN, clinicB: Hospital No}
  - name: date_of_birth
    type: date
    aliases: {clinicA: DOB, clinicB: Date of Birth}
  - name: nhs_number
    type: char
    max_length: 10
    aliases: {clinicA: NHS No}
    checks:
      - kind: pattern
        rule: '\b\d{10}\b'
        message: NHS number must be 10 digits
  - name: surgical_date
    type: date
    aliases: {clinicA: Date}
  - name: surgical_pathway
    type: text
    required: true
  - name: pacu_request
    type: smallint
    value_aliases: yes_no
    aliases: {clinicA: PACU}
"#;

fn schema() -> SchemaModel {
    load_schema_str(SCHEMA).expect("schema").schema
}

fn sheet(name: &str, layout: &str, headers: &[&str], rows: &[&[&str]]) -> Sheet {
    let mut sheet = Sheet::new(
        name,
        layout,
        headers.iter().map(|header| header.to_string()).collect(),
    );
    for (idx, row) in rows.iter().enumerate() {
        let values = row.iter().map(|value| CellValue::from(*value)).collect();
        sheet.push_row(idx + 2, values);
    }
    sheet
}

fn date(y: i32, m: u32, d: u32) -> Value {
    Value::Date(NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

#[test]
fn clinic_a_dob_becomes_a_calendar_date_without_issues() {
    let schema = load_schema_str(
        "fields:\n  - name: date_of_birth\n    type: date\n    aliases: {clinicA: DOB}\n",
    )
    .unwrap()
    .schema;
    let workbook = Workbook::new(vec![sheet("Sheet1", "clinicA", &["DOB"], &[&["2017-10-17"]])]);
    let mut sink = MemorySink::new();

    let summary = RecordAssembler::new(&schema, IngestOptions::default())
        .ingest_workbook(&workbook, &mut sink);

    assert_eq!(summary.total_records(), 1);
    assert_eq!(summary.total_issues(), 0);
    let stored = &sink.stored()[0];
    assert!(stored.issues.is_empty());
    assert_eq!(stored.record.get("date_of_birth"), Some(&date(2017, 10, 17)));
    assert_eq!(stored.record.layout, "clinicA");
    assert_eq!(stored.record.row, 2);
}

#[test]
fn pattern_failure_keeps_value_and_flags_row() {
    let schema = schema();
    let workbook = Workbook::new(vec![sheet(
        "List",
        "clinicA",
        &["MRN", "NHS No"],
        &[&["A100", "123"]],
    )]);
    let mut sink = MemorySink::new();
    let summary = RecordAssembler::new(&schema, IngestOptions::default())
        .ingest_workbook(&workbook, &mut sink);

    let stored = &sink.stored()[0];
    assert_eq!(stored.record.get("nhs_number"), Some(&Value::Text("123".to_string())));
    assert_eq!(stored.issues.len(), 1);
    assert_eq!(stored.issues[0].kind, IssueKind::Pattern);
    assert_eq!(stored.issues[0].message, "NHS number must be 10 digits");

    let outcome = &summary.sheets[0];
    assert_eq!(outcome.rows.len(), 1);
    assert_eq!(outcome.rows[0].disposition, RowDisposition::Flagged);
    assert_eq!(summary.flagged_rows(), 1);
    assert!(!summary.has_rejections());
}

#[test]
fn unparsable_value_is_stored_absent_with_issue() {
    let schema = schema();
    let workbook = Workbook::new(vec![sheet(
        "List",
        "clinicA",
        &["MRN", "DOB", "PACU"],
        &[&["A100", "last spring", "maybe"]],
    )]);
    let mut sink = MemorySink::new();
    RecordAssembler::new(&schema, IngestOptions::default()).ingest_workbook(&workbook, &mut sink);

    let stored = &sink.stored()[0];
    assert_eq!(stored.record.get("date_of_birth"), Some(&Value::Absent));
    assert_eq!(stored.record.get("pacu_request"), Some(&Value::Absent));
    let messages: Vec<_> = stored
        .issues
        .iter()
        .filter(|issue| issue.kind == IssueKind::Unparsable)
        .map(|issue| issue.message.as_str())
        .collect();
    assert_eq!(
        messages,
        [
            "could not parse \"last spring\" as a date",
            "could not parse \"maybe\" as a small integer"
        ]
    );
}

#[test]
fn blank_cells_are_absent_not_empty_text() {
    let schema = schema();
    let workbook = Workbook::new(vec![sheet(
        "List",
        "clinicA",
        &["MRN", "NHS No"],
        &[&["A100", "   "]],
    )]);
    let mut sink = MemorySink::new();
    RecordAssembler::new(&schema, IngestOptions::default()).ingest_workbook(&workbook, &mut sink);
    assert_eq!(sink.stored()[0].record.get("nhs_number"), Some(&Value::Absent));
    assert!(sink.stored()[0].issues.is_empty());
}

#[test]
fn constants_and_fill_down() {
    let schema = schema();
    let workbook = Workbook::new(vec![sheet(
        "List",
        "clinicA",
        &["MRN", "Date"],
        &[&["A1", "03/04/2023"], &["A2", ""], &["A3", "04/04/2023"]],
    )]);
    let mut sink = MemorySink::new();
    RecordAssembler::new(&schema, IngestOptions::default()).ingest_workbook(&workbook, &mut sink);

    let dates: Vec<_> = sink
        .records()
        .map(|record| record.get("surgical_date").cloned())
        .collect();
    assert_eq!(
        dates,
        [Some(date(2023, 4, 3)), Some(date(2023, 4, 3)), Some(date(2023, 4, 4))]
    );
    assert!(sink.records().all(|record| {
        record.get("surgical_pathway") == Some(&Value::Text("Orthopaedics".to_string()))
    }));
}

#[test]
fn next_first_fill_down_takes_the_following_row_before_the_previous() {
    let schema = load_schema_str(
        r#"
layouts:
  clinicB:
    fill_down_next_first: [surgical_consultant]
fields:
  - name: idmrn
    type: text
    aliases: {clinicB: Hospital No}
  - name: surgical_consultant
    type: text
    aliases: {clinicB: Surgeon}
"#,
    )
    .unwrap()
    .schema;
    let mut block = Sheet::new(
        "Theatre Diary",
        "clinicB",
        vec!["Hospital No".to_string(), "Surgeon".to_string()],
    );
    block.push_row(3, vec!["B1".into(), "".into()]);
    block.push_row(4, vec!["B2".into(), "Smith".into()]);
    block.push_row(5, vec!["B3".into(), "".into()]);
    block.push_row(6, vec!["B4".into(), "Jones".into()]);
    block.push_row(7, vec!["B5".into(), "".into()]);
    // Not adjacent to row 7, so row 7 falls back to the previous value.
    block.push_row(9, vec!["B6".into(), "Patel".into()]);
    let mut sink = MemorySink::new();
    RecordAssembler::new(&schema, IngestOptions::default())
        .ingest_workbook(&Workbook::new(vec![block]), &mut sink);

    let consultants: Vec<_> = sink
        .records()
        .map(|record| record.get("surgical_consultant").and_then(Value::as_str).map(str::to_string))
        .collect();
    let expected = ["Smith", "Smith", "Jones", "Jones", "Jones", "Patel"];
    assert_eq!(
        consultants,
        expected.map(|name| Some(name.to_string()))
    );
}

#[test]
fn ambiguous_sheet_is_rejected_and_workbook_continues() {
    let schema = schema();
    let workbook = Workbook::new(vec![
        sheet("Bad", "clinicA", &["MRN", "mrn"], &[&["A1", "A1"]]),
        sheet("Good", "clinicA", &["MRN"], &[&["A2"]]),
    ]);
    let mut sink = MemorySink::new();
    let summary = RecordAssembler::new(&schema, IngestOptions::default())
        .ingest_workbook(&workbook, &mut sink);

    assert!(matches!(summary.sheets[0].status, SheetStatus::Rejected { .. }));
    assert_eq!(summary.sheets[0].rows_read, 0);
    assert_eq!(summary.sheets[1].status, SheetStatus::Ingested);
    assert_eq!(sink.len(), 1);
    assert!(summary.has_rejections());
}

#[test]
fn sheets_outside_the_profile_are_skipped() {
    let schema = schema();
    let workbook = Workbook::new(vec![
        sheet("Notes", "clinicB", &["Hospital No"], &[&["B1"]]),
        sheet(" Theatre Diary ", "clinicB", &["Hospital No"], &[&["B2"]]),
    ]);
    let mut sink = MemorySink::new();
    let summary = RecordAssembler::new(&schema, IngestOptions::default())
        .ingest_workbook(&workbook, &mut sink);

    assert_eq!(summary.sheets[0].status, SheetStatus::Skipped);
    assert_eq!(summary.sheets[1].status, SheetStatus::Ingested);
    assert_eq!(sink.len(), 1);
}

#[test]
fn missing_required_column_lenient_and_strict() {
    let schema = schema();
    // clinicB has no constant for surgical_pathway and the sheet has no MRN column.
    let workbook = Workbook::new(vec![sheet(
        "Theatre Diary",
        "clinicB",
        &["Date of Birth"],
        &[&["01/02/1980"]],
    )]);

    let mut sink = MemorySink::new();
    let lenient = RecordAssembler::new(&schema, IngestOptions::default())
        .ingest_workbook(&workbook, &mut sink);
    assert_eq!(sink.len(), 1);
    let outcome = &lenient.sheets[0];
    let missing: Vec<_> = outcome.missing.iter().map(|m| m.field.as_str()).collect();
    assert!(missing.contains(&"idmrn"));
    assert_eq!(outcome.rows[0].disposition, RowDisposition::Flagged);
    assert!(
        outcome.rows[0]
            .issues
            .iter()
            .all(|issue| issue.kind == IssueKind::RequiredMissing)
    );

    let mut sink = MemorySink::new();
    let strict = RecordAssembler::new(&schema, IngestOptions::new().with_strict_columns(true))
        .ingest_workbook(&workbook, &mut sink);
    assert!(sink.is_empty());
    let outcome = &strict.sheets[0];
    assert_eq!(outcome.rows[0].disposition, RowDisposition::Rejected);
    let fields: Vec<_> = outcome.rows[0]
        .issues
        .iter()
        .map(|issue| (issue.field.as_str(), issue.kind))
        .collect();
    assert_eq!(
        fields,
        [
            ("idmrn", IssueKind::MissingColumn),
            ("surgical_pathway", IssueKind::MissingColumn)
        ]
    );
    assert!(strict.has_rejections());
}

#[test]
fn blank_rows_are_not_counted() {
    let schema = schema();
    let workbook = Workbook::new(vec![sheet(
        "List",
        "clinicA",
        &["MRN"],
        &[&["A1"], &[""], &["A2"]],
    )]);
    let mut sink = MemorySink::new();
    let summary = RecordAssembler::new(&schema, IngestOptions::default())
        .ingest_workbook(&workbook, &mut sink);
    assert_eq!(summary.sheets[0].rows_read, 2);
    assert_eq!(summary.total_records(), 2);
}

struct RefusingSink {
    refuse: &'static str,
    accepted: Vec<String>,
}

impl RecordSink for RefusingSink {
    fn write(&mut self, record: &CanonicalRecord, _issues: &[ValidationIssue]) -> Result<(), SinkError> {
        let mrn = record.get("idmrn").and_then(Value::as_str).unwrap_or_default();
        if mrn == self.refuse {
            return Err(SinkError::rejected("duplicate key"));
        }
        self.accepted.push(mrn.to_string());
        Ok(())
    }
}

#[test]
fn sink_failure_is_reported_and_ingestion_continues() {
    let schema = schema();
    let workbook = Workbook::new(vec![sheet(
        "List",
        "clinicA",
        &["MRN"],
        &[&["A1"], &["A2"], &["A3"]],
    )]);
    let mut sink = RefusingSink {
        refuse: "A2",
        accepted: Vec::new(),
    };
    let summary = RecordAssembler::new(&schema, IngestOptions::default())
        .ingest_workbook(&workbook, &mut sink);

    assert_eq!(sink.accepted, ["A1", "A3"]);
    assert_eq!(summary.total_records(), 2);
    assert_eq!(summary.sink_failures(), 1);
    let failed = &summary.sheets[0].rows[0];
    assert_eq!(failed.row, 3);
    assert_eq!(
        failed.disposition,
        RowDisposition::SinkFailed {
            message: "failed to store record: duplicate key".to_string()
        }
    );
    assert!(summary.has_failures());
    assert!(!summary.has_rejections());
}

#[test]
fn summary_serializes_for_reports() {
    let schema = schema();
    let workbook = Workbook::new(vec![sheet("Bad", "clinicA", &["MRN", "MRN"], &[])]);
    let summary = RecordAssembler::new(&schema, IngestOptions::default())
        .ingest_workbook(&workbook, &mut MemorySink::new());
    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["sheets"][0]["status"]["status"], "rejected");
}
