use std::collections::BTreeMap;

use chrono::NaiveDate;
use muncher_model::{
    CanonicalRecord, CellValue, IssueKind, SchemaModel, Sheet, TableRegistry, ValidationIssue,
    Value,
};

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn schema_model_is_shareable_across_threads() {
    assert_send_sync::<SchemaModel>();
    let schema = SchemaModel::new(Vec::new(), TableRegistry::new(), BTreeMap::new());
    assert!(schema.is_empty());
}

#[test]
fn record_serializes_with_traceability() {
    let mut record = CanonicalRecord::new("clinicA", "Theatre List", 4);
    record.values.insert(
        "date_of_birth".to_string(),
        Value::Date(NaiveDate::from_ymd_opt(2017, 10, 17).unwrap()),
    );
    record
        .values
        .insert("nhs_number".to_string(), Value::Absent);

    let json = serde_json::to_value(&record).expect("serialize record");
    assert_eq!(json["layout"], "clinicA");
    assert_eq!(json["row"], 4);
    assert_eq!(json["values"]["date_of_birth"], "2017-10-17");
    assert!(json["values"]["nhs_number"].is_null());
    assert_eq!(record.present_count(), 1);
}

#[test]
fn sheet_rows_follow_header_order() {
    let mut sheet = Sheet::new(
        "List",
        "clinicA",
        vec!["MRN".to_string(), "DOB".to_string()],
    );
    sheet.push_row(2, vec![CellValue::from("A1"), CellValue::from("2017-10-17")]);

    let row = &sheet.rows[0];
    assert_eq!(row.position, 2);
    assert_eq!(row.cells[1].0, "DOB");
    assert_eq!(row.cell(0), Some(&CellValue::from("A1")));
}

#[test]
fn issue_display_names_row_and_field() {
    let issue = ValidationIssue::new(
        "nhs_number",
        7,
        IssueKind::Pattern,
        "NHS number must be 10 digits",
    );
    assert_eq!(
        issue.to_string(),
        "row 7: nhs_number: NHS number must be 10 digits"
    );
    let json = serde_json::to_string(&issue.kind).unwrap();
    assert_eq!(json, "\"pattern\"");
}
