use muncher_model::{CanonicalRecord, IssueKind, SchemaModel, Value};
use muncher_schema::load_schema;
use muncher_schema::paths::bundled_schema_path;
use muncher_validate::validate_field;

fn bundled() -> SchemaModel {
    load_schema(&bundled_schema_path()).expect("bundled schema").schema
}

#[test]
fn short_nhs_number_gets_exactly_one_issue() {
    let schema = bundled();
    let field = schema.field("nhs_number").expect("nhs_number");
    let issues = validate_field(field, &Value::Text("123".to_string()), 5);
    assert_eq!(issues.len(), 1);
    let issue = &issues[0];
    assert_eq!(issue.kind, IssueKind::Pattern);
    assert_eq!(issue.field, "nhs_number");
    assert_eq!(issue.message, "NHS number must be 10 digits");
    assert_eq!(issue.to_string(), "row 5: nhs_number: NHS number must be 10 digits");
}

#[test]
fn valid_nhs_number_passes() {
    let schema = bundled();
    let field = schema.field("nhs_number").expect("nhs_number");
    assert!(validate_field(field, &Value::Text("4010232137".to_string()), 5).is_empty());
}

#[test]
fn sparse_record_flags_missing_required_fields() {
    let schema = bundled();
    let mut record = CanonicalRecord::new("clinicA", "Sheet1", 2);
    record
        .values
        .insert("idmrn".to_string(), Value::Text("A100".to_string()));
    record
        .values
        .insert("procedure_code".to_string(), Value::Text("W37.1".to_string()));

    let issues: Vec<_> = schema
        .fields()
        .iter()
        .flat_map(|field| {
            let value = record.get(&field.name).unwrap_or(&Value::Absent);
            validate_field(field, value, record.row)
        })
        .collect();
    let missing: Vec<_> = issues
        .iter()
        .filter(|issue| issue.kind == IssueKind::RequiredMissing)
        .map(|issue| issue.field.as_str())
        .collect();
    assert_eq!(
        missing,
        [
            "patient_given_name",
            "patient_family_name",
            "surgical_procedure",
            "surgical_date",
            "surgical_pathway"
        ]
    );
    assert_eq!(issues.len(), missing.len());
}
