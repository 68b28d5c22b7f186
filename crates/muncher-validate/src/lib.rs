#![deny(unsafe_code)]

//! Validator.
//!
//! Runs the checks declared on a field against its normalized value. Checks
//! never stop a record: every failure becomes a [`ValidationIssue`] attached
//! to the row, in the order required, max length, declared checks.

use muncher_model::{Check, CheckRule, FieldDefinition, IssueKind, ValidationIssue, Value};

/// Returns true when `value` satisfies `check`. Absent values pass.
pub fn run_check(check: &Check, value: &Value) -> bool {
    let Some(text) = value.as_text() else {
        return true;
    };
    match &check.rule {
        CheckRule::Pattern(pattern) => pattern.is_full_match(&text),
    }
}

/// Validate one field value of the row at `row`.
pub fn validate_field(field: &FieldDefinition, value: &Value, row: usize) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if value.is_absent() {
        if field.required {
            issues.push(ValidationIssue::new(
                &field.name,
                row,
                IssueKind::RequiredMissing,
                "required value is missing",
            ));
        }
        return issues;
    }

    if let Some(limit) = field.effective_max_length()
        && let Some(text) = value.as_str()
    {
        let length = text.chars().count();
        if length > limit {
            issues.push(ValidationIssue::new(
                &field.name,
                row,
                IssueKind::TooLong,
                format!("value is {length} characters long; at most {limit} allowed"),
            ));
        }
    }

    for check in &field.checks {
        if !run_check(check, value) {
            issues.push(ValidationIssue::new(
                &field.name,
                row,
                IssueKind::Pattern,
                check.message.clone(),
            ));
        }
    }

    issues
}
