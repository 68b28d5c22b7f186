//! Per-row validation issues.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What went wrong with a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// The raw value could not be coerced to the field's storage type.
    Unparsable,
    /// A required field has no value.
    RequiredMissing,
    /// A required field has no column in the sheet (strict columns only).
    MissingColumn,
    /// Text exceeds the field's maximum length.
    TooLong,
    /// A declared pattern check failed.
    Pattern,
}

impl IssueKind {
    pub fn label(&self) -> &'static str {
        match self {
            IssueKind::Unparsable => "unparsable",
            IssueKind::RequiredMissing => "required missing",
            IssueKind::MissingColumn => "missing column",
            IssueKind::TooLong => "too long",
            IssueKind::Pattern => "pattern",
        }
    }
}

/// One failed check on one field of one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Canonical name of the offending field.
    pub field: String,
    /// Row position in the source sheet.
    pub row: usize,
    pub kind: IssueKind,
    /// User-facing message (the check's configured message for pattern checks).
    pub message: String,
}

impl ValidationIssue {
    pub fn new(
        field: impl Into<String>,
        row: usize,
        kind: IssueKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            row,
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {}: {}: {}", self.row, self.field, self.message)
    }
}
