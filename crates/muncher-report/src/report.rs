use serde::Serialize;

use muncher_core::{IngestSummary, RowDisposition, SheetOutcome, SheetStatus};
use muncher_map::MissingField;
use muncher_model::{IssueKind, SchemaModel, ValidationIssue};

/// Everything an operator needs to correct the rows of one ingestion run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperatorReport {
    /// SHA-256 of the schema file the model was built from.
    pub schema_fingerprint: Option<String>,
    pub totals: ReportTotals,
    pub sheets: Vec<SheetReport>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportTotals {
    pub sheets: usize,
    pub rows: usize,
    pub records: usize,
    pub issues: usize,
    pub flagged_rows: usize,
    pub rejected_rows: usize,
    pub sink_failures: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetReport {
    pub sheet: String,
    pub layout: String,
    pub status: SheetStatus,
    pub rows_read: usize,
    pub records_written: usize,
    pub unmapped: Vec<String>,
    pub missing: Vec<MissingField>,
    pub rows: Vec<RowEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowEntry {
    pub row: usize,
    pub disposition: RowDisposition,
    pub issues: Vec<IssueEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueEntry {
    pub field: String,
    /// Display label of the field, when the schema declares one.
    pub label: Option<String>,
    pub kind: IssueKind,
    pub message: String,
}

impl OperatorReport {
    pub fn from_summary(summary: &IngestSummary, schema: &SchemaModel) -> Self {
        let totals = ReportTotals {
            sheets: summary.sheets.len(),
            rows: summary.total_rows(),
            records: summary.total_records(),
            issues: summary.total_issues(),
            flagged_rows: summary.flagged_rows(),
            rejected_rows: summary.rejected_rows(),
            sink_failures: summary.sink_failures(),
        };
        Self {
            schema_fingerprint: schema.fingerprint().map(str::to_string),
            totals,
            sheets: summary
                .sheets
                .iter()
                .map(|outcome| sheet_report(outcome, schema))
                .collect(),
        }
    }

    /// True when nothing needs operator attention.
    pub fn is_clean(&self) -> bool {
        self.totals.issues == 0
            && self.totals.rejected_rows == 0
            && self.totals.sink_failures == 0
            && self
                .sheets
                .iter()
                .all(|sheet| !matches!(sheet.status, SheetStatus::Rejected { .. }))
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn sheet_report(outcome: &SheetOutcome, schema: &SchemaModel) -> SheetReport {
    SheetReport {
        sheet: outcome.sheet.clone(),
        layout: outcome.layout.clone(),
        status: outcome.status.clone(),
        rows_read: outcome.rows_read,
        records_written: outcome.records_written,
        unmapped: outcome.unmapped.clone(),
        missing: outcome.missing.clone(),
        rows: outcome
            .rows
            .iter()
            .map(|row| RowEntry {
                row: row.row,
                disposition: row.disposition.clone(),
                issues: row
                    .issues
                    .iter()
                    .map(|issue| issue_entry(issue, schema))
                    .collect(),
            })
            .collect(),
    }
}

fn issue_entry(issue: &ValidationIssue, schema: &SchemaModel) -> IssueEntry {
    IssueEntry {
        field: issue.field.clone(),
        label: schema.field(&issue.field).and_then(|field| field.label.clone()),
        kind: issue.kind,
        message: issue.message.clone(),
    }
}
