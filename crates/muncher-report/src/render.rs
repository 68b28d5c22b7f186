//! Plain-text rendering.

use muncher_core::{RowDisposition, SheetStatus};

use crate::report::{IssueEntry, OperatorReport, RowEntry, SheetReport};

/// Hex digits of the schema fingerprint shown in text output.
const FINGERPRINT_PREFIX: usize = 12;

impl OperatorReport {
    /// Render the report as stable, line-oriented text.
    pub fn render_text(&self) -> String {
        let mut lines = Vec::new();
        lines.push(match &self.schema_fingerprint {
            Some(fingerprint) => {
                let short = fingerprint.get(..FINGERPRINT_PREFIX).unwrap_or(fingerprint);
                format!("schema {short}")
            }
            None => "schema (unversioned)".to_string(),
        });
        for sheet in &self.sheets {
            render_sheet(sheet, &mut lines);
        }
        let totals = &self.totals;
        lines.push(format!(
            "total: {} rows, {} records, {} issues, {} flagged, {} rejected, {} sink failures",
            totals.rows,
            totals.records,
            totals.issues,
            totals.flagged_rows,
            totals.rejected_rows,
            totals.sink_failures
        ));
        lines.join("\n")
    }
}

fn render_sheet(sheet: &SheetReport, lines: &mut Vec<String>) {
    let head = format!("sheet {} ({})", sheet.sheet, sheet.layout);
    match &sheet.status {
        SheetStatus::Skipped => {
            lines.push(format!("{head}: skipped"));
            return;
        }
        SheetStatus::Rejected { reason } => {
            lines.push(format!("{head}: rejected: {reason}"));
            return;
        }
        SheetStatus::Ingested => lines.push(format!(
            "{head}: {} rows read, {} records written",
            sheet.rows_read, sheet.records_written
        )),
    }

    if !sheet.unmapped.is_empty() {
        lines.push(format!("  unmapped headers: {}", sheet.unmapped.join(", ")));
    }
    let (required, optional): (Vec<_>, Vec<_>) =
        sheet.missing.iter().partition(|missing| missing.required);
    if !required.is_empty() {
        let names: Vec<_> = required.iter().map(|m| m.field.as_str()).collect();
        lines.push(format!("  missing required fields: {}", names.join(", ")));
    }
    if !optional.is_empty() {
        let names: Vec<_> = optional.iter().map(|m| m.field.as_str()).collect();
        lines.push(format!("  missing fields: {}", names.join(", ")));
    }
    for row in &sheet.rows {
        render_row(row, lines);
    }
}

fn render_row(row: &RowEntry, lines: &mut Vec<String>) {
    match &row.disposition {
        RowDisposition::SinkFailed { message } => {
            lines.push(format!("  row {}: sink failed: {message}", row.row));
        }
        disposition => lines.push(format!("  row {}: {}", row.row, disposition.label())),
    }
    for issue in &row.issues {
        lines.push(format!("    - {}", issue_line(issue)));
    }
}

fn issue_line(issue: &IssueEntry) -> String {
    match &issue.label {
        Some(label) => format!(
            "{} ({label}): {} [{}]",
            issue.field,
            issue.message,
            issue.kind.label()
        ),
        None => format!("{}: {} [{}]", issue.field, issue.message, issue.kind.label()),
    }
}
