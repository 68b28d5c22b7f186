//! Row assembly.

use std::collections::BTreeMap;

use muncher_map::{ColumnMapping, ColumnResolver, MissingField};
use muncher_model::{
    CanonicalRecord, CellValue, IssueKind, LayoutProfile, RawRow, SchemaModel, Sheet,
    ValidationIssue, Value, Workbook,
};
use muncher_normalization::normalize_value;
use muncher_validate::validate_field;

use crate::options::IngestOptions;
use crate::sink::RecordSink;
use crate::summary::{IngestSummary, RowDisposition, RowOutcome, SheetOutcome, SheetStatus};

/// Turns sheets into canonical records.
///
/// Holds the schema read-only; one assembler can ingest any number of
/// workbooks.
pub struct RecordAssembler<'a> {
    schema: &'a SchemaModel,
    options: IngestOptions,
}

/// Per-sheet context shared by every row.
struct SheetPlan<'s> {
    sheet: &'s Sheet,
    profile: &'s LayoutProfile,
    mapping: ColumnMapping,
    /// Required fields without a column, when strict columns apply.
    blocking: Vec<MissingField>,
}

impl<'a> RecordAssembler<'a> {
    pub fn new(schema: &'a SchemaModel, options: IngestOptions) -> Self {
        Self { schema, options }
    }

    pub fn options(&self) -> IngestOptions {
        self.options
    }

    /// Ingest every sheet of a workbook in order.
    ///
    /// A rejected sheet never stops the remaining sheets.
    pub fn ingest_workbook<S: RecordSink + ?Sized>(
        &self,
        workbook: &Workbook,
        sink: &mut S,
    ) -> IngestSummary {
        let mut summary = IngestSummary::default();
        for sheet in &workbook.sheets {
            summary.sheets.push(self.ingest_sheet(sheet, &mut *sink));
        }
        tracing::info!(
            sheets = summary.sheets.len(),
            records = summary.total_records(),
            issues = summary.total_issues(),
            flagged = summary.flagged_rows(),
            rejected = summary.rejected_rows(),
            "workbook ingested"
        );
        summary
    }

    /// Ingest one sheet, writing each assembled record to `sink`.
    pub fn ingest_sheet<S: RecordSink + ?Sized>(&self, sheet: &Sheet, sink: &mut S) -> SheetOutcome {
        let profile = self.schema.layout(&sheet.layout);
        if !profile.accepts_sheet(&sheet.name) {
            tracing::info!(sheet = %sheet.name, layout = %sheet.layout, "sheet skipped by layout profile");
            return SheetOutcome::new(&sheet.name, &sheet.layout, SheetStatus::Skipped);
        }

        let mapping = match ColumnResolver::new(self.schema).resolve(&sheet.layout, &sheet.headers) {
            Ok(mapping) => mapping,
            Err(error) => {
                tracing::warn!(
                    sheet = %sheet.name,
                    layout = %sheet.layout,
                    %error,
                    "sheet rejected"
                );
                return SheetOutcome::new(
                    &sheet.name,
                    &sheet.layout,
                    SheetStatus::Rejected {
                        reason: error.to_string(),
                    },
                );
            }
        };

        if !mapping.unmapped.is_empty() {
            tracing::info!(
                sheet = %sheet.name,
                unmapped = ?mapping.unmapped,
                "headers not mapped to any field"
            );
        }

        let blocking: Vec<MissingField> = if self.options.strict_columns {
            mapping.missing_required().cloned().collect()
        } else {
            Vec::new()
        };
        if !blocking.is_empty() {
            tracing::warn!(
                sheet = %sheet.name,
                missing = blocking.len(),
                "required columns missing; rows will be rejected"
            );
        }

        let plan = SheetPlan {
            sheet,
            profile: &profile,
            mapping,
            blocking,
        };
        let mut outcome = SheetOutcome::new(&sheet.name, &sheet.layout, SheetStatus::Ingested);
        outcome.unmapped = plan.mapping.unmapped.clone();
        outcome.missing = plan.mapping.missing.clone();

        let mut carried: BTreeMap<usize, Value> = BTreeMap::new();
        for (index, row) in sheet.rows.iter().enumerate() {
            if row.is_blank() {
                tracing::trace!(sheet = %sheet.name, row = row.position, "blank row skipped");
                continue;
            }
            outcome.rows_read += 1;

            if !plan.blocking.is_empty() {
                outcome.rows.push(RowOutcome {
                    row: row.position,
                    disposition: RowDisposition::Rejected,
                    issues: missing_column_issues(&plan.blocking, row.position),
                });
                continue;
            }

            let next = sheet
                .rows
                .get(index + 1)
                .filter(|next| next.position == row.position + 1);
            let (record, issues) = self.assemble_row(&plan, row, next, &mut carried);
            match sink.write(&record, &issues) {
                Ok(()) => {
                    outcome.records_written += 1;
                    if !issues.is_empty() {
                        outcome.rows.push(RowOutcome {
                            row: row.position,
                            disposition: RowDisposition::Flagged,
                            issues,
                        });
                    }
                }
                Err(error) => {
                    tracing::warn!(sheet = %sheet.name, row = row.position, %error, "sink write failed");
                    outcome.rows.push(RowOutcome {
                        row: row.position,
                        disposition: RowDisposition::SinkFailed {
                            message: error.to_string(),
                        },
                        issues,
                    });
                }
            }
        }

        tracing::info!(
            sheet = %sheet.name,
            layout = %sheet.layout,
            rows = outcome.rows_read,
            records = outcome.records_written,
            issues = outcome.issue_count(),
            "sheet ingested"
        );
        outcome
    }

    /// Build the record for one row and collect its issues, in schema field order.
    fn assemble_row(
        &self,
        plan: &SheetPlan<'_>,
        row: &RawRow,
        next: Option<&RawRow>,
        carried: &mut BTreeMap<usize, Value>,
    ) -> (CanonicalRecord, Vec<ValidationIssue>) {
        let mut record = CanonicalRecord::new(&plan.sheet.layout, &plan.sheet.name, row.position);
        let mut issues = Vec::new();

        for (index, field) in self.schema.fields().iter().enumerate() {
            let cell = self.raw_cell(plan, row, index, &field.name);
            let mut value = match normalize_value(self.schema, field, &cell) {
                Ok(value) => value,
                Err(error) => {
                    tracing::debug!(
                        sheet = %plan.sheet.name,
                        row = row.position,
                        field = %field.name,
                        "value could not be normalized"
                    );
                    issues.push(ValidationIssue::new(
                        &field.name,
                        row.position,
                        IssueKind::Unparsable,
                        error.to_string(),
                    ));
                    record.values.insert(field.name.clone(), Value::Absent);
                    continue;
                }
            };

            if plan.profile.fills_down(&field.name) {
                if value.is_absent()
                    && plan.profile.looks_ahead(&field.name)
                    && let Some(ahead) = next.and_then(|next| self.value_ahead(plan, next, index))
                {
                    value = ahead;
                }
                if value.is_absent() {
                    if let Some(previous) = carried.get(&index) {
                        value = previous.clone();
                    }
                } else {
                    carried.insert(index, value.clone());
                }
            }

            issues.extend(validate_field(field, &value, row.position));
            record.values.insert(field.name.clone(), value);
        }

        (record, issues)
    }

    /// Normalized value of a field in the following row, if it has one.
    ///
    /// Problems with that cell are reported when the following row itself is
    /// assembled.
    fn value_ahead(&self, plan: &SheetPlan<'_>, next: &RawRow, index: usize) -> Option<Value> {
        let field = &self.schema.fields()[index];
        let cell = plan
            .mapping
            .column_for(index)
            .and_then(|position| next.cell(position))?;
        normalize_value(self.schema, field, cell)
            .ok()
            .filter(|value| !value.is_absent())
    }

    /// The raw input for a field: its cell, or the layout constant when the
    /// field has no column or the cell is blank.
    fn raw_cell(&self, plan: &SheetPlan<'_>, row: &RawRow, index: usize, name: &str) -> CellValue {
        let cell = plan
            .mapping
            .column_for(index)
            .and_then(|position| row.cell(position))
            .cloned()
            .unwrap_or_default();
        if cell.is_blank()
            && let Some(constant) = plan.profile.constant_for(name)
        {
            return CellValue::Text(constant.to_string());
        }
        cell
    }
}

fn missing_column_issues(missing: &[MissingField], row: usize) -> Vec<ValidationIssue> {
    missing
        .iter()
        .map(|field| {
            ValidationIssue::new(
                &field.field,
                row,
                IssueKind::MissingColumn,
                "sheet has no column for this required field",
            )
        })
        .collect()
}
