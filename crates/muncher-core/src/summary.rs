//! Outcome of an ingestion run.

use serde::Serialize;

use muncher_map::MissingField;
use muncher_model::ValidationIssue;

/// What happened to a sheet as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SheetStatus {
    /// Rows were processed (individual rows may still be flagged or rejected).
    Ingested,
    /// The layout profile does not list this sheet.
    Skipped,
    /// Column resolution failed; no row was processed.
    Rejected { reason: String },
}

/// Why a row appears in the summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "disposition", rename_all = "snake_case")]
pub enum RowDisposition {
    /// Stored with issues attached.
    Flagged,
    /// Not stored (strict columns).
    Rejected,
    /// Assembled but the sink refused it.
    SinkFailed { message: String },
}

impl RowDisposition {
    pub fn label(&self) -> &'static str {
        match self {
            RowDisposition::Flagged => "flagged",
            RowDisposition::Rejected => "rejected",
            RowDisposition::SinkFailed { .. } => "sink failed",
        }
    }
}

/// A row that needs operator attention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowOutcome {
    pub row: usize,
    pub disposition: RowDisposition,
    pub issues: Vec<ValidationIssue>,
}

/// Result of ingesting one sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetOutcome {
    pub sheet: String,
    pub layout: String,
    pub status: SheetStatus,
    /// Headers matching no canonical field.
    pub unmapped: Vec<String>,
    /// Fields with neither a column nor a layout constant.
    pub missing: Vec<MissingField>,
    /// Non-blank rows processed.
    pub rows_read: usize,
    /// Records accepted by the sink.
    pub records_written: usize,
    /// Flagged, rejected and sink-failed rows, in sheet order.
    pub rows: Vec<RowOutcome>,
}

impl SheetOutcome {
    pub(crate) fn new(sheet: &str, layout: &str, status: SheetStatus) -> Self {
        Self {
            sheet: sheet.to_string(),
            layout: layout.to_string(),
            status,
            unmapped: Vec::new(),
            missing: Vec::new(),
            rows_read: 0,
            records_written: 0,
            rows: Vec::new(),
        }
    }

    pub fn issue_count(&self) -> usize {
        self.rows.iter().map(|row| row.issues.len()).sum()
    }

    pub fn count_rows(&self, disposition: fn(&RowDisposition) -> bool) -> usize {
        self.rows
            .iter()
            .filter(|row| disposition(&row.disposition))
            .count()
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self.status, SheetStatus::Rejected { .. })
    }
}

/// Result of ingesting a workbook, one outcome per sheet in workbook order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestSummary {
    pub sheets: Vec<SheetOutcome>,
}

impl IngestSummary {
    pub fn total_records(&self) -> usize {
        self.sheets.iter().map(|sheet| sheet.records_written).sum()
    }

    pub fn total_rows(&self) -> usize {
        self.sheets.iter().map(|sheet| sheet.rows_read).sum()
    }

    pub fn total_issues(&self) -> usize {
        self.sheets.iter().map(SheetOutcome::issue_count).sum()
    }

    /// Rows stored with issues attached.
    pub fn flagged_rows(&self) -> usize {
        self.sheets
            .iter()
            .map(|sheet| sheet.count_rows(|d| matches!(d, RowDisposition::Flagged)))
            .sum()
    }

    pub fn rejected_rows(&self) -> usize {
        self.sheets
            .iter()
            .map(|sheet| sheet.count_rows(|d| matches!(d, RowDisposition::Rejected)))
            .sum()
    }

    pub fn sink_failures(&self) -> usize {
        self.sheets
            .iter()
            .map(|sheet| sheet.count_rows(|d| matches!(d, RowDisposition::SinkFailed { .. })))
            .sum()
    }

    /// True when a sheet or a row was rejected.
    pub fn has_rejections(&self) -> bool {
        self.sheets.iter().any(SheetOutcome::is_rejected) || self.rejected_rows() > 0
    }

    /// True when some row did not reach storage.
    pub fn has_failures(&self) -> bool {
        self.has_rejections() || self.sink_failures() > 0
    }
}
