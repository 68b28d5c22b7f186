#![deny(unsafe_code)]

//! Operator-facing output.
//!
//! An [`OperatorReport`] lists, per sheet, how its columns resolved and every
//! row that needs manual correction together with its issues, so an operator
//! can fix the source spreadsheet without re-deriving the mapping.

mod render;
mod report;
mod table;

pub use report::{IssueEntry, OperatorReport, ReportTotals, RowEntry, SheetReport};
pub use table::summary_table;
