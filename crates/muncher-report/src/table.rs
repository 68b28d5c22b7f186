//! Terminal summary table.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use muncher_core::{IngestSummary, RowDisposition, SheetOutcome, SheetStatus};

/// One row per sheet plus a total row.
pub fn summary_table(summary: &IngestSummary) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Sheet"),
        header_cell("Layout"),
        header_cell("Status"),
        header_cell("Rows"),
        header_cell("Records"),
        header_cell("Flagged"),
        header_cell("Rejected"),
        header_cell("Issues"),
    ]);
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
    for index in 3..8 {
        if let Some(column) = table.column_mut(index) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }

    for sheet in &summary.sheets {
        let flagged = sheet.count_rows(|d| matches!(d, RowDisposition::Flagged));
        let rejected = sheet.count_rows(|d| !matches!(d, RowDisposition::Flagged));
        table.add_row(vec![
            Cell::new(&sheet.sheet)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(&sheet.layout),
            status_cell(sheet),
            Cell::new(sheet.rows_read),
            Cell::new(sheet.records_written),
            count_cell(flagged, Color::Yellow),
            count_cell(rejected, Color::Red),
            count_cell(sheet.issue_count(), Color::Yellow),
        ]);
    }

    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
        Cell::new(summary.total_rows()).add_attribute(Attribute::Bold),
        Cell::new(summary.total_records()).add_attribute(Attribute::Bold),
        count_cell(summary.flagged_rows(), Color::Yellow).add_attribute(Attribute::Bold),
        count_cell(summary.rejected_rows() + summary.sink_failures(), Color::Red)
            .add_attribute(Attribute::Bold),
        count_cell(summary.total_issues(), Color::Yellow).add_attribute(Attribute::Bold),
    ]);
    table
}

fn status_cell(sheet: &SheetOutcome) -> Cell {
    match &sheet.status {
        SheetStatus::Ingested => Cell::new("ingested").fg(Color::Green),
        SheetStatus::Skipped => dim_cell("skipped"),
        SheetStatus::Rejected { .. } => Cell::new("REJECTED")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
