//! CSV sheet source.
//!
//! Each CSV file is one sheet named after its file stem. The layout's
//! `header_row` says which record holds the headers; `0` means the export has
//! no heading row and columns are addressed by letter.

use std::path::Path;

use anyhow::{Context, Result, bail};
use csv::ReaderBuilder;

use muncher_map::column_letters;
use muncher_model::{CellValue, LayoutProfile, Sheet, Workbook};

use crate::logging::{log_data_enabled, redact_value};

/// Read every file as one sheet of the given layout.
pub fn read_workbook(paths: &[impl AsRef<Path>], profile: &LayoutProfile) -> Result<Workbook> {
    let sheets = paths
        .iter()
        .map(|path| read_csv_sheet(path.as_ref(), profile))
        .collect::<Result<Vec<_>>>()?;
    Ok(Workbook::new(sheets))
}

/// Read one CSV file as a sheet.
///
/// Row positions are the file's line numbers, so blank lines (which the csv
/// reader drops) still count toward `header_row` and toward the positions the
/// operator report shows.
pub fn read_csv_sheet(path: &Path, profile: &LayoutProfile) -> Result<Sheet> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("open csv: {}", path.display()))?;
    let mut records = Vec::new();
    for record in reader.records() {
        let record = record.with_context(|| format!("read record: {}", path.display()))?;
        let line = record
            .position()
            .map_or(records.len() + 1, |position| position.line() as usize);
        records.push((line, record));
    }

    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let headers = if profile.has_heading_row() {
        let Some((_, header_record)) = records
            .iter()
            .find(|(line, _)| *line == profile.header_row)
        else {
            bail!(
                "{} has no headers on line {}",
                path.display(),
                profile.header_row
            );
        };
        header_record
            .iter()
            .map(|header| header.trim_matches('\u{feff}').trim().to_string())
            .collect()
    } else {
        let width = records.iter().map(|(_, record)| record.len()).max().unwrap_or(0);
        column_letters(width)
    };

    let mut sheet = Sheet::new(name, profile.id.clone(), headers);
    for (position, record) in records
        .iter()
        .filter(|(line, _)| *line > profile.header_row)
    {
        if log_data_enabled() {
            let cells: Vec<&str> = record.iter().map(redact_value).collect();
            tracing::trace!(sheet = %sheet.name, row = position, ?cells, "row read");
        }
        sheet.push_row(*position, record.iter().map(cell_value).collect());
    }
    tracing::debug!(
        sheet = %sheet.name,
        path = %path.display(),
        columns = sheet.headers.len(),
        rows = sheet.rows.len(),
        "csv sheet read"
    );
    Ok(sheet)
}

fn cell_value(raw: &str) -> CellValue {
    if raw.trim().is_empty() {
        CellValue::Empty
    } else {
        CellValue::Text(raw.to_string())
    }
}
