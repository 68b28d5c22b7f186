//! Raw spreadsheet input as yielded by a sheet source.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A raw cell value in the host spreadsheet's native representation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl CellValue {
    /// Returns true for empty cells and whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(text) => text.trim().is_empty(),
            _ => false,
        }
    }

    /// Render the cell as a trimmed text token, `None` for blank cells.
    pub fn to_token(&self) -> Option<String> {
        if self.is_blank() {
            return None;
        }
        let token = match self {
            CellValue::Empty => return None,
            CellValue::Text(text) => text.trim().to_string(),
            CellValue::Number(number) => format_number(*number),
            CellValue::Bool(flag) => flag.to_string(),
            CellValue::Date(date) => date.format("%Y-%m-%d").to_string(),
            CellValue::DateTime(datetime) => datetime.format("%Y-%m-%d %H:%M:%S").to_string(),
        };
        Some(token)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(value: NaiveDate) -> Self {
        CellValue::Date(value)
    }
}

/// Format a spreadsheet number, dropping the fractional part of integral values.
///
/// Spreadsheets store identifiers such as hospital numbers as floats, so
/// `1234567890.0` must render as `1234567890`.
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// One spreadsheet row: ordered (header-as-seen, raw value) pairs.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawRow {
    /// Position of the row in the sheet (1-based spreadsheet row number).
    pub position: usize,
    pub cells: Vec<(String, CellValue)>,
}

impl RawRow {
    pub fn new(position: usize, cells: Vec<(String, CellValue)>) -> Self {
        Self { position, cells }
    }

    /// Pair values with headers by position. Missing trailing cells are empty.
    pub fn from_values(position: usize, headers: &[String], values: Vec<CellValue>) -> Self {
        let mut values = values.into_iter();
        let cells = headers
            .iter()
            .map(|header| (header.clone(), values.next().unwrap_or_default()))
            .collect();
        Self { position, cells }
    }

    /// Cell at a header position. Short rows yield `None`.
    pub fn cell(&self, index: usize) -> Option<&CellValue> {
        self.cells.get(index).map(|(_, value)| value)
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|(_, value)| value.is_blank())
    }
}

/// One sheet of a workbook, tagged with the layout it was exported in.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Sheet {
    pub name: String,
    /// Layout identifier driving header alias resolution.
    pub layout: String,
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, layout: impl Into<String>, headers: Vec<String>) -> Self {
        Self {
            name: name.into(),
            layout: layout.into(),
            headers,
            rows: Vec::new(),
        }
    }

    /// Append a row of values in header order.
    pub fn push_row(&mut self, position: usize, values: Vec<CellValue>) {
        let row = RawRow::from_values(position, &self.headers, values);
        self.rows.push(row);
    }
}

/// An ordered list of sheets.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new(sheets: Vec<Sheet>) -> Self {
        Self { sheets }
    }
}
