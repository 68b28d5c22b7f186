//! Per-source layout profiles.

use std::collections::{BTreeMap, BTreeSet};

/// How one source clinic lays out its spreadsheets.
///
/// Column headers are declared on the fields themselves (`source_aliases`);
/// the profile carries the sheet-level settings of the layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutProfile {
    /// Layout identifier.
    pub id: String,
    /// Sheet names to ingest. Empty means every sheet.
    pub sheets: Vec<String>,
    /// 1-based row holding the headers. `0` means headers are column letters.
    pub header_row: usize,
    /// Canonical field -> raw value applied to every row.
    pub constants: BTreeMap<String, String>,
    /// Canonical fields whose blank cells inherit the previous row's value.
    pub fill_down: BTreeSet<String>,
    /// Fill-down fields that try the next row's cell before the previous value.
    pub fill_down_next_first: BTreeSet<String>,
}

impl LayoutProfile {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            sheets: Vec::new(),
            header_row: 1,
            constants: BTreeMap::new(),
            fill_down: BTreeSet::new(),
            fill_down_next_first: BTreeSet::new(),
        }
    }

    /// Returns true if a sheet with this name should be ingested.
    pub fn accepts_sheet(&self, name: &str) -> bool {
        let name = name.trim();
        self.sheets.is_empty() || self.sheets.iter().any(|sheet| sheet.trim() == name)
    }

    /// Returns true if the sheet carries a heading row.
    pub fn has_heading_row(&self) -> bool {
        self.header_row > 0
    }

    /// Constant raw value for a field, matched case-insensitively.
    pub fn constant_for(&self, field: &str) -> Option<&str> {
        self.constants
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(field))
            .map(|(_, value)| value.as_str())
    }

    pub fn fills_down(&self, field: &str) -> bool {
        self.fill_down
            .iter()
            .any(|name| name.eq_ignore_ascii_case(field))
    }

    /// Returns true if a blank cell of this field first looks at the next row.
    pub fn looks_ahead(&self, field: &str) -> bool {
        self.fill_down_next_first
            .iter()
            .any(|name| name.eq_ignore_ascii_case(field))
    }
}
