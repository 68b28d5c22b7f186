use std::collections::BTreeMap;

use serde::Serialize;

use crate::value::Value;

/// The canonical form of one spreadsheet row.
///
/// Built by the record assembler and handed to the persistence sink; it is not
/// modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalRecord {
    /// Layout identifier of the source sheet.
    pub layout: String,
    /// Source sheet name.
    pub sheet: String,
    /// Row position in the source sheet.
    pub row: usize,
    /// Canonical name -> normalized value, one entry per schema field.
    pub values: BTreeMap<String, Value>,
}

impl CanonicalRecord {
    pub fn new(layout: impl Into<String>, sheet: impl Into<String>, row: usize) -> Self {
        Self {
            layout: layout.into(),
            sheet: sheet.into(),
            row,
            values: BTreeMap::new(),
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    /// Number of fields carrying a value.
    pub fn present_count(&self) -> usize {
        self.values.values().filter(|value| !value.is_absent()).count()
    }
}
