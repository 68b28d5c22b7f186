//! Value-alias translation.

use muncher_model::{CellValue, LookupTable};

/// Translate a raw cell through a value-alias table.
///
/// The cell's text token is looked up ignoring case and surrounding
/// whitespace; a hit replaces the cell with the table's value as text. Misses,
/// blank cells and fields without a table pass the cell through unchanged.
pub fn apply_value_aliases(table: Option<&LookupTable>, cell: &CellValue) -> CellValue {
    let Some(table) = table else {
        return cell.clone();
    };
    match cell.to_token().and_then(|token| table.lookup(&token)) {
        Some(value) => CellValue::Text(value.to_string()),
        None => cell.clone(),
    }
}
