//! Storage-type coercion.

use muncher_model::{CellValue, FieldDefinition, SchemaModel, StorageType, Value};

use crate::aliases::apply_value_aliases;
use crate::dates::{excel_serial_to_date, parse_date};
use crate::error::NormalizationError;

/// Normalize one raw cell for one field.
///
/// Blank cells (after alias translation) become [`Value::Absent`]. A value
/// that cannot be coerced yields [`NormalizationError::Unparsable`]; the
/// caller decides what to store in its place.
pub fn normalize_value(
    schema: &SchemaModel,
    field: &FieldDefinition,
    cell: &CellValue,
) -> Result<Value, NormalizationError> {
    let cell = apply_value_aliases(schema.value_aliases(field), cell);
    let Some(token) = cell.to_token() else {
        return Ok(Value::Absent);
    };
    let storage_type = field.storage_type;
    let coerced = match storage_type {
        StorageType::Text | StorageType::FixedText => Some(Value::Text(token.clone())),
        StorageType::Date => coerce_date(&cell, &field.date_formats).map(Value::Date),
        StorageType::SmallInteger => coerce_integer(&cell)
            .filter(|number| i16::try_from(*number).is_ok())
            .map(Value::Integer),
        StorageType::Integer => coerce_integer(&cell).map(Value::Integer),
        StorageType::Boolean => coerce_bool(&cell).map(Value::Boolean),
    };
    coerced.ok_or_else(|| NormalizationError::unparsable(token, storage_type))
}

fn coerce_date(cell: &CellValue, formats: &[String]) -> Option<chrono::NaiveDate> {
    match cell {
        CellValue::Date(date) => Some(*date),
        CellValue::DateTime(datetime) => Some(datetime.date()),
        CellValue::Number(serial) => excel_serial_to_date(*serial),
        CellValue::Text(text) => parse_date(text, formats),
        CellValue::Bool(_) | CellValue::Empty => None,
    }
}

fn coerce_integer(cell: &CellValue) -> Option<i64> {
    match cell {
        CellValue::Number(number) => integral(*number),
        CellValue::Bool(flag) => Some(i64::from(*flag)),
        CellValue::Text(text) => {
            let text = text.trim();
            text.parse::<i64>()
                .ok()
                .or_else(|| text.parse::<f64>().ok().and_then(integral))
        }
        CellValue::Date(_) | CellValue::DateTime(_) | CellValue::Empty => None,
    }
}

/// An integral, finite float that fits an `i64`.
fn integral(number: f64) -> Option<i64> {
    let in_range = number >= i64::MIN as f64 && number < i64::MAX as f64;
    (number.is_finite() && number.fract() == 0.0 && in_range).then_some(number as i64)
}

fn coerce_bool(cell: &CellValue) -> Option<bool> {
    match cell {
        CellValue::Bool(flag) => Some(*flag),
        CellValue::Number(number) if *number == 1.0 => Some(true),
        CellValue::Number(number) if *number == 0.0 => Some(false),
        CellValue::Text(text) => match text.trim().to_lowercase().as_str() {
            "true" | "t" | "yes" | "y" | "1" => Some(true),
            "false" | "f" | "no" | "n" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}
