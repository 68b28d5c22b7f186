#![deny(unsafe_code)]

//! Value Normalizer.
//!
//! Turns one raw cell into a canonical [`muncher_model::Value`] for one field:
//! the field's value-alias table is applied to the raw token first, then the
//! result is coerced to the field's storage type.

pub mod aliases;
pub mod coerce;
pub mod dates;
pub mod error;

pub use aliases::apply_value_aliases;
pub use coerce::normalize_value;
pub use dates::{DEFAULT_DATE_FORMATS, excel_serial_to_date, parse_date};
pub use error::NormalizationError;
