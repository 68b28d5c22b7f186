#![deny(unsafe_code)]

//! Column Resolver.
//!
//! Maps the headers of one sheet to canonical fields using the sheet's layout
//! identifier: a header matching a field's alias for that layout wins, then a
//! header matching a canonical name. Headers are compared after trimming and
//! case-folding.

pub mod error;
pub mod letters;
pub mod resolver;

pub use error::ResolverError;
pub use letters::{column_index, column_letter, column_letters};
pub use resolver::{ColumnMapping, ColumnResolver, MissingField, normalize_header};
