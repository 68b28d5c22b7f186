//! Data model for normalizing clinic spreadsheet exports of patient-procedure records.
//!
//! This crate holds the types every other crate in the workspace agrees on:
//!
//! - [`schema`]: the immutable [`SchemaModel`] built once from the declarative schema file
//! - [`field`]: canonical [`FieldDefinition`]s, their [`StorageType`] and declared [`Check`]s
//! - [`table`]: shared value-alias and value-label tables held in a [`TableRegistry`]
//! - [`layout`]: per-source [`LayoutProfile`]s keyed by layout identifier
//! - [`cell`]: raw spreadsheet input ([`CellValue`], [`RawRow`], [`Sheet`], [`Workbook`])
//! - [`value`]: normalized canonical [`Value`]s
//! - [`record`]: assembled [`CanonicalRecord`]s
//! - [`issue`]: per-row [`ValidationIssue`]s

pub mod cell;
pub mod field;
pub mod issue;
pub mod layout;
pub mod record;
pub mod schema;
pub mod table;
pub mod value;

pub use cell::{CellValue, RawRow, Sheet, Workbook, format_number};
pub use field::{Check, CheckRule, FieldDefinition, PatternRule, StorageType};
pub use issue::{IssueKind, ValidationIssue};
pub use layout::LayoutProfile;
pub use record::CanonicalRecord;
pub use schema::SchemaModel;
pub use table::{LookupTable, TableId, TableRegistry, fold_key};
pub use value::Value;
