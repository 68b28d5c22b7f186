#![deny(unsafe_code)]

//! Schema Model Builder.
//!
//! Parses the declarative YAML schema file into a [`SchemaDocument`], checks
//! it, and builds the immutable [`muncher_model::SchemaModel`] every other
//! stage reads. All problems found in the schema file are fatal
//! [`SchemaError`]s except a short list of [`SchemaWarning`]s that are logged
//! and returned alongside the model.

pub mod builder;
pub mod document;
pub mod error;
pub mod hash;
pub mod loader;
pub mod paths;

pub use builder::{BuiltSchema, build_schema};
pub use document::{CheckDocument, FieldDocument, LayoutDocument, SchemaDocument, TableRef};
pub use error::{Result, SchemaError, SchemaWarning};
pub use loader::{load_default_schema, load_schema, load_schema_str};
pub use paths::{SCHEMA_ENV_VAR, default_schema_path};
