//! Reading schema files from disk or text.

use std::path::Path;

use crate::builder::{BuiltSchema, build_schema};
use crate::document::SchemaDocument;
use crate::error::{Result, SchemaError};
use crate::hash::sha256_hex;
use crate::paths::default_schema_path;

/// Load and build a schema from a YAML file.
///
/// The resulting model carries the SHA-256 of the file contents as its
/// fingerprint.
pub fn load_schema(path: &Path) -> Result<BuiltSchema> {
    let text = std::fs::read_to_string(path).map_err(|source| SchemaError::io(path, source))?;
    let built = build_from_text(&text, &path.display().to_string())?;
    tracing::info!(
        path = %path.display(),
        fields = built.schema.len(),
        warnings = built.warnings.len(),
        "schema loaded"
    );
    Ok(built)
}

/// Load and build a schema from YAML text.
pub fn load_schema_str(text: &str) -> Result<BuiltSchema> {
    build_from_text(text, "<inline>")
}

/// Load the schema at [`default_schema_path`].
pub fn load_default_schema() -> Result<BuiltSchema> {
    load_schema(&default_schema_path())
}

fn build_from_text(text: &str, origin: &str) -> Result<BuiltSchema> {
    let document = SchemaDocument::parse(text, origin)?;
    let BuiltSchema { schema, warnings } = build_schema(&document)?;
    Ok(BuiltSchema {
        schema: schema.with_fingerprint(sha256_hex(text.as_bytes())),
        warnings,
    })
}
