//! Schema file path resolution.

use std::path::PathBuf;

/// Environment variable for overriding the schema file.
pub const SCHEMA_ENV_VAR: &str = "MUNCHER_SCHEMA";

/// Get the schema file used when none is given explicitly.
///
/// Resolution order:
/// 1. `MUNCHER_SCHEMA` environment variable
/// 2. `schema/procedures.yaml` relative to workspace root
pub fn default_schema_path() -> PathBuf {
    if let Ok(path) = std::env::var(SCHEMA_ENV_VAR) {
        return PathBuf::from(path);
    }
    bundled_schema_path()
}

/// The schema shipped with the workspace, ignoring the environment.
pub fn bundled_schema_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../schema/procedures.yaml")
}
