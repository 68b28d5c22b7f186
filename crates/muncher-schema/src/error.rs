#![deny(unsafe_code)]

use std::fmt;
use std::path::PathBuf;

use muncher_model::StorageType;

pub type Result<T> = std::result::Result<T, SchemaError>;

/// A fatal problem in the declarative schema file.
///
/// Fields are identified by their 1-based position in the `fields` list when
/// they have no usable name yet.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("failed to read schema file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse schema YAML {origin}: {source}")]
    Yaml {
        origin: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("field #{position} has no canonical name")]
    MissingName { position: usize },

    #[error("field '{field}' has no storage type")]
    MissingType { field: String },

    #[error("field '{field}' has unknown storage type '{value}'")]
    UnknownType { field: String, value: String },

    #[error("duplicate canonical name '{name}' (fields #{first} and #{second})")]
    DuplicateName {
        name: String,
        first: usize,
        second: usize,
    },

    #[error("field '{field}' references unknown table '{table}'")]
    UnresolvedTable { field: String, table: String },

    #[error("table '{table}' maps '{key}' to both '{first}' and '{second}'")]
    ConflictingTableEntry {
        table: String,
        key: String,
        first: String,
        second: String,
    },

    #[error("table '{table}' has a non-scalar entry")]
    NonScalarTableEntry { table: String },

    #[error("field '{field}' has invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        field: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("layout '{layout}' maps header '{header}' to both '{first}' and '{second}'")]
    AmbiguousAlias {
        layout: String,
        header: String,
        first: String,
        second: String,
    },

    #[error("layout '{layout}' names unknown field '{field}' in {setting}")]
    UnknownLayoutField {
        layout: String,
        field: String,
        setting: &'static str,
    },

    #[error("layout '{layout}' constant for '{field}' is not a scalar")]
    NonScalarConstant { layout: String, field: String },
}

impl SchemaError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// A non-fatal finding in the schema file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaWarning {
    /// `max_length` declared on a type it does not apply to; it is ignored.
    MaxLengthIgnored {
        field: String,
        storage_type: StorageType,
    },
    /// A named table no field references.
    UnusedTable { table: String },
}

impl fmt::Display for SchemaWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaWarning::MaxLengthIgnored {
                field,
                storage_type,
            } => write!(
                f,
                "field '{field}' declares max_length on {storage_type} storage; ignored"
            ),
            SchemaWarning::UnusedTable { table } => {
                write!(f, "table '{table}' is not referenced by any field")
            }
        }
    }
}
