//! Error types for column resolution.

/// Errors from resolving a sheet's headers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolverError {
    /// Two columns of one sheet resolve to the same canonical field.
    #[error("columns '{first}' and '{second}' both map to field '{field}' in layout '{layout}'")]
    AmbiguousField {
        layout: String,
        field: String,
        first: String,
        second: String,
    },
}
