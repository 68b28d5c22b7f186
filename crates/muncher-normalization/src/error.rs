use muncher_model::StorageType;

/// A raw value that cannot be coerced to its field's storage type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizationError {
    #[error("could not parse \"{raw}\" as {}", .storage_type.describe())]
    Unparsable {
        raw: String,
        storage_type: StorageType,
    },
}

impl NormalizationError {
    pub(crate) fn unparsable(raw: impl Into<String>, storage_type: StorageType) -> Self {
        Self::Unparsable {
            raw: raw.into(),
            storage_type,
        }
    }
}
