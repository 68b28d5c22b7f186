/// Ingestion policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestOptions {
    /// Reject every row of a sheet that has no column for a required field.
    ///
    /// When false the field is stored as absent and only reported per sheet.
    pub strict_columns: bool,
}

impl IngestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_strict_columns(mut self, strict_columns: bool) -> Self {
        self.strict_columns = strict_columns;
        self
    }
}
