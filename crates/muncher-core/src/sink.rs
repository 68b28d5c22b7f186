//! Persistence sink port.

use muncher_model::{CanonicalRecord, ValidationIssue};

/// A failed write to a persistence sink.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("failed to store record: {message}")]
    Rejected { message: String },

    #[error("sink I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode record: {0}")]
    Encode(String),
}

impl SinkError {
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }
}

/// Write-only destination for assembled records.
///
/// Every record is written with the issues found on its row, including
/// records that carry issues. A failed write is reported for that row only;
/// the assembler carries on with the next one and never retries.
pub trait RecordSink {
    fn write(&mut self, record: &CanonicalRecord, issues: &[ValidationIssue]) -> Result<(), SinkError>;
}

impl<S: RecordSink + ?Sized> RecordSink for &mut S {
    fn write(&mut self, record: &CanonicalRecord, issues: &[ValidationIssue]) -> Result<(), SinkError> {
        (**self).write(record, issues)
    }
}

impl<S: RecordSink + ?Sized> RecordSink for Box<S> {
    fn write(&mut self, record: &CanonicalRecord, issues: &[ValidationIssue]) -> Result<(), SinkError> {
        (**self).write(record, issues)
    }
}

/// A record stored by [`MemorySink`].
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
    pub record: CanonicalRecord,
    pub issues: Vec<ValidationIssue>,
}

/// Sink that keeps every record in memory, in write order.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    stored: Vec<StoredRecord>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stored(&self) -> &[StoredRecord] {
        &self.stored
    }

    pub fn records(&self) -> impl Iterator<Item = &CanonicalRecord> {
        self.stored.iter().map(|stored| &stored.record)
    }

    pub fn into_stored(self) -> Vec<StoredRecord> {
        self.stored
    }

    pub fn len(&self) -> usize {
        self.stored.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stored.is_empty()
    }
}

impl RecordSink for MemorySink {
    fn write(&mut self, record: &CanonicalRecord, issues: &[ValidationIssue]) -> Result<(), SinkError> {
        self.stored.push(StoredRecord {
            record: record.clone(),
            issues: issues.to_vec(),
        });
        Ok(())
    }
}
