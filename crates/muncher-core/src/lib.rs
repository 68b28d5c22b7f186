#![deny(unsafe_code)]

//! Record Assembler.
//!
//! Drives one workbook through column resolution, value normalization and
//! validation, row by row, and forwards every assembled record with its
//! issues to a [`RecordSink`]. What happened to each sheet and each flagged
//! row is collected in an [`IngestSummary`] for the operator.
//!
//! # Example
//!
//! ```ignore
//! use muncher_core::{IngestOptions, MemorySink, RecordAssembler};
//!
//! let assembler = RecordAssembler::new(&schema, IngestOptions::default());
//! let mut sink = MemorySink::new();
//! let summary = assembler.ingest_workbook(&workbook, &mut sink);
//! ```

pub mod assembler;
pub mod options;
pub mod sink;
pub mod summary;

pub use assembler::RecordAssembler;
pub use options::IngestOptions;
pub use sink::{MemorySink, RecordSink, SinkError, StoredRecord};
pub use summary::{IngestSummary, RowDisposition, RowOutcome, SheetOutcome, SheetStatus};
