//! JSON-lines record sink.

use std::collections::BTreeMap;
use std::io::Write;

use serde::Serialize;

use muncher_core::{RecordSink, SinkError};
use muncher_model::{CanonicalRecord, SchemaModel, ValidationIssue};

#[derive(Serialize)]
struct JsonLine<'a> {
    #[serde(flatten)]
    record: &'a CanonicalRecord,
    /// Display labels of coded values, for fields with a value-label table.
    labels: BTreeMap<&'a str, String>,
    issues: &'a [ValidationIssue],
}

/// Writes one JSON object per record: the record's fields, the display labels
/// of its coded values, and its issues.
pub struct JsonLinesSink<'s, W: Write> {
    schema: &'s SchemaModel,
    writer: W,
    written: usize,
}

impl<'s, W: Write> JsonLinesSink<'s, W> {
    pub fn new(schema: &'s SchemaModel, writer: W) -> Self {
        Self {
            schema,
            writer,
            written: 0,
        }
    }

    pub fn written(&self) -> usize {
        self.written
    }

    /// Flush and return the underlying writer.
    pub fn finish(mut self) -> std::io::Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }

    fn labels<'r>(&self, record: &'r CanonicalRecord) -> BTreeMap<&'r str, String> {
        record
            .values
            .iter()
            .filter(|(_, value)| !value.is_absent())
            .filter_map(|(name, value)| {
                let field = self.schema.field(name)?;
                self.schema.value_labels(field)?;
                Some((name.as_str(), self.schema.display_value(field, value)))
            })
            .collect()
    }
}

impl<W: Write> RecordSink for JsonLinesSink<'_, W> {
    fn write(&mut self, record: &CanonicalRecord, issues: &[ValidationIssue]) -> Result<(), SinkError> {
        let line = JsonLine {
            record,
            labels: self.labels(record),
            issues,
        };
        serde_json::to_writer(&mut self.writer, &line)
            .map_err(|error| SinkError::Encode(error.to_string()))?;
        self.writer.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }
}
