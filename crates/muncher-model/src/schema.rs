//! The immutable schema model.

use std::borrow::Cow;
use std::collections::BTreeMap;

use crate::field::FieldDefinition;
use crate::layout::LayoutProfile;
use crate::table::{LookupTable, TableId, TableRegistry};
use crate::value::Value;

/// Ordered collection of every canonical field plus the tables and layout
/// profiles they reference.
///
/// Built once per process by the schema builder and read-only afterwards, so it
/// can be shared freely between row workers.
#[derive(Debug, Clone, Default)]
pub struct SchemaModel {
    fields: Vec<FieldDefinition>,
    /// Lowercased canonical name -> index into `fields`.
    index: BTreeMap<String, usize>,
    tables: TableRegistry,
    layouts: BTreeMap<String, LayoutProfile>,
    fingerprint: Option<String>,
}

impl SchemaModel {
    /// Assemble a model from already-validated parts.
    ///
    /// Canonical names are expected to be unique; the schema builder enforces this.
    pub fn new(
        fields: Vec<FieldDefinition>,
        tables: TableRegistry,
        layouts: BTreeMap<String, LayoutProfile>,
    ) -> Self {
        let index = fields
            .iter()
            .enumerate()
            .map(|(idx, field)| (field.name.to_lowercase(), idx))
            .collect();
        Self {
            fields,
            index,
            tables,
            layouts,
            fingerprint: None,
        }
    }

    /// Attach the fingerprint of the schema file this model was built from.
    #[must_use]
    pub fn with_fingerprint(mut self, fingerprint: impl Into<String>) -> Self {
        self.fingerprint = Some(fingerprint.into());
        self
    }

    pub fn fingerprint(&self) -> Option<&str> {
        self.fingerprint.as_deref()
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    /// Look up a field by canonical name (case-insensitive).
    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.field_index(name).map(|idx| &self.fields[idx])
    }

    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.index.get(&name.trim().to_lowercase()).copied()
    }

    pub fn tables(&self) -> &TableRegistry {
        &self.tables
    }

    pub fn table(&self, id: TableId) -> Option<&LookupTable> {
        self.tables.get(id)
    }

    pub fn layouts(&self) -> &BTreeMap<String, LayoutProfile> {
        &self.layouts
    }

    /// Profile for a layout identifier; unknown layouts get a default profile.
    pub fn layout(&self, id: &str) -> Cow<'_, LayoutProfile> {
        match self.layouts.get(id) {
            Some(profile) => Cow::Borrowed(profile),
            None => Cow::Owned(LayoutProfile::new(id)),
        }
    }

    /// Value-alias table of a field.
    pub fn value_aliases(&self, field: &FieldDefinition) -> Option<&LookupTable> {
        field.value_aliases.and_then(|id| self.tables.get(id))
    }

    /// Value-label table of a field.
    pub fn value_labels(&self, field: &FieldDefinition) -> Option<&LookupTable> {
        field.value_labels.and_then(|id| self.tables.get(id))
    }

    /// Render a canonical value for presentation.
    ///
    /// Uses the field's value-label table when it has an entry for the value,
    /// otherwise the value's text form. Absent values render as an empty string.
    pub fn display_value(&self, field: &FieldDefinition, value: &Value) -> String {
        let Some(text) = value.as_text() else {
            return String::new();
        };
        if let Some(labels) = self.value_labels(field) {
            if let Some(label) = labels.lookup(&text) {
                return label.to_string();
            }
            if let Value::Boolean(flag) = value
                && let Some(label) = labels.lookup(if *flag { "1" } else { "0" })
            {
                return label.to_string();
            }
        }
        text
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
