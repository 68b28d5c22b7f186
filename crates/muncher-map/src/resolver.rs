//! Header to field resolution.

use std::collections::BTreeMap;

use serde::Serialize;

use muncher_model::{SchemaModel, fold_key};

use crate::error::ResolverError;

/// Normalize a header for comparison: trim and case-fold.
pub fn normalize_header(raw: &str) -> String {
    fold_key(raw)
}

/// A canonical field with no column in the sheet and no layout constant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingField {
    pub field: String,
    pub required: bool,
}

/// Result of resolving one sheet's headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    pub layout: String,
    /// Column position -> index of the canonical field it carries.
    columns: Vec<Option<usize>>,
    /// Field index -> column position.
    by_field: BTreeMap<usize, usize>,
    /// Non-blank headers matching no field, as seen in the sheet.
    pub unmapped: Vec<String>,
    /// Fields without a column, in schema order.
    pub missing: Vec<MissingField>,
}

impl ColumnMapping {
    /// Column carrying the field at `field_index`.
    pub fn column_for(&self, field_index: usize) -> Option<usize> {
        self.by_field.get(&field_index).copied()
    }

    /// Field carried by the column at `position`.
    pub fn field_at(&self, position: usize) -> Option<usize> {
        self.columns.get(position).copied().flatten()
    }

    pub fn mapped_count(&self) -> usize {
        self.by_field.len()
    }

    /// Required fields without a column.
    pub fn missing_required(&self) -> impl Iterator<Item = &MissingField> {
        self.missing.iter().filter(|missing| missing.required)
    }
}

/// Resolves sheet headers against a schema.
pub struct ColumnResolver<'a> {
    schema: &'a SchemaModel,
}

impl<'a> ColumnResolver<'a> {
    pub fn new(schema: &'a SchemaModel) -> Self {
        Self { schema }
    }

    /// Map each header of a sheet in `layout` to at most one canonical field.
    ///
    /// A layout alias takes precedence over a canonical-name match. Two
    /// headers landing on the same field is an error; headers matching nothing
    /// are listed in [`ColumnMapping::unmapped`].
    pub fn resolve(&self, layout: &str, headers: &[String]) -> Result<ColumnMapping, ResolverError> {
        let mut by_alias = BTreeMap::new();
        let mut by_name = BTreeMap::new();
        for (idx, field) in self.schema.fields().iter().enumerate() {
            if let Some(alias) = field.alias_for(layout) {
                by_alias.insert(normalize_header(alias), idx);
            }
            by_name.insert(normalize_header(&field.name), idx);
        }

        let mut columns = Vec::with_capacity(headers.len());
        let mut by_field: BTreeMap<usize, usize> = BTreeMap::new();
        let mut unmapped = Vec::new();

        for (position, header) in headers.iter().enumerate() {
            let key = normalize_header(header);
            if key.is_empty() {
                columns.push(None);
                continue;
            }
            let Some(&field_index) = by_alias.get(&key).or_else(|| by_name.get(&key)) else {
                unmapped.push(header.trim().to_string());
                columns.push(None);
                continue;
            };
            if let Some(&first) = by_field.get(&field_index) {
                return Err(ResolverError::AmbiguousField {
                    layout: layout.to_string(),
                    field: self.schema.fields()[field_index].name.clone(),
                    first: headers[first].trim().to_string(),
                    second: header.trim().to_string(),
                });
            }
            by_field.insert(field_index, position);
            columns.push(Some(field_index));
        }

        let profile = self.schema.layout(layout);
        let missing = self
            .schema
            .fields()
            .iter()
            .enumerate()
            .filter(|(idx, field)| {
                !by_field.contains_key(idx) && profile.constant_for(&field.name).is_none()
            })
            .map(|(_, field)| MissingField {
                field: field.name.clone(),
                required: field.required,
            })
            .collect();

        tracing::debug!(
            layout,
            columns = headers.len(),
            mapped = by_field.len(),
            unmapped = unmapped.len(),
            "columns resolved"
        );

        Ok(ColumnMapping {
            layout: layout.to_string(),
            columns,
            by_field,
            unmapped,
            missing,
        })
    }
}
