//! Document checking and [`SchemaModel`] construction.

use std::collections::{BTreeMap, BTreeSet};

use muncher_model::{
    Check, FieldDefinition, LayoutProfile, LookupTable, PatternRule, SchemaModel, StorageType,
    TableId, TableRegistry, fold_key,
};

use crate::document::{CheckDocument, FieldDocument, LayoutDocument, SchemaDocument, TableRef, scalar_text};
use crate::error::{SchemaError, SchemaWarning};

/// A built schema together with the non-fatal findings made while building it.
#[derive(Debug, Clone)]
pub struct BuiltSchema {
    pub schema: SchemaModel,
    pub warnings: Vec<SchemaWarning>,
}

/// Check a parsed document and build the schema model.
///
/// Fails on the first fatal problem. Warnings are logged and returned.
pub fn build_schema(document: &SchemaDocument) -> Result<BuiltSchema, SchemaError> {
    let mut tables = TableRegistry::new();
    for (name, mapping) in &document.tables {
        tables.register(table_from_mapping(name, mapping)?);
    }

    let mut warnings = Vec::new();
    let mut used_tables = BTreeSet::new();
    let mut positions: BTreeMap<String, usize> = BTreeMap::new();
    let mut fields = Vec::with_capacity(document.fields.len());

    for (idx, doc) in document.fields.iter().enumerate() {
        let position = idx + 1;
        let field = build_field(doc, position, &mut tables, &mut used_tables, &mut warnings)?;
        let key = field.name.to_lowercase();
        if let Some(first) = positions.get(&key) {
            return Err(SchemaError::DuplicateName {
                name: field.name,
                first: *first,
                second: position,
            });
        }
        positions.insert(key, position);
        fields.push(field);
    }

    check_alias_collisions(&fields)?;

    let mut layouts = BTreeMap::new();
    for (id, doc) in &document.layouts {
        layouts.insert(id.clone(), build_layout(id, doc, &fields)?);
    }

    for name in document.tables.keys() {
        if !used_tables.contains(name) {
            warnings.push(SchemaWarning::UnusedTable {
                table: name.clone(),
            });
        }
    }

    for warning in &warnings {
        tracing::warn!(%warning, "schema warning");
    }
    tracing::debug!(
        fields = fields.len(),
        tables = tables.len(),
        layouts = layouts.len(),
        "schema built"
    );

    Ok(BuiltSchema {
        schema: SchemaModel::new(fields, tables, layouts),
        warnings,
    })
}

fn build_field(
    doc: &FieldDocument,
    position: usize,
    tables: &mut TableRegistry,
    used_tables: &mut BTreeSet<String>,
    warnings: &mut Vec<SchemaWarning>,
) -> Result<FieldDefinition, SchemaError> {
    let name = doc
        .name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or(SchemaError::MissingName { position })?
        .to_string();

    let raw_type = doc
        .storage_type
        .as_deref()
        .ok_or_else(|| SchemaError::MissingType {
            field: name.clone(),
        })?;
    let storage_type: StorageType =
        raw_type
            .parse()
            .map_err(|_: String| SchemaError::UnknownType {
                field: name.clone(),
                value: raw_type.to_string(),
            })?;

    let mut field = FieldDefinition::new(name, storage_type);

    if let Some(max_length) = doc.max_length {
        if storage_type.is_text_like() {
            field.max_length = Some(max_length);
        } else {
            warnings.push(SchemaWarning::MaxLengthIgnored {
                field: field.name.clone(),
                storage_type,
            });
        }
    }

    field.label = doc.label.clone();
    field.required = doc.required;
    field.notes = doc.notes.clone();
    field.date_formats = doc.date_formats.clone();
    field.source_aliases = doc
        .aliases
        .iter()
        .map(|(layout, header)| (layout.trim().to_string(), header.trim().to_string()))
        .collect();

    if let Some(reference) = &doc.value_aliases {
        field.value_aliases = Some(resolve_table(
            &field.name,
            "value_aliases",
            reference,
            tables,
            used_tables,
        )?);
    }
    if let Some(reference) = &doc.value_labels {
        field.value_labels = Some(resolve_table(
            &field.name,
            "value_labels",
            reference,
            tables,
            used_tables,
        )?);
    }

    for check in &doc.checks {
        match check {
            CheckDocument::Pattern { rule, message } => {
                let pattern =
                    PatternRule::new(rule).map_err(|source| SchemaError::InvalidPattern {
                        field: field.name.clone(),
                        pattern: rule.clone(),
                        source,
                    })?;
                field.checks.push(Check::pattern(pattern, message.clone()));
            }
        }
    }

    Ok(field)
}

/// Resolve a field's table reference. Inline tables are registered under
/// `<field>.<role>`.
fn resolve_table(
    field: &str,
    role: &str,
    reference: &TableRef,
    tables: &mut TableRegistry,
    used_tables: &mut BTreeSet<String>,
) -> Result<TableId, SchemaError> {
    match reference {
        TableRef::Named(name) => {
            let name = name.trim();
            let id = tables
                .id_of(name)
                .ok_or_else(|| SchemaError::UnresolvedTable {
                    field: field.to_string(),
                    table: name.to_string(),
                })?;
            used_tables.insert(name.to_string());
            Ok(id)
        }
        TableRef::Inline(mapping) => {
            let table = table_from_mapping(&format!("{field}.{role}"), mapping)?;
            Ok(tables.register(table))
        }
    }
}

fn table_from_mapping(name: &str, mapping: &serde_yaml::Mapping) -> Result<LookupTable, SchemaError> {
    let mut table = LookupTable::new(name);
    for (key, value) in mapping {
        let (Some(key), Some(value)) = (scalar_text(key), scalar_text(value)) else {
            return Err(SchemaError::NonScalarTableEntry {
                table: name.to_string(),
            });
        };
        if let Some(previous) = table.insert(&key, value.clone())
            && previous != value
        {
            return Err(SchemaError::ConflictingTableEntry {
                table: name.to_string(),
                key: fold_key(&key),
                first: previous,
                second: value,
            });
        }
    }
    Ok(table)
}

/// Two fields claiming the same normalized header within one layout would make
/// column resolution ambiguous for every sheet of that layout.
fn check_alias_collisions(fields: &[FieldDefinition]) -> Result<(), SchemaError> {
    let mut claimed: BTreeMap<(&str, String), &str> = BTreeMap::new();
    for field in fields {
        for (layout, header) in &field.source_aliases {
            let key = (layout.as_str(), fold_key(header));
            if let Some(first) = claimed.get(&key) {
                return Err(SchemaError::AmbiguousAlias {
                    layout: layout.clone(),
                    header: header.clone(),
                    first: (*first).to_string(),
                    second: field.name.clone(),
                });
            }
            claimed.insert(key, &field.name);
        }
    }
    Ok(())
}

fn build_layout(
    id: &str,
    doc: &LayoutDocument,
    fields: &[FieldDefinition],
) -> Result<LayoutProfile, SchemaError> {
    let canonical = |name: &str, setting: &'static str| {
        fields
            .iter()
            .find(|field| field.name.eq_ignore_ascii_case(name.trim()))
            .map(|field| field.name.clone())
            .ok_or_else(|| SchemaError::UnknownLayoutField {
                layout: id.to_string(),
                field: name.to_string(),
                setting,
            })
    };

    let mut profile = LayoutProfile::new(id);
    profile.sheets = doc.sheets.iter().map(|sheet| sheet.trim().to_string()).collect();
    profile.header_row = doc.header_row;

    for (name, value) in &doc.constants {
        let field = canonical(name, "constants")?;
        let value = scalar_text(value).ok_or_else(|| SchemaError::NonScalarConstant {
            layout: id.to_string(),
            field: field.clone(),
        })?;
        profile.constants.insert(field, value);
    }
    for name in &doc.fill_down {
        profile.fill_down.insert(canonical(name, "fill_down")?);
    }
    for name in &doc.fill_down_next_first {
        let field = canonical(name, "fill_down_next_first")?;
        profile.fill_down.insert(field.clone());
        profile.fill_down_next_first.insert(field);
    }
    Ok(profile)
}
