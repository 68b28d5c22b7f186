//! Serde shapes of the YAML schema file.
//!
//! These mirror the file one-to-one and carry no checks beyond what serde
//! enforces (unknown keys are rejected). [`crate::build_schema`] turns a
//! document into a [`muncher_model::SchemaModel`].

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::SchemaError;

/// Top-level schema document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaDocument {
    /// Named lookup tables shared between fields.
    #[serde(default)]
    pub tables: BTreeMap<String, serde_yaml::Mapping>,
    /// Layout identifier -> sheet-level settings.
    #[serde(default)]
    pub layouts: BTreeMap<String, LayoutDocument>,
    /// Canonical fields in storage order.
    #[serde(default)]
    pub fields: Vec<FieldDocument>,
}

impl SchemaDocument {
    /// Parse a document from YAML text.
    pub fn from_yaml_str(text: &str) -> Result<Self, SchemaError> {
        Self::parse(text, "<inline>")
    }

    pub(crate) fn parse(text: &str, origin: &str) -> Result<Self, SchemaError> {
        serde_yaml::from_str(text).map_err(|source| SchemaError::Yaml {
            origin: origin.to_string(),
            source,
        })
    }
}

/// One entry of the `fields` list.
///
/// `name` and `type` are optional here so the builder can report a missing
/// one with the field's position instead of a bare serde error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldDocument {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub storage_type: Option<String>,
    #[serde(default)]
    pub max_length: Option<usize>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub required: bool,
    /// Layout identifier -> header.
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
    #[serde(default)]
    pub value_aliases: Option<TableRef>,
    #[serde(default)]
    pub value_labels: Option<TableRef>,
    #[serde(default)]
    pub date_formats: Vec<String>,
    #[serde(default)]
    pub checks: Vec<CheckDocument>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A table reference: the name of an entry under `tables`, or an inline mapping.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TableRef {
    Named(String),
    Inline(serde_yaml::Mapping),
}

/// A declared validation rule, tagged by `kind`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum CheckDocument {
    Pattern { rule: String, message: String },
}

/// Sheet-level settings of one source layout.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayoutDocument {
    /// Sheet names to process; empty means every sheet.
    #[serde(default)]
    pub sheets: Vec<String>,
    /// 1-based heading row; 0 when the export has none.
    #[serde(default = "default_header_row")]
    pub header_row: usize,
    /// Canonical field name -> value applied to every row.
    #[serde(default)]
    pub constants: BTreeMap<String, serde_yaml::Value>,
    /// Fields whose blank cells inherit the previous row's value.
    #[serde(default)]
    pub fill_down: Vec<String>,
    /// Fill-down fields that take the next row's value first, for blocks whose
    /// value sits in their second row. Implies `fill_down`.
    #[serde(default)]
    pub fill_down_next_first: Vec<String>,
}

impl Default for LayoutDocument {
    fn default() -> Self {
        Self {
            sheets: Vec::new(),
            header_row: default_header_row(),
            constants: BTreeMap::new(),
            fill_down: Vec::new(),
            fill_down_next_first: Vec::new(),
        }
    }
}

fn default_header_row() -> usize {
    1
}

/// Render a YAML scalar as text. `None` for nulls, sequences and mappings.
pub(crate) fn scalar_text(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(text) => Some(text.clone()),
        serde_yaml::Value::Number(number) => Some(number.to_string()),
        serde_yaml::Value::Bool(flag) => Some(flag.to_string()),
        serde_yaml::Value::Tagged(tagged) => scalar_text(&tagged.value),
        _ => None,
    }
}
