//! Canonical field definitions.
//!
//! A [`FieldDefinition`] describes one attribute of a patient-procedure record:
//! how it is stored, which headers each source layout uses for it, which lookup
//! tables translate its raw tokens, and which checks run on its normalized value.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::table::TableId;

/// Storage type of a canonical field. Governs value coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageType {
    /// Variable-length text.
    Text,
    /// Text with a declared upper bound (`char(n)` columns such as the NHS number).
    FixedText,
    /// Calendar date without time.
    Date,
    /// Coded values and boolean-like flags stored as a 16-bit integer.
    SmallInteger,
    /// 64-bit integer.
    Integer,
    /// True/false flag.
    Boolean,
}

impl StorageType {
    /// Returns true for types where `max_length` applies.
    pub fn is_text_like(&self) -> bool {
        matches!(self, StorageType::Text | StorageType::FixedText)
    }

    /// Canonical token used in schema files and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageType::Text => "text",
            StorageType::FixedText => "fixed_text",
            StorageType::Date => "date",
            StorageType::SmallInteger => "small_integer",
            StorageType::Integer => "integer",
            StorageType::Boolean => "boolean",
        }
    }

    /// Human-readable description used in "could not parse" messages.
    pub fn describe(&self) -> &'static str {
        match self {
            StorageType::Text | StorageType::FixedText => "text",
            StorageType::Date => "a date",
            StorageType::SmallInteger => "a small integer",
            StorageType::Integer => "an integer",
            StorageType::Boolean => "a yes/no value",
        }
    }
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageType {
    type Err = String;

    /// Parse a storage type token (case-insensitive, `-` and `_` interchangeable).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        match normalized.as_str() {
            "text" | "string" | "varchar" => Ok(StorageType::Text),
            "char" | "fixed_text" | "fixed_length_text" => Ok(StorageType::FixedText),
            "date" => Ok(StorageType::Date),
            "smallint" | "small_integer" => Ok(StorageType::SmallInteger),
            "int" | "integer" => Ok(StorageType::Integer),
            "bool" | "boolean" => Ok(StorageType::Boolean),
            _ => Err(format!("Unknown storage type: {}", s)),
        }
    }
}

/// A compiled pattern check.
///
/// The declared pattern must match the whole value, so it is compiled wrapped in
/// `^(?:...)$` while the declared source is kept for reporting.
#[derive(Debug, Clone)]
pub struct PatternRule {
    source: String,
    anchored: Regex,
}

impl PatternRule {
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        let anchored = Regex::new(&format!("^(?:{source})$"))?;
        Ok(Self {
            source: source.to_string(),
            anchored,
        })
    }

    /// The pattern as written in the schema file.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns true if the pattern matches the entire text.
    pub fn is_full_match(&self, text: &str) -> bool {
        self.anchored.is_match(text)
    }
}

/// Rule payload of a check, one variant per check kind.
#[derive(Debug, Clone)]
pub enum CheckRule {
    Pattern(PatternRule),
}

/// A declared validation rule with its user-facing message.
#[derive(Debug, Clone)]
pub struct Check {
    pub rule: CheckRule,
    pub message: String,
}

impl Check {
    pub fn pattern(rule: PatternRule, message: impl Into<String>) -> Self {
        Self {
            rule: CheckRule::Pattern(rule),
            message: message.into(),
        }
    }

    /// Kind token as written in the schema file.
    pub fn kind(&self) -> &'static str {
        match self.rule {
            CheckRule::Pattern(_) => "pattern",
        }
    }

    /// Rule payload as written in the schema file.
    pub fn payload(&self) -> &str {
        match &self.rule {
            CheckRule::Pattern(pattern) => pattern.source(),
        }
    }
}

/// One canonical attribute of a patient-procedure record.
#[derive(Debug, Clone)]
pub struct FieldDefinition {
    /// Unique identifier, used as the storage column key.
    pub name: String,
    pub storage_type: StorageType,
    /// Upper bound for text-like types. Violations are validation issues.
    pub max_length: Option<usize>,
    /// Presentation label. Never used for header matching.
    pub label: Option<String>,
    /// Whether a value must be present for the record to be complete.
    pub required: bool,
    /// Layout identifier -> header used by that layout.
    pub source_aliases: BTreeMap<String, String>,
    /// Raw token -> canonical intermediate value, applied before coercion.
    pub value_aliases: Option<TableId>,
    /// Canonical value -> display label, presentation only.
    pub value_labels: Option<TableId>,
    /// Extra chrono formats tried before the default date formats.
    pub date_formats: Vec<String>,
    pub checks: Vec<Check>,
    /// Documentation only.
    pub notes: Option<String>,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>, storage_type: StorageType) -> Self {
        Self {
            name: name.into(),
            storage_type,
            max_length: None,
            label: None,
            required: false,
            source_aliases: BTreeMap::new(),
            value_aliases: None,
            value_labels: None,
            date_formats: Vec::new(),
            checks: Vec::new(),
            notes: None,
        }
    }

    /// The header this field uses in the given layout, if it declares one.
    pub fn alias_for(&self, layout: &str) -> Option<&str> {
        self.source_aliases.get(layout).map(String::as_str)
    }

    /// `max_length` when it applies to the storage type.
    pub fn effective_max_length(&self) -> Option<usize> {
        if self.storage_type.is_text_like() {
            self.max_length
        } else {
            None
        }
    }

    /// Label for presentation, falling back to the canonical name.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }
}
