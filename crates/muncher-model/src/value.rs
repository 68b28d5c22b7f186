//! Normalized canonical values.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

/// A canonical typed value.
///
/// `Absent` marks a blank cell or a value that could not be normalized; it is
/// distinct from `Text("")` and serializes as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Absent,
    Text(String),
    Date(NaiveDate),
    Integer(i64),
    Boolean(bool),
}

impl Value {
    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    /// The value cast to text, as seen by pattern checks. `None` when absent.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Value::Absent => None,
            Value::Text(text) => Some(text.clone()),
            Value::Date(date) => Some(date.format("%Y-%m-%d").to_string()),
            Value::Integer(number) => Some(number.to_string()),
            Value::Boolean(flag) => Some(flag.to_string()),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(date) => Some(*date),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(number) => Some(*number),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(flag) => Some(*flag),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_text() {
            Some(text) => f.write_str(&text),
            None => Ok(()),
        }
    }
}
