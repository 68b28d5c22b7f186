//! Shared lookup tables.
//!
//! Value-alias tables translate raw input tokens into canonical intermediate
//! values; value-label tables translate canonical values into display strings.
//! Both are defined once in a [`TableRegistry`] and referenced from fields by
//! [`TableId`], so a table shared by several fields has a single definition.

use std::collections::BTreeMap;

/// Case-fold and trim a token for table lookup.
pub fn fold_key(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Handle to a table inside a [`TableRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TableId(usize);

/// A named token -> value lookup. Keys are stored folded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTable {
    name: String,
    entries: BTreeMap<String, String>,
}

impl LookupTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Insert an entry, returning the value previously stored under the folded key.
    pub fn insert(&mut self, key: &str, value: impl Into<String>) -> Option<String> {
        self.entries.insert(fold_key(key), value.into())
    }

    /// Look up a raw token, ignoring case and surrounding whitespace.
    pub fn lookup(&self, raw: &str) -> Option<&str> {
        self.entries.get(&fold_key(raw)).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Registry of all lookup tables of a schema.
#[derive(Debug, Clone, Default)]
pub struct TableRegistry {
    tables: Vec<LookupTable>,
    by_name: BTreeMap<String, TableId>,
}

impl TableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table. A later table with the same name shadows the earlier one by name,
    /// but both remain addressable by their ids.
    pub fn register(&mut self, table: LookupTable) -> TableId {
        let id = TableId(self.tables.len());
        self.by_name.insert(table.name.clone(), id);
        self.tables.push(table);
        id
    }

    pub fn get(&self, id: TableId) -> Option<&LookupTable> {
        self.tables.get(id.0)
    }

    pub fn id_of(&self, name: &str) -> Option<TableId> {
        self.by_name.get(name).copied()
    }

    pub fn by_name(&self, name: &str) -> Option<&LookupTable> {
        self.id_of(name).and_then(|id| self.get(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = (TableId, &LookupTable)> {
        self.tables
            .iter()
            .enumerate()
            .map(|(idx, table)| (TableId(idx), table))
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
