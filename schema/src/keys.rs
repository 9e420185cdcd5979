//! Compact identifier tables.

use std::collections::HashMap;

use indexmap::IndexMap;
use token::encode_base36;

/// A bidirectional mapping between names and sequential base-36 identifiers.
///
/// Identifiers are assigned `0, 1, 2, ...` in insertion order, so the same
/// sequence of names always yields the same table. Reordering names changes
/// every identifier after the first moved name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyTable {
    to_id: IndexMap<String, String>,
    to_index: HashMap<String, usize>,
}

impl KeyTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from names in order.
    ///
    /// Returns the first duplicated name on failure.
    pub fn from_names<I, S>(names: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::new();
        for name in names {
            table.push(name.into())?;
        }
        Ok(table)
    }

    /// Appends a name and assigns it the next identifier.
    pub fn push(&mut self, name: String) -> Result<&str, String> {
        if self.to_id.contains_key(&name) {
            return Err(name);
        }
        let index = self.to_id.len();
        let id = encode_base36(i64::try_from(index).unwrap_or(i64::MAX));
        self.to_index.insert(id.clone(), index);
        self.to_id.insert(name, id);
        Ok(self.to_id[index].as_str())
    }

    /// Returns the identifier assigned to `name`.
    #[must_use]
    pub fn id_of(&self, name: &str) -> Option<&str> {
        self.to_id.get(name).map(String::as_str)
    }

    /// Returns the name that owns identifier `id`.
    ///
    /// Only the canonical spelling matches: `"00"` is not identifier `"0"`.
    #[must_use]
    pub fn name_of(&self, id: &str) -> Option<&str> {
        let index = *self.to_index.get(id)?;
        self.to_id.get_index(index).map(|(name, _)| name.as_str())
    }

    /// Returns the position of `name`.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.to_id.get_index_of(name)
    }

    /// Returns `true` if `name` is in the table.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.to_id.contains_key(name)
    }

    /// Returns the number of names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.to_id.len()
    }

    /// Returns `true` if the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_id.is_empty()
    }

    /// Iterates over `(name, id)` pairs in assignment order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.to_id
            .iter()
            .map(|(name, id)| (name.as_str(), id.as_str()))
    }

    /// Iterates over names in assignment order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.to_id.keys().map(String::as_str)
    }
}
