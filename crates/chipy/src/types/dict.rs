use indexmap::IndexMap;

use crate::arena::HeapId;

/// Insertion-ordered mapping from string keys to values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dictionary {
    entries: IndexMap<String, HeapId>,
}

impl Dictionary {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub(crate) fn get(&self, key: &str) -> Option<HeapId> {
        self.entries.get(key).copied()
    }

    /// Inserts or replaces `key`, returning the id it previously mapped to.
    ///
    /// Replacing keeps the key's original position.
    pub(crate) fn insert(&mut self, key: String, id: HeapId) -> Option<HeapId> {
        self.entries.insert(key, id)
    }

    pub(crate) fn entries(&self) -> impl Iterator<Item = (&str, HeapId)> {
        self.entries.iter().map(|(key, id)| (key.as_str(), *id))
    }

    pub(crate) fn ids_mut(&mut self) -> impl Iterator<Item = &mut HeapId> {
        self.entries.values_mut()
    }
}

/// A view over the `(key, value)` pairs of a dictionary.
///
/// The view holds a reference on the dictionary, so it keeps it alive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictItems {
    dict: HeapId,
}

impl DictItems {
    pub(crate) fn new(dict: HeapId) -> Self {
        Self { dict }
    }

    pub(crate) fn dict(&self) -> HeapId {
        self.dict
    }

    pub(crate) fn dict_mut(&mut self) -> &mut HeapId {
        &mut self.dict
    }
}
