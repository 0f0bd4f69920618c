use indexmap::IndexMap;

use crate::arena::HeapId;

/// A loaded module and its top-level members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    name: String,
    members: IndexMap<String, HeapId>,
}

impl Module {
    pub(crate) fn new(name: String) -> Self {
        Self {
            name,
            members: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    #[must_use]
    pub fn has_member(&self, name: &str) -> bool {
        self.members.contains_key(name)
    }

    pub(crate) fn get(&self, name: &str) -> Option<HeapId> {
        self.members.get(name).copied()
    }

    pub(crate) fn insert(&mut self, name: String, id: HeapId) -> Option<HeapId> {
        self.members.insert(name, id)
    }

    pub(crate) fn ids(&self) -> impl Iterator<Item = HeapId> + '_ {
        self.members.values().copied()
    }

    pub(crate) fn ids_mut(&mut self) -> impl Iterator<Item = &mut HeapId> {
        self.members.values_mut()
    }
}
