use crate::arena::HeapId;

/// A mutable sequence of values.
///
/// Each stored id owns one reference on its slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct List {
    items: Vec<HeapId>,
}

impl List {
    pub(crate) fn new(items: Vec<HeapId>) -> Self {
        Self { items }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub(crate) fn items(&self) -> &[HeapId] {
        &self.items
    }

    pub(crate) fn items_mut(&mut self) -> &mut [HeapId] {
        &mut self.items
    }

    pub(crate) fn get(&self, index: usize) -> Option<HeapId> {
        self.items.get(index).copied()
    }

    pub(crate) fn push(&mut self, id: HeapId) {
        self.items.push(id);
    }
}

/// An immutable sequence of values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tuple {
    items: Vec<HeapId>,
}

impl Tuple {
    pub(crate) fn new(items: Vec<HeapId>) -> Self {
        Self { items }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub(crate) fn items(&self) -> &[HeapId] {
        &self.items
    }

    pub(crate) fn items_mut(&mut self) -> &mut [HeapId] {
        &mut self.items
    }

    pub(crate) fn get(&self, index: usize) -> Option<HeapId> {
        self.items.get(index).copied()
    }
}
