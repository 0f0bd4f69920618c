use crate::{
    arena::{Arena, ArenaId, HeapId},
    resource::ResourceTracker,
    tracer::ArenaTracer,
};

/// Opaque handle to a value living in an [`Arena`].
///
/// A handle records the arena that constructed the value and the slot it
/// occupies. It is the unit of application-level sharing: each live handle
/// accounts for one reference on its slot.
///
/// NOTE: `Clone` is intentionally NOT derived. Use [`Value::clone_with_arena`]
/// to take another reference, and [`Value::drop_with_arena`] to give one back.
/// Dropping a handle without returning it only delays reclamation until the
/// next [`Arena::collect_garbage`]; the arena, not the handle count, decides
/// when storage is freed.
///
/// `PartialEq` compares identity (same slot of the same arena), not payloads.
/// Use [`Arena::equals`] for value comparison.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Value {
    arena: ArenaId,
    id: HeapId,
    generation: u32,
}

impl Value {
    pub(crate) fn new(arena: ArenaId, id: HeapId, generation: u32) -> Self {
        Self { arena, id, generation }
    }

    /// The arena this value was constructed in. Fixed for the value's lifetime.
    #[must_use]
    pub fn owning_arena(&self) -> ArenaId {
        self.arena
    }

    pub(crate) fn heap_id(&self) -> HeapId {
        self.id
    }

    pub(crate) fn generation(&self) -> u32 {
        self.generation
    }

    /// Takes another reference to the same value.
    ///
    /// # Panics
    /// Panics if the handle does not belong to `arena` or its slot has been reclaimed.
    #[must_use]
    pub fn clone_with_arena(&self, arena: &mut Arena<impl ResourceTracker, impl ArenaTracer>) -> Self {
        arena.clone_handle(self)
    }

    /// Gives this reference back to the arena.
    ///
    /// The slot is not freed here even if this was the last reference; see
    /// [`Arena::collect_unreferenced`].
    pub fn drop_with_arena(self, arena: &mut Arena<impl ResourceTracker, impl ArenaTracer>) {
        arena.release(self);
    }
}
