use std::{
    collections::BTreeMap,
    fmt,
    sync::atomic::{AtomicU32, Ordering},
};

use crate::{
    error::{ValueError, ValueResult},
    resource::{NoLimitTracker, ResourceError, ResourceTracker},
    stats::ArenaStats,
    tracer::{ArenaTracer, NoopTracer},
    types::ValueData,
    value::Value,
};

static NEXT_ARENA_ID: AtomicU32 = AtomicU32::new(1);

/// Process-unique identity of an [`Arena`].
///
/// Handles record the id of the arena that built them, which is how an arena
/// recognises handles it does not own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArenaId(u32);

impl ArenaId {
    fn fresh() -> Self {
        Self(NEXT_ARENA_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw id.
    #[must_use]
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ArenaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "arena#{}", self.0)
    }
}

/// Slot index inside one arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HeapId(usize);

impl HeapId {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index)
    }

    /// Returns the raw index value.
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug)]
struct Slot {
    /// References held on this slot: one per live handle plus one per
    /// container entry pointing at it. Zero does not mean freed.
    refcount: usize,
    data: ValueData,
}

/// Scoped storage owning every value constructed in it.
///
/// Values live in slots addressed by index; application code holds [`Value`]
/// handles. Reference counts are bookkeeping only: a slot whose count reaches
/// zero stays live (and readable through any handle that survived) until
/// arena-level collection reclaims it, either via
/// [`collect_unreferenced`](Self::collect_unreferenced) or
/// [`collect_garbage`](Self::collect_garbage).
///
/// Freed slots go on a free list and are reused by later allocations. Each
/// reuse bumps the slot's generation so handles to the old occupant are
/// detected as stale instead of silently aliasing the new one.
///
/// All mutation goes through `&mut self`, so the single-writer rule for an
/// arena is enforced by the borrow checker. There is no internal locking.
#[derive(Debug)]
pub struct Arena<T: ResourceTracker = NoLimitTracker, Tr: ArenaTracer = NoopTracer> {
    id: ArenaId,
    entries: Vec<Option<Slot>>,
    /// Per-slot reuse counter, compared against the generation stored in handles.
    generations: Vec<u32>,
    /// IDs of freed slots available for reuse. Populated by collection, consumed by `allocate`.
    free_list: Vec<HeapId>,
    tracker: T,
    tracer: Tr,
    /// Container allocations since the last `collect_garbage`.
    allocations_since_gc: usize,
}

impl<T: ResourceTracker> Arena<T, NoopTracer> {
    /// Creates an empty arena with the given resource tracker.
    #[must_use]
    pub fn new(tracker: T) -> Self {
        Self::with_tracer(tracker, NoopTracer)
    }
}

impl<T: ResourceTracker, Tr: ArenaTracer> Arena<T, Tr> {
    /// Creates an empty arena that reports lifetime events to `tracer`.
    #[must_use]
    pub fn with_tracer(tracker: T, tracer: Tr) -> Self {
        Self {
            id: ArenaId::fresh(),
            entries: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            tracker,
            tracer,
            allocations_since_gc: 0,
        }
    }

    /// This arena's identity.
    #[must_use]
    pub fn id(&self) -> ArenaId {
        self.id
    }

    #[must_use]
    pub fn tracker(&self) -> &T {
        &self.tracker
    }

    #[must_use]
    pub fn tracer(&self) -> &Tr {
        &self.tracer
    }

    pub fn tracer_mut(&mut self) -> &mut Tr {
        &mut self.tracer
    }

    /// Places `data` in a slot and returns the first handle to it.
    pub(crate) fn allocate(&mut self, data: ValueData) -> ValueResult<Value> {
        let id = self.allocate_slot(data, 1)?;
        Ok(self.handle_for(id))
    }

    /// Places `data` in a slot with an explicit starting refcount.
    ///
    /// Returns `Err(ResourceError)` if the tracker refuses the allocation, in
    /// which case nothing is stored.
    pub(crate) fn allocate_slot(&mut self, data: ValueData, refcount: usize) -> Result<HeapId, ResourceError> {
        self.tracker.on_allocate(|| data.estimate_size())?;
        if data.is_container() {
            self.allocations_since_gc = self.allocations_since_gc.wrapping_add(1);
        }
        let value_type = data.value_type();
        let slot = Slot { refcount, data };

        let id = if let Some(id) = self.free_list.pop() {
            let index = id.index();
            self.generations[index] = self.generations[index].wrapping_add(1);
            self.entries[index] = Some(slot);
            id
        } else {
            let id = HeapId(self.entries.len());
            self.generations.push(0);
            self.entries.push(Some(slot));
            id
        };

        self.tracer.on_allocate(id.index(), value_type);
        Ok(id)
    }

    /// Builds a handle for a live slot. The caller accounts for the reference.
    pub(crate) fn handle_for(&self, id: HeapId) -> Value {
        Value::new(self.id, id, self.generations[id.index()])
    }

    /// Checks that `value` was issued by this arena and its slot is still the
    /// one the handle was issued for.
    pub(crate) fn resolve(&self, value: &Value) -> ValueResult<HeapId> {
        if value.owning_arena() != self.id {
            return Err(ValueError::ForeignHandle {
                expected: self.id,
                found: value.owning_arena(),
            });
        }
        let index = value.heap_id().index();
        let live = matches!(self.entries.get(index), Some(Some(_)));
        if live && self.generations.get(index) == Some(&value.generation()) {
            Ok(value.heap_id())
        } else {
            Err(ValueError::StaleHandle)
        }
    }

    pub(crate) fn data(&self, value: &Value) -> ValueResult<&ValueData> {
        let id = self.resolve(value)?;
        Ok(self.get(id))
    }

    pub(crate) fn data_mut(&mut self, value: &Value) -> ValueResult<&mut ValueData> {
        let id = self.resolve(value)?;
        Ok(self.get_mut(id))
    }

    /// Like [`data`](Self::data) for infallible queries.
    ///
    /// # Panics
    /// Panics with the operation name if the handle is foreign or stale.
    pub(crate) fn expect_data(&self, value: &Value, op: &'static str) -> &ValueData {
        match self.data(value) {
            Ok(data) => data,
            Err(err) => panic!("Arena::{op}: {err}"),
        }
    }

    /// Returns the data stored at a slot this arena knows to be live.
    ///
    /// # Panics
    /// Panics if the slot is missing or freed, which means a child id outlived
    /// its referent and the arena's counts are corrupt.
    pub(crate) fn get(&self, id: HeapId) -> &ValueData {
        &self
            .entries
            .get(id.index())
            .expect("Arena::get: slot missing")
            .as_ref()
            .expect("Arena::get: object already freed")
            .data
    }

    /// Mutable counterpart of [`get`](Self::get).
    ///
    /// # Panics
    /// Panics if the slot is missing or freed.
    pub(crate) fn get_mut(&mut self, id: HeapId) -> &mut ValueData {
        &mut self
            .entries
            .get_mut(id.index())
            .expect("Arena::get_mut: slot missing")
            .as_mut()
            .expect("Arena::get_mut: object already freed")
            .data
    }

    fn slot_mut(&mut self, id: HeapId) -> Option<&mut Slot> {
        self.entries.get_mut(id.index())?.as_mut()
    }

    /// Adds one reference to a live slot.
    ///
    /// # Panics
    /// Panics if the slot is missing or freed.
    pub(crate) fn inc_ref(&mut self, id: HeapId) {
        let slot = self.slot_mut(id).expect("Arena::inc_ref: object already freed");
        slot.refcount += 1;
    }

    /// Removes one reference from a slot without freeing it.
    pub(crate) fn dec_ref(&mut self, id: HeapId) {
        if let Some(slot) = self.slot_mut(id) {
            slot.refcount = slot.refcount.saturating_sub(1);
            let refcount = slot.refcount;
            self.tracer.on_release(id.index(), refcount);
        }
    }

    /// Empties a slot and puts it on the free list, returning its payload.
    ///
    /// Child references held by the payload are NOT released; callers decide
    /// what happens to them.
    pub(crate) fn free_slot(&mut self, id: HeapId) -> Option<ValueData> {
        let slot = self.entries.get_mut(id.index())?.take()?;
        self.free_list.push(id);
        self.tracker.on_free(|| slot.data.estimate_size());
        self.tracer.on_free(id.index(), slot.data.value_type());
        Some(slot.data)
    }

    /// Takes an additional reference to `value`.
    ///
    /// # Panics
    /// Panics if the handle is foreign or stale.
    pub fn clone_handle(&mut self, value: &Value) -> Value {
        let id = match self.resolve(value) {
            Ok(id) => id,
            Err(err) => panic!("Arena::clone_handle: {err}"),
        };
        self.inc_ref(id);
        self.handle_for(id)
    }

    /// Returns a reference taken by a handle.
    ///
    /// A count reaching zero leaves the value in place. Releasing a handle
    /// whose slot was already reclaimed by collection, or one from another
    /// arena, does nothing.
    pub fn release(&mut self, value: Value) {
        if let Ok(id) = self.resolve(&value) {
            self.dec_ref(id);
        }
    }

    /// Whether the handle still refers to a live slot of this arena.
    #[must_use]
    pub fn is_live(&self, value: &Value) -> bool {
        self.resolve(value).is_ok()
    }

    /// Current reference count of the value's slot.
    pub fn refcount(&self, value: &Value) -> ValueResult<usize> {
        let id = self.resolve(value)?;
        Ok(self.entries[id.index()].as_ref().map_or(0, |slot| slot.refcount))
    }

    /// Number of live slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|entry| entry.is_some()).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether enough containers have been allocated since the last
    /// [`collect_garbage`](Self::collect_garbage) that the caller should run one.
    ///
    /// The arena never collects on its own.
    #[must_use]
    pub fn should_gc(&self) -> bool {
        self.allocations_since_gc >= self.tracker.gc_interval()
    }

    /// Frees every slot whose reference count is zero.
    ///
    /// Freeing a container releases its children; children whose count drops
    /// to zero are freed in the same pass. Values that are only kept alive by
    /// a cycle are not touched, use [`collect_garbage`](Self::collect_garbage)
    /// for those.
    ///
    /// Returns the number of slots freed.
    pub fn collect_unreferenced(&mut self) -> usize {
        let mut pending: Vec<HeapId> = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.as_ref().is_some_and(|slot| slot.refcount == 0))
            .map(|(index, _)| HeapId(index))
            .collect();

        let mut freed = 0;
        let mut children = Vec::new();
        while let Some(id) = pending.pop() {
            let Some(data) = self.free_slot(id) else {
                continue;
            };
            freed += 1;
            data.collect_child_ids(&mut children);
            for child in children.drain(..) {
                if let Some(slot) = self.slot_mut(child) {
                    slot.refcount = slot.refcount.saturating_sub(1);
                    if slot.refcount == 0 {
                        pending.push(child);
                    }
                }
            }
        }

        let live = self.len();
        self.tracer.on_collect(freed, live);
        freed
    }

    /// Mark-sweep collection: frees every slot not reachable from `roots`.
    ///
    /// This is the authoritative reclaim point. It frees unreachable values
    /// regardless of their reference counts, so reference cycles are
    /// collected, and any handle to a freed slot becomes stale. Roots that are
    /// foreign or already stale are ignored.
    ///
    /// Surviving values that were referenced by freed containers have those
    /// references removed from their counts.
    ///
    /// Returns the number of slots freed.
    pub fn collect_garbage<'a>(&mut self, roots: impl IntoIterator<Item = &'a Value>) -> usize {
        let mut reachable = vec![false; self.entries.len()];
        let mut work_list: Vec<HeapId> = roots.into_iter().filter_map(|root| self.resolve(root).ok()).collect();

        while let Some(id) = work_list.pop() {
            let index = id.index();
            if index >= reachable.len() || reachable[index] {
                continue;
            }
            reachable[index] = true;
            if let Some(Some(slot)) = self.entries.get(index) {
                slot.data.collect_child_ids(&mut work_list);
            }
        }

        let mut freed = 0;
        let mut orphaned_refs = Vec::new();
        for index in 0..self.entries.len() {
            if reachable[index] {
                continue;
            }
            if let Some(data) = self.free_slot(HeapId(index)) {
                freed += 1;
                data.collect_child_ids(&mut orphaned_refs);
            }
        }
        for child in orphaned_refs {
            if reachable[child.index()]
                && let Some(slot) = self.slot_mut(child)
            {
                slot.refcount = slot.refcount.saturating_sub(1);
            }
        }

        self.allocations_since_gc = 0;
        let live = self.len();
        self.tracer.on_collect(freed, live);
        freed
    }

    /// Clears the arena for reuse, keeping its backing storage.
    ///
    /// The arena takes a new [`ArenaId`], so handles issued before the reset
    /// are reported as foreign rather than aliasing new values.
    pub fn reset(&mut self, tracker: T) {
        self.entries.clear();
        self.generations.clear();
        self.free_list.clear();
        self.tracker = tracker;
        self.allocations_since_gc = 0;
        self.id = ArenaId::fresh();
    }

    /// Takes a snapshot of slot usage.
    #[must_use]
    pub fn stats(&self) -> ArenaStats {
        let mut objects_by_type: BTreeMap<&'static str, usize> = BTreeMap::new();
        let mut live_objects = 0;
        let mut unreferenced_objects = 0;
        for slot in self.entries.iter().flatten() {
            live_objects += 1;
            if slot.refcount == 0 {
                unreferenced_objects += 1;
            }
            *objects_by_type.entry(slot.data.value_type().into()).or_insert(0) += 1;
        }

        ArenaStats {
            live_objects,
            unreferenced_objects,
            free_slots: self.free_list.len(),
            total_slots: self.entries.len(),
            objects_by_type,
            tracker_allocations: self.tracker.allocation_count(),
            tracker_memory_bytes: self.tracker.current_memory_bytes(),
        }
    }
}
