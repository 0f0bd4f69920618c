use std::{collections::BTreeMap, fmt};

/// Snapshot of arena slot usage at a point in time.
///
/// `objects_by_type` uses a `BTreeMap` so snapshots iterate in a stable
/// order and can be compared or printed directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArenaStats {
    /// Slots currently holding a value.
    pub live_objects: usize,
    /// Live slots whose reference count is zero, waiting for collection.
    pub unreferenced_objects: usize,
    /// Freed slots available for reuse.
    pub free_slots: usize,
    /// Total slot capacity (live + free).
    pub total_slots: usize,
    /// Live values per [`Type`](crate::Type) name.
    pub objects_by_type: BTreeMap<&'static str, usize>,
    /// Allocation count from the tracker, when it records one.
    pub tracker_allocations: Option<usize>,
    /// Memory estimate from the tracker, when it records one.
    pub tracker_memory_bytes: Option<usize>,
}

/// Difference between two [`ArenaStats`] snapshots, `after - before`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArenaDiff {
    pub live_objects_delta: isize,
    pub unreferenced_objects_delta: isize,
    pub total_slots_delta: isize,
    /// Per-type deltas for every type present in either snapshot.
    pub objects_by_type_delta: BTreeMap<&'static str, isize>,
    /// Types present only in the "after" snapshot.
    pub new_types: Vec<&'static str>,
    /// Types present only in the "before" snapshot.
    pub removed_types: Vec<&'static str>,
}

impl ArenaStats {
    /// Computes the change from `self` ("before") to `other` ("after").
    ///
    /// ```
    /// use chipy::{Arena, NoLimitTracker};
    ///
    /// let mut arena = Arena::new(NoLimitTracker);
    /// let before = arena.stats();
    /// let _list = arena.create_list(vec![]).unwrap();
    /// let diff = before.diff(&arena.stats());
    /// assert_eq!(diff.live_objects_delta, 1);
    /// assert_eq!(diff.new_types, vec!["List"]);
    /// ```
    #[must_use]
    pub fn diff(&self, other: &Self) -> ArenaDiff {
        let mut objects_by_type_delta = BTreeMap::new();
        let mut new_types = Vec::new();
        let mut removed_types = Vec::new();

        for (&type_name, &before) in &self.objects_by_type {
            let after = other.objects_by_type.get(type_name).copied();
            objects_by_type_delta.insert(type_name, delta(before, after.unwrap_or(0)));
            if after.is_none() {
                removed_types.push(type_name);
            }
        }
        for (&type_name, &after) in &other.objects_by_type {
            if !self.objects_by_type.contains_key(type_name) {
                objects_by_type_delta.insert(type_name, delta(0, after));
                new_types.push(type_name);
            }
        }

        ArenaDiff {
            live_objects_delta: delta(self.live_objects, other.live_objects),
            unreferenced_objects_delta: delta(self.unreferenced_objects, other.unreferenced_objects),
            total_slots_delta: delta(self.total_slots, other.total_slots),
            objects_by_type_delta,
            new_types,
            removed_types,
        }
    }
}

impl ArenaDiff {
    /// True when nothing changed between the two snapshots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live_objects_delta == 0
            && self.unreferenced_objects_delta == 0
            && self.total_slots_delta == 0
            && self.new_types.is_empty()
            && self.removed_types.is_empty()
            && self.objects_by_type_delta.values().all(|&d| d == 0)
    }
}

impl fmt::Display for ArenaDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "ArenaDiff: no changes");
        }
        write!(
            f,
            "ArenaDiff: {:+} live objects, {:+} unreferenced, {:+} slots",
            self.live_objects_delta, self.unreferenced_objects_delta, self.total_slots_delta
        )?;
        for (&type_name, &d) in &self.objects_by_type_delta {
            if d != 0 {
                write!(f, "\n  {type_name}: {d:+}")?;
            }
        }
        if !self.new_types.is_empty() {
            write!(f, "\n  New types: {}", self.new_types.join(", "))?;
        }
        if !self.removed_types.is_empty() {
            write!(f, "\n  Removed types: {}", self.removed_types.join(", "))?;
        }
        Ok(())
    }
}

#[expect(clippy::cast_possible_wrap, reason = "slot counts stay far below isize::MAX")]
fn delta(before: usize, after: usize) -> isize {
    (after as isize).wrapping_sub(before as isize)
}
