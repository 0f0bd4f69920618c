//! Deep copies of values, within one arena or across arenas.
//!
//! Copying is split in two phases. The copy plan walks the source graph
//! through a shared borrow and clones every reachable payload; materialising
//! the plan then allocates those payloads in the target arena and rewires
//! their child ids. The split is what lets the target be the source arena
//! itself without holding a shared and a mutable borrow at once.
//!
//! Shapes survive the copy: a child referenced twice in the source is copied
//! once and referenced twice in the result, and cycles copy as cycles.

use std::collections::VecDeque;

use ahash::{AHashMap, AHashSet};

use crate::{
    arena::{Arena, HeapId},
    error::{ValueError, ValueResult},
    resource::{ResourceError, ResourceTracker},
    tracer::ArenaTracer,
    types::ValueData,
    value::Value,
};

/// Snapshot of every slot reachable from a root, child ids still pointing at
/// the source arena.
struct CopyPlan {
    /// Source id and cloned payload, root first.
    nodes: Vec<(HeapId, ValueData)>,
}

impl<T: ResourceTracker, Tr: ArenaTracer> Arena<T, Tr> {
    /// Deep-copies `value` into this arena.
    ///
    /// Composite payloads are copied all the way down, scalars by value; the
    /// result shares no slot with the source. Range iterators restart from
    /// their first element.
    pub fn duplicate(&mut self, value: &Value) -> ValueResult<Value> {
        let plan = self.copy_plan(value)?;
        self.materialize(plan, false).map_err(ValueError::from)
    }

    /// Deep-copies `value` from this arena into `target`.
    ///
    /// The copy is built entirely from `target`'s storage and is subject to
    /// its resource limits. If a limit is hit part way through, nothing of
    /// the copy is left behind in `target`.
    pub fn duplicate_into<U: ResourceTracker, Ur: ArenaTracer>(
        &self,
        value: &Value,
        target: &mut Arena<U, Ur>,
    ) -> ValueResult<Value> {
        let plan = self.copy_plan(value)?;
        target.materialize(plan, true).map_err(ValueError::from)
    }

    fn copy_plan(&self, value: &Value) -> ValueResult<CopyPlan> {
        let root = self.resolve(value)?;
        let mut seen = AHashSet::from([root]);
        let mut queue = VecDeque::from([root]);
        let mut nodes = Vec::new();
        let mut children = Vec::new();

        while let Some(id) = queue.pop_front() {
            let mut data = self.get(id).clone();
            data.prepare_copy();
            data.collect_child_ids(&mut children);
            for child in children.drain(..) {
                if seen.insert(child) {
                    queue.push_back(child);
                }
            }
            nodes.push((id, data));
        }
        Ok(CopyPlan { nodes })
    }

    fn materialize(&mut self, plan: CopyPlan, cross_arena: bool) -> Result<Value, ResourceError> {
        let mut remap: AHashMap<HeapId, HeapId> = AHashMap::with_capacity(plan.nodes.len());
        let mut allocated = Vec::with_capacity(plan.nodes.len());

        for (source_id, data) in plan.nodes {
            match self.allocate_slot(data, 0) {
                Ok(new_id) => {
                    remap.insert(source_id, new_id);
                    allocated.push(new_id);
                }
                Err(err) => {
                    for id in allocated {
                        self.free_slot(id);
                    }
                    return Err(err);
                }
            }
        }

        let mut children = Vec::new();
        for &id in &allocated {
            self.get_mut(id).for_each_child_mut(|child| {
                if let Some(&mapped) = remap.get(child) {
                    *child = mapped;
                }
            });
            self.get(id).collect_child_ids(&mut children);
            for child in children.drain(..) {
                self.inc_ref(child);
            }
        }

        let root = allocated[0];
        self.inc_ref(root);
        self.tracer_mut().on_duplicate(allocated.len(), cross_arena);
        Ok(self.handle_for(root))
    }
}
