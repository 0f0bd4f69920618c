//! Equality and ordering between values of the same arena.
//!
//! The predicates only look at a few variant pairs and answer `false` for
//! everything else, mismatched discriminants included. They never fail on a
//! type mismatch. In particular `equals` covers String and Integer only: two
//! equal Floats, Bools or lists compare unequal.

use crate::{arena::Arena, resource::ResourceTracker, tracer::ArenaTracer, types::ValueData, value::Value};

impl<T: ResourceTracker, Tr: ArenaTracer> Arena<T, Tr> {
    /// True iff both values are Integer and `a > b`.
    ///
    /// # Panics
    /// Panics if either handle is foreign or stale. Values from two arenas
    /// are compared by duplicating one into the other first.
    #[must_use]
    pub fn greater_than(&self, a: &Value, b: &Value) -> bool {
        let (a, b) = (self.expect_data(a, "greater_than"), self.expect_data(b, "greater_than"));
        integers(a, b).is_some_and(|(a, b)| a > b)
    }

    /// True iff both values are Integer and `a >= b`.
    ///
    /// # Panics
    /// Panics if either handle is foreign or stale.
    #[must_use]
    pub fn greater_or_equal(&self, a: &Value, b: &Value) -> bool {
        let (a, b) = (self.expect_data(a, "greater_or_equal"), self.expect_data(b, "greater_or_equal"));
        integers(a, b).is_some_and(|(a, b)| a >= b)
    }

    /// True iff both values are String with equal text, or both Integer with
    /// equal payload.
    ///
    /// # Panics
    /// Panics if either handle is foreign or stale.
    #[must_use]
    pub fn equals(&self, a: &Value, b: &Value) -> bool {
        match (self.expect_data(a, "equals"), self.expect_data(b, "equals")) {
            (ValueData::String(a), ValueData::String(b)) => a.get() == b.get(),
            (ValueData::Integer(a), ValueData::Integer(b)) => a.get() == b.get(),
            _ => false,
        }
    }
}

fn integers(a: &ValueData, b: &ValueData) -> Option<(i32, i32)> {
    match (a, b) {
        (ValueData::Integer(a), ValueData::Integer(b)) => Some((*a.get(), *b.get())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::NoLimitTracker;

    #[test]
    fn same_handle_is_equal_to_itself() {
        let mut arena = Arena::new(NoLimitTracker);
        let text = arena.create_string("abc").unwrap();
        assert!(arena.equals(&text, &text));
    }

    #[test]
    fn ordering_ignores_floats() {
        let mut arena = Arena::new(NoLimitTracker);
        let big = arena.create_float(2.5).unwrap();
        let small = arena.create_float(0.5).unwrap();
        assert!(!arena.greater_than(&big, &small));
        assert!(!arena.greater_or_equal(&big, &small));
    }

    #[test]
    #[should_panic(expected = "Arena::equals")]
    fn foreign_handles_panic() {
        let mut left = Arena::new(NoLimitTracker);
        let mut right = Arena::new(NoLimitTracker);
        let a = left.create_integer(1).unwrap();
        let b = right.create_integer(1).unwrap();
        let _ = left.equals(&a, &b);
    }
}
