//! Typed cast facility and capability queries over value handles.
//!
//! A generic [`Value`] handle says nothing about its payload. [`Arena::cast`]
//! is the one sanctioned way to reach it: the request names the payload type,
//! and the cast succeeds only if the handle's discriminant matches.
//!
//! ```
//! use chipy::{Arena, IntVal, NoLimitTracker, StrVal, Type, ValueError};
//!
//! let mut arena = Arena::new(NoLimitTracker);
//! let value = arena.create_integer(42).unwrap();
//! assert_eq!(*arena.cast::<IntVal>(&value).unwrap().get(), 42);
//! assert_eq!(
//!     arena.cast::<StrVal>(&value).unwrap_err(),
//!     ValueError::InvalidCast { expected: Type::String, found: Type::Integer }
//! );
//! ```

use crate::{
    arena::Arena,
    error::{ValueError, ValueResult},
    resource::ResourceTracker,
    tracer::ArenaTracer,
    types::{Type, Variant},
    value::Value,
};

impl<T: ResourceTracker, Tr: ArenaTracer> Arena<T, Tr> {
    /// Recovers the concrete payload behind `value`.
    ///
    /// Fails with [`ValueError::InvalidCast`] when the discriminant is not
    /// `V::TYPE`, and with `ForeignHandle`/`StaleHandle` for handles this arena
    /// cannot resolve.
    pub fn cast<V: Variant>(&self, value: &Value) -> ValueResult<&V> {
        let data = self.data(value)?;
        V::from_data(data).ok_or(ValueError::InvalidCast {
            expected: V::TYPE,
            found: data.value_type(),
        })
    }

    /// Mutable counterpart of [`cast`](Self::cast), for `set` and container updates.
    pub fn cast_mut<V: Variant>(&mut self, value: &Value) -> ValueResult<&mut V> {
        let data = self.data_mut(value)?;
        let found = data.value_type();
        V::from_data_mut(data).ok_or(ValueError::InvalidCast {
            expected: V::TYPE,
            found,
        })
    }

    /// The value's discriminant.
    ///
    /// # Panics
    /// Panics if the handle is foreign or stale.
    #[must_use]
    pub fn type_of(&self, value: &Value) -> Type {
        self.expect_data(value, "type_of").value_type()
    }

    /// Whether the value can be iterated over.
    ///
    /// # Panics
    /// Panics if the handle is foreign or stale.
    #[must_use]
    pub fn can_iterate(&self, value: &Value) -> bool {
        self.expect_data(value, "can_iterate").can_iterate()
    }

    /// # Panics
    /// Panics if the handle is foreign or stale.
    #[must_use]
    pub fn is_callable(&self, value: &Value) -> bool {
        self.expect_data(value, "is_callable").is_callable()
    }

    /// # Panics
    /// Panics if the handle is foreign or stale.
    #[must_use]
    pub fn is_generator(&self, value: &Value) -> bool {
        self.expect_data(value, "is_generator").is_generator()
    }

    /// Truthiness: Bool is its payload, Integer is non-zero, everything else is true.
    ///
    /// # Panics
    /// Panics if the handle is foreign or stale.
    #[must_use]
    pub fn bool_test(&self, value: &Value) -> bool {
        self.expect_data(value, "bool_test").bool_test()
    }
}
