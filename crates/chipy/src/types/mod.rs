//! The closed set of runtime value variants.
//!
//! Every slot in an [`Arena`](crate::Arena) holds one [`ValueData`]. Capability
//! queries (iterable, callable, generator, truthiness) are matches over it, and
//! the [`Variant`] trait turns it into the typed cast facility.
pub mod dict;
pub mod function;
pub mod host;
pub mod iter;
pub mod list;
pub mod module;
pub mod scalar;
pub mod r#type;

use std::mem::size_of;

pub use dict::{DictItems, Dictionary};
pub use function::{Attribute, Builtin, Function};
pub use host::{CppObject, HostHandle};
pub use iter::RangeIter;
pub use list::{List, Tuple};
pub use module::Module;
pub use r#type::Type;
pub use scalar::{Alias, BoolVal, FloatVal, IntVal, Scalar, StrVal};

use crate::arena::HeapId;

/// Payload of one arena slot.
///
/// Variant names match [`Type`] one to one. Child references are plain
/// [`HeapId`]s, each owning one reference on its slot; cloning a `ValueData`
/// copies ids without touching counts and is only done by the copy planner.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueData {
    Bool(BoolVal),
    String(StrVal),
    Integer(IntVal),
    Float(FloatVal),
    DictItems(DictItems),
    CppObject(CppObject),
    Attribute(Attribute),
    Builtin(Builtin),
    List(List),
    Dictionary(Dictionary),
    Iterator(RangeIter),
    Tuple(Tuple),
    Alias(Alias),
    Module(Module),
    Function(Function),
}

impl ValueData {
    /// Returns the discriminant. Fixed for the lifetime of the slot.
    #[must_use]
    pub fn value_type(&self) -> Type {
        match self {
            Self::Bool(_) => Type::Bool,
            Self::String(_) => Type::String,
            Self::Integer(_) => Type::Integer,
            Self::Float(_) => Type::Float,
            Self::DictItems(_) => Type::DictItems,
            Self::CppObject(_) => Type::CppObject,
            Self::Attribute(_) => Type::Attribute,
            Self::Builtin(_) => Type::Builtin,
            Self::List(_) => Type::List,
            Self::Dictionary(_) => Type::Dictionary,
            Self::Iterator(_) => Type::Iterator,
            Self::Tuple(_) => Type::Tuple,
            Self::Alias(_) => Type::Alias,
            Self::Module(_) => Type::Module,
            Self::Function(_) => Type::Function,
        }
    }

    pub(crate) fn can_iterate(&self) -> bool {
        matches!(
            self,
            Self::List(_) | Self::Tuple(_) | Self::Dictionary(_) | Self::DictItems(_) | Self::Iterator(_)
        )
    }

    pub(crate) fn is_callable(&self) -> bool {
        matches!(self, Self::Function(_) | Self::Builtin(_) | Self::Attribute(_))
    }

    pub(crate) fn is_generator(&self) -> bool {
        match self {
            Self::Iterator(_) => true,
            Self::Function(function) => function.is_generator(),
            _ => false,
        }
    }

    /// Truthiness. Only Bool and Integer look at their payload; every other
    /// variant is true, including empty strings and empty containers.
    pub(crate) fn bool_test(&self) -> bool {
        match self {
            Self::Bool(value) => *value.get(),
            Self::Integer(value) => *value.get() != 0,
            _ => true,
        }
    }

    /// Whether this variant can hold references to other slots.
    ///
    /// Only these allocations count toward the collection interval.
    pub(crate) fn is_container(&self) -> bool {
        matches!(
            self,
            Self::List(_) | Self::Tuple(_) | Self::Dictionary(_) | Self::DictItems(_) | Self::Module(_) | Self::Attribute(_)
        )
    }

    /// Approximate size in bytes, for resource accounting.
    pub(crate) fn estimate_size(&self) -> usize {
        let payload = match self {
            Self::String(value) => value.get().len(),
            Self::Alias(alias) => alias.name().len() + alias.as_name().len(),
            Self::List(list) => list.len() * size_of::<HeapId>(),
            Self::Tuple(tuple) => tuple.len() * size_of::<HeapId>(),
            Self::Dictionary(dict) => dict.keys().map(|key| key.len() + size_of::<(String, HeapId)>()).sum(),
            Self::Module(module) => module.name().len() + module.len() * size_of::<(String, HeapId)>(),
            Self::Function(function) => function.name().len() + function.params().iter().map(String::len).sum::<usize>(),
            Self::Builtin(builtin) => builtin.name().len(),
            Self::Attribute(attr) => attr.name().len(),
            Self::CppObject(object) => object.type_name().len(),
            Self::Bool(_) | Self::Integer(_) | Self::Float(_) | Self::Iterator(_) | Self::DictItems(_) => 0,
        };
        size_of::<Self>() + payload
    }

    /// Pushes the id of every slot this payload holds a reference on.
    ///
    /// Ids are pushed once per reference, so a list holding the same value
    /// twice pushes it twice.
    pub(crate) fn collect_child_ids(&self, out: &mut Vec<HeapId>) {
        match self {
            Self::List(list) => out.extend_from_slice(list.items()),
            Self::Tuple(tuple) => out.extend_from_slice(tuple.items()),
            Self::Dictionary(dict) => out.extend(dict.entries().map(|(_, id)| id)),
            Self::Module(module) => out.extend(module.ids()),
            Self::DictItems(items) => out.push(items.dict()),
            Self::Attribute(attr) => out.push(attr.owner()),
            Self::Bool(_)
            | Self::String(_)
            | Self::Integer(_)
            | Self::Float(_)
            | Self::CppObject(_)
            | Self::Builtin(_)
            | Self::Iterator(_)
            | Self::Alias(_)
            | Self::Function(_) => {}
        }
    }

    /// Applies `f` to every child reference in place.
    pub(crate) fn for_each_child_mut(&mut self, mut f: impl FnMut(&mut HeapId)) {
        match self {
            Self::List(list) => list.items_mut().iter_mut().for_each(&mut f),
            Self::Tuple(tuple) => tuple.items_mut().iter_mut().for_each(&mut f),
            Self::Dictionary(dict) => dict.ids_mut().for_each(&mut f),
            Self::Module(module) => module.ids_mut().for_each(&mut f),
            Self::DictItems(items) => f(items.dict_mut()),
            Self::Attribute(attr) => f(attr.owner_mut()),
            Self::Bool(_)
            | Self::String(_)
            | Self::Integer(_)
            | Self::Float(_)
            | Self::CppObject(_)
            | Self::Builtin(_)
            | Self::Iterator(_)
            | Self::Alias(_)
            | Self::Function(_) => {}
        }
    }

    /// Resets per-instance state that a fresh copy must not inherit.
    pub(crate) fn prepare_copy(&mut self) {
        if let Self::Iterator(range) = self {
            range.restart();
        }
    }
}

/// A concrete payload type that a generic value handle can be cast to.
///
/// Implemented for every payload in the variant set. Used through
/// [`Arena::cast`](crate::Arena::cast) and [`Arena::cast_mut`](crate::Arena::cast_mut).
pub trait Variant: Sized {
    /// Discriminant a handle must carry for the cast to succeed.
    const TYPE: Type;

    fn from_data(data: &ValueData) -> Option<&Self>;

    fn from_data_mut(data: &mut ValueData) -> Option<&mut Self>;
}

macro_rules! impl_variant {
    ($($payload:ty => $variant:ident),* $(,)?) => {
        $(
            impl Variant for $payload {
                const TYPE: Type = Type::$variant;

                #[inline]
                fn from_data(data: &ValueData) -> Option<&Self> {
                    match data {
                        ValueData::$variant(payload) => Some(payload),
                        _ => None,
                    }
                }

                #[inline]
                fn from_data_mut(data: &mut ValueData) -> Option<&mut Self> {
                    match data {
                        ValueData::$variant(payload) => Some(payload),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_variant! {
    BoolVal => Bool,
    StrVal => String,
    IntVal => Integer,
    FloatVal => Float,
    DictItems => DictItems,
    CppObject => CppObject,
    Attribute => Attribute,
    Builtin => Builtin,
    List => List,
    Dictionary => Dictionary,
    RangeIter => Iterator,
    Tuple => Tuple,
    Alias => Alias,
    Module => Module,
    Function => Function,
}
