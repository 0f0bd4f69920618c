use strum::{Display, FromRepr, IntoStaticStr};

/// Discriminant of a runtime value.
///
/// The `u8` representation is also the wire tag written by
/// [`serialize`](crate::serialize), so variant order is part of the wire
/// contract and must not change.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    IntoStaticStr,
    FromRepr,
    serde::Serialize,
    serde::Deserialize,
)]
#[repr(u8)]
pub enum Type {
    Bool = 0,
    String = 1,
    Integer = 2,
    Float = 3,
    DictItems = 4,
    /// Opaque object owned by the embedding host.
    CppObject = 5,
    /// An attribute bound to its owning value, e.g. a method looked up on an instance.
    Attribute = 6,
    Builtin = 7,
    List = 8,
    Dictionary = 9,
    Iterator = 10,
    Tuple = 11,
    /// Import alias, `import name as as_name`.
    Alias = 12,
    Module = 13,
    Function = 14,
}

impl Type {
    /// Every discriminant, in wire-tag order.
    pub const ALL: [Self; 15] = [
        Self::Bool,
        Self::String,
        Self::Integer,
        Self::Float,
        Self::DictItems,
        Self::CppObject,
        Self::Attribute,
        Self::Builtin,
        Self::List,
        Self::Dictionary,
        Self::Iterator,
        Self::Tuple,
        Self::Alias,
        Self::Module,
        Self::Function,
    ];

    /// Returns the wire tag for this discriminant.
    #[must_use]
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Looks up the discriminant for a wire tag.
    #[must_use]
    pub fn from_tag(tag: u8) -> Option<Self> {
        Self::from_repr(tag)
    }

    /// Whether the wire protocol knows how to encode this variant.
    #[must_use]
    pub fn is_wire_safe(self) -> bool {
        matches!(self, Self::Integer | Self::Bool)
    }
}
