use std::fmt;

use crate::{arena::ArenaId, resource::ResourceError, types::Type, wire::StreamError};

/// Result type alias for value-model operations that can fail.
pub type ValueResult<T> = Result<T, ValueError>;

/// Errors raised by the value model.
///
/// None of these are fatal to the process. The evaluator sitting on top of this
/// crate decides whether to turn them into language-level exceptions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A typed cast was requested for a variant the handle does not hold.
    InvalidCast { expected: Type, found: Type },
    /// The wire protocol has no layout for this variant.
    ///
    /// Raised before any byte is written on encode and before any value is
    /// constructed on decode.
    UnsupportedSerialization(Type),
    /// The handle was issued by a different arena than the one it was used with.
    ForeignHandle { expected: ArenaId, found: ArenaId },
    /// The slot behind the handle has been reclaimed by arena-level collection.
    StaleHandle,
    /// A range iterator was requested with a step that never reaches its end.
    InvalidRange { step: i32 },
    /// A JSON document node that has no counterpart in the variant set.
    UnsupportedDocument(&'static str),
    /// Nesting exceeded `MAX_DATA_RECURSION_DEPTH`, usually because of a cycle.
    RecursionLimit,
    /// The byte stream could not supply a well-formed primitive.
    Stream(StreamError),
    /// The arena's resource tracker refused an allocation.
    Resource(ResourceError),
}

impl fmt::Display for ValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCast { expected, found } => {
                write!(f, "invalid value cast: expected {expected}, found {found}")
            }
            Self::UnsupportedSerialization(value_type) => {
                write!(f, "cannot serialize a value of type {value_type}")
            }
            Self::ForeignHandle { expected, found } => {
                write!(f, "value handle belongs to {found}, not {expected}")
            }
            Self::StaleHandle => write!(f, "value handle refers to a reclaimed slot"),
            Self::InvalidRange { step } => write!(f, "range step must be positive, got {step}"),
            Self::UnsupportedDocument(kind) => write!(f, "document node `{kind}` has no value representation"),
            Self::RecursionLimit => write!(f, "maximum data nesting depth exceeded"),
            Self::Stream(err) => write!(f, "{err}"),
            Self::Resource(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ValueError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Stream(err) => Some(err),
            Self::Resource(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StreamError> for ValueError {
    fn from(err: StreamError) -> Self {
        Self::Stream(err)
    }
}

impl From<ResourceError> for ValueError {
    fn from(err: ResourceError) -> Self {
        Self::Resource(err)
    }
}
