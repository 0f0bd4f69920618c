#![doc = include_str!("../../../README.md")]
mod arena;
mod cast;
mod compare;
mod construct;
mod document;
mod duplicate;
mod error;
mod resource;
mod stats;
pub mod tracer;
mod types;
mod value;
mod wire;

pub use crate::{
    arena::{Arena, ArenaId},
    error::{ValueError, ValueResult},
    resource::{
        DEFAULT_GC_INTERVAL, LimitedTracker, MAX_DATA_RECURSION_DEPTH, NoLimitTracker, ResourceError, ResourceLimits,
        ResourceTracker,
    },
    stats::{ArenaDiff, ArenaStats},
    tracer::{ArenaTracer, NoopTracer, RecordingTracer, StderrTracer, TraceEvent},
    types::{
        Alias, Attribute, BoolVal, Builtin, CppObject, DictItems, Dictionary, FloatVal, Function, HostHandle, IntVal,
        List, Module, RangeIter, Scalar, StrVal, Tuple, Type, Variant,
    },
    value::Value,
    wire::{BitStream, StreamError, deserialize, serialize},
};
