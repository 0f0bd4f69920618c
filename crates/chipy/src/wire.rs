//! Binary encoding of values.
//!
//! The layout is a one-byte [`Type`] tag followed by a fixed-width payload:
//!
//! | Variant | Payload |
//! |---|---|
//! | Integer | 4 bytes, signed, little-endian |
//! | Bool | 1 byte, `0` or `1` |
//!
//! There are no length prefixes and no version byte. Other variants have no
//! layout and are rejected with [`ValueError::UnsupportedSerialization`].
//!
//! ```
//! use chipy::{deserialize, serialize, Arena, BitStream, IntVal, NoLimitTracker};
//!
//! let mut arena = Arena::new(NoLimitTracker);
//! let value = arena.create_integer(42).unwrap();
//! let mut stream = BitStream::new();
//! serialize(&arena, &value, &mut stream).unwrap();
//! assert_eq!(stream.as_bytes(), &[0x02, 0x2A, 0x00, 0x00, 0x00]);
//!
//! let mut fresh = Arena::new(NoLimitTracker);
//! let decoded = deserialize(&mut stream, &mut fresh).unwrap();
//! assert_eq!(*fresh.cast::<IntVal>(&decoded).unwrap().get(), 42);
//! ```

use std::fmt;

use crate::{
    arena::Arena,
    error::{ValueError, ValueResult},
    resource::ResourceTracker,
    tracer::ArenaTracer,
    types::{Type, ValueData},
    value::Value,
};

/// A malformed or truncated primitive in a [`BitStream`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamError {
    /// Fewer bytes remain than the primitive needs.
    UnexpectedEof { needed: usize, remaining: usize },
    /// A bool byte other than `0` or `1`.
    InvalidBool(u8),
    /// A tag byte that names no [`Type`].
    UnknownTag(u8),
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEof { needed, remaining } => {
                write!(f, "unexpected end of stream: needed {needed} bytes, {remaining} remaining")
            }
            Self::InvalidBool(byte) => write!(f, "invalid bool byte {byte:#04x}"),
            Self::UnknownTag(tag) => write!(f, "unknown type tag {tag}"),
        }
    }
}

impl std::error::Error for StreamError {}

/// Append-only byte buffer with a read cursor.
///
/// Writes always go to the end; reads consume from the cursor. A single
/// stream can therefore carry several encoded values back to back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitStream {
    buf: Vec<u8>,
    pos: usize,
}

impl BitStream {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every byte written so far, including bytes already read.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Offset of the read cursor.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left between the cursor and the end.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Moves the read cursor back to the first byte.
    pub fn rewind(&mut self) {
        self.pos = 0;
    }

    pub fn write_tag(&mut self, value_type: Type) {
        self.buf.push(value_type.tag());
    }

    pub fn write_i32(&mut self, value: i32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_bool(&mut self, value: bool) {
        self.buf.push(u8::from(value));
    }

    pub fn read_tag(&mut self) -> Result<Type, StreamError> {
        let [tag] = self.take::<1>()?;
        Type::from_tag(tag).ok_or(StreamError::UnknownTag(tag))
    }

    pub fn read_i32(&mut self) -> Result<i32, StreamError> {
        Ok(i32::from_le_bytes(self.take::<4>()?))
    }

    /// Reads a bool byte. Anything other than `0` or `1` is rejected.
    pub fn read_bool(&mut self) -> Result<bool, StreamError> {
        match self.take::<1>()? {
            [0] => Ok(false),
            [1] => Ok(true),
            [byte] => Err(StreamError::InvalidBool(byte)),
        }
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N], StreamError> {
        let remaining = self.remaining();
        let bytes = self
            .buf
            .get(self.pos..self.pos + N)
            .ok_or(StreamError::UnexpectedEof { needed: N, remaining })?;
        let mut out = [0; N];
        out.copy_from_slice(bytes);
        self.pos += N;
        Ok(out)
    }
}

impl From<Vec<u8>> for BitStream {
    fn from(buf: Vec<u8>) -> Self {
        Self { buf, pos: 0 }
    }
}

/// Writes `value` to the end of `stream`.
///
/// Only Integer and Bool are encodable. For any other variant this fails with
/// [`ValueError::UnsupportedSerialization`] and leaves the stream untouched.
pub fn serialize(
    arena: &Arena<impl ResourceTracker, impl ArenaTracer>,
    value: &Value,
    stream: &mut BitStream,
) -> ValueResult<()> {
    match arena.data(value)? {
        ValueData::Integer(int) => {
            stream.write_tag(Type::Integer);
            stream.write_i32(*int.get());
        }
        ValueData::Bool(flag) => {
            stream.write_tag(Type::Bool);
            stream.write_bool(*flag.get());
        }
        other => return Err(ValueError::UnsupportedSerialization(other.value_type())),
    }
    Ok(())
}

/// Reads one value from `stream` and constructs it in `arena`.
///
/// On any failure the read cursor is put back where it was, so the caller
/// can inspect or skip the offending bytes.
pub fn deserialize(
    stream: &mut BitStream,
    arena: &mut Arena<impl ResourceTracker, impl ArenaTracer>,
) -> ValueResult<Value> {
    let start = stream.pos;
    let decoded = decode(stream, arena);
    if decoded.is_err() {
        stream.pos = start;
    }
    decoded
}

fn decode(stream: &mut BitStream, arena: &mut Arena<impl ResourceTracker, impl ArenaTracer>) -> ValueResult<Value> {
    match stream.read_tag()? {
        Type::Integer => {
            let value = stream.read_i32()?;
            arena.create_integer(value)
        }
        Type::Bool => {
            let value = stream.read_bool()?;
            arena.create_boolean(value)
        }
        other => Err(ValueError::UnsupportedSerialization(other)),
    }
}
