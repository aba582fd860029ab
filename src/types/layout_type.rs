//! # Layout Types
//!
//! `LayoutType` is the closed family of types a row can hold. Every sparse value
//! in a row starts with the type's one-byte code, so the discriminants below are
//! part of the wire format and must never be renumbered.
//!
//! ## Type Categories
//!
//! | Category | Types | Fixed Size |
//! |----------|-------|------------|
//! | **Null** | Null | 0 bytes |
//! | **Boolean** | Boolean | 1 byte (a bit in the fixed region) |
//! | **Signed** | Int8, Int16, Int32, Int64 | 1, 2, 4, 8 bytes |
//! | **Unsigned** | UInt8, UInt16, UInt32, UInt64 | 1, 2, 4, 8 bytes |
//! | **Varint** | VarInt, VarUInt | Variable |
//! | **Float** | Float32, Float64, Float128 | 4, 8, 16 bytes |
//! | **Numeric** | Decimal | 16 bytes |
//! | **Temporal** | DateTime, UnixDateTime | 8 bytes |
//! | **Identifier** | Guid, MongoDbObjectId | 16, 12 bytes |
//! | **String** | Utf8, Binary | Variable (or declared length when fixed) |
//! | **Scope** | Object, Array, TypedArray, Set, TypedSet, Map, TypedMap, Tuple, TypedTuple, Udt | n/a |
//!
//! ## Discriminant Values
//!
//! - 1-2: Null and Boolean
//! - 5-24: Leaf primitives
//! - 30-48: Scopes, spaced by two
//! - 70: `END_SCOPE` terminator (not a type)
//!
//! Code 0 is never assigned so that a zeroed byte is always invalid metadata.
//!
//! ## Scope Properties
//!
//! ```text
//!                 typed  unique  indexed  fixed-arity  counted  named
//! Object            -      -       -          -           -       x
//! Array             -      -       x          -           -       -
//! TypedArray        x      -       x          -           x       -
//! Set               -      x       -          -           -       -
//! TypedSet          x      x       -          -           x       -
//! Map               -      x       -          -           -       -
//! TypedMap          x      x       -          -           x       -
//! Tuple             -      -       x          x           -       -
//! TypedTuple        x      -       x          x           -       -
//! Udt               -      -       -          -           -       x
//! ```

use std::fmt;

use crate::config::{DECIMAL_SIZE, FLOAT128_SIZE, GUID_SIZE, MONGODB_OBJECT_ID_SIZE};

/// Terminates the element list of object, array, set, map and UDT scopes.
pub const END_SCOPE: u8 = 70;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LayoutType {
    Null = 1,
    Boolean = 2,

    Int8 = 5,
    Int16 = 6,
    Int32 = 7,
    Int64 = 8,
    UInt8 = 9,
    UInt16 = 10,
    UInt32 = 11,
    UInt64 = 12,
    VarInt = 13,
    VarUInt = 14,

    Float32 = 15,
    Float64 = 16,
    Float128 = 17,
    Decimal = 18,

    DateTime = 19,
    UnixDateTime = 20,
    Guid = 21,
    MongoDbObjectId = 22,

    Utf8 = 23,
    Binary = 24,

    Object = 30,
    Array = 32,
    TypedArray = 34,
    Set = 36,
    TypedSet = 38,
    Map = 40,
    TypedMap = 42,
    Tuple = 44,
    TypedTuple = 46,
    Udt = 48,
}

impl LayoutType {
    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            LayoutType::Null => "null",
            LayoutType::Boolean => "bool",
            LayoutType::Int8 => "int8",
            LayoutType::Int16 => "int16",
            LayoutType::Int32 => "int32",
            LayoutType::Int64 => "int64",
            LayoutType::UInt8 => "uint8",
            LayoutType::UInt16 => "uint16",
            LayoutType::UInt32 => "uint32",
            LayoutType::UInt64 => "uint64",
            LayoutType::VarInt => "varint",
            LayoutType::VarUInt => "varuint",
            LayoutType::Float32 => "float32",
            LayoutType::Float64 => "float64",
            LayoutType::Float128 => "float128",
            LayoutType::Decimal => "decimal",
            LayoutType::DateTime => "datetime",
            LayoutType::UnixDateTime => "unixdatetime",
            LayoutType::Guid => "guid",
            LayoutType::MongoDbObjectId => "mongodbobjectid",
            LayoutType::Utf8 => "utf8",
            LayoutType::Binary => "binary",
            LayoutType::Object => "object",
            LayoutType::Array => "array",
            LayoutType::TypedArray => "array_t",
            LayoutType::Set => "set",
            LayoutType::TypedSet => "set_t",
            LayoutType::Map => "map",
            LayoutType::TypedMap => "map_t",
            LayoutType::Tuple => "tuple",
            LayoutType::TypedTuple => "tuple_t",
            LayoutType::Udt => "udt",
        }
    }

    /// Payload size of a fixed-width leaf, or None for varints, strings and
    /// scopes. Boolean reports 1 because its sparse payload is one byte; in the
    /// fixed region it is a bit.
    pub fn fixed_size(self) -> Option<usize> {
        match self {
            LayoutType::Null => Some(0),
            LayoutType::Boolean | LayoutType::Int8 | LayoutType::UInt8 => Some(1),
            LayoutType::Int16 | LayoutType::UInt16 => Some(2),
            LayoutType::Int32 | LayoutType::UInt32 | LayoutType::Float32 => Some(4),
            LayoutType::Int64
            | LayoutType::UInt64
            | LayoutType::Float64
            | LayoutType::DateTime
            | LayoutType::UnixDateTime => Some(8),
            LayoutType::Float128 => Some(FLOAT128_SIZE),
            LayoutType::Decimal => Some(DECIMAL_SIZE),
            LayoutType::Guid => Some(GUID_SIZE),
            LayoutType::MongoDbObjectId => Some(MONGODB_OBJECT_ID_SIZE),
            _ => None,
        }
    }

    pub fn is_scope(self) -> bool {
        self.code() >= LayoutType::Object.code()
    }

    pub fn is_leaf(self) -> bool {
        !self.is_scope()
    }

    /// Leaf types whose payload length varies with the value.
    pub fn is_varlen(self) -> bool {
        matches!(
            self,
            LayoutType::VarInt | LayoutType::VarUInt | LayoutType::Utf8 | LayoutType::Binary
        )
    }

    /// Elements of typed scopes carry no per-element type code.
    pub fn is_typed_scope(self) -> bool {
        matches!(
            self,
            LayoutType::TypedArray
                | LayoutType::TypedSet
                | LayoutType::TypedMap
                | LayoutType::TypedTuple
        )
    }

    pub fn is_unique_scope(self) -> bool {
        matches!(
            self,
            LayoutType::Set | LayoutType::TypedSet | LayoutType::Map | LayoutType::TypedMap
        )
    }

    pub fn is_indexed_scope(self) -> bool {
        matches!(
            self,
            LayoutType::Array | LayoutType::TypedArray | LayoutType::Tuple | LayoutType::TypedTuple
        )
    }

    pub fn is_fixed_arity(self) -> bool {
        matches!(self, LayoutType::Tuple | LayoutType::TypedTuple)
    }

    /// Scopes whose payload starts with a `u32` element count.
    pub fn is_counted_scope(self) -> bool {
        matches!(
            self,
            LayoutType::TypedArray | LayoutType::TypedSet | LayoutType::TypedMap
        )
    }

    /// Scopes whose fields are addressed by path.
    pub fn is_named_scope(self) -> bool {
        matches!(self, LayoutType::Object | LayoutType::Udt)
    }

    /// Scopes whose element list ends with [`END_SCOPE`].
    pub fn has_end_scope(self) -> bool {
        matches!(
            self,
            LayoutType::Object
                | LayoutType::Array
                | LayoutType::Set
                | LayoutType::Map
                | LayoutType::Udt
        )
    }

    pub fn is_signed_int(self) -> bool {
        matches!(
            self,
            LayoutType::Int8
                | LayoutType::Int16
                | LayoutType::Int32
                | LayoutType::Int64
                | LayoutType::VarInt
        )
    }

    pub fn is_unsigned_int(self) -> bool {
        matches!(
            self,
            LayoutType::UInt8
                | LayoutType::UInt16
                | LayoutType::UInt32
                | LayoutType::UInt64
                | LayoutType::VarUInt
        )
    }
}

impl fmt::Display for LayoutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u8> for LayoutType {
    type Error = eyre::Report;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(LayoutType::Null),
            2 => Ok(LayoutType::Boolean),
            5 => Ok(LayoutType::Int8),
            6 => Ok(LayoutType::Int16),
            7 => Ok(LayoutType::Int32),
            8 => Ok(LayoutType::Int64),
            9 => Ok(LayoutType::UInt8),
            10 => Ok(LayoutType::UInt16),
            11 => Ok(LayoutType::UInt32),
            12 => Ok(LayoutType::UInt64),
            13 => Ok(LayoutType::VarInt),
            14 => Ok(LayoutType::VarUInt),
            15 => Ok(LayoutType::Float32),
            16 => Ok(LayoutType::Float64),
            17 => Ok(LayoutType::Float128),
            18 => Ok(LayoutType::Decimal),
            19 => Ok(LayoutType::DateTime),
            20 => Ok(LayoutType::UnixDateTime),
            21 => Ok(LayoutType::Guid),
            22 => Ok(LayoutType::MongoDbObjectId),
            23 => Ok(LayoutType::Utf8),
            24 => Ok(LayoutType::Binary),
            30 => Ok(LayoutType::Object),
            32 => Ok(LayoutType::Array),
            34 => Ok(LayoutType::TypedArray),
            36 => Ok(LayoutType::Set),
            38 => Ok(LayoutType::TypedSet),
            40 => Ok(LayoutType::Map),
            42 => Ok(LayoutType::TypedMap),
            44 => Ok(LayoutType::Tuple),
            46 => Ok(LayoutType::TypedTuple),
            48 => Ok(LayoutType::Udt),
            _ => eyre::bail!("invalid LayoutType code: {}", value),
        }
    }
}
