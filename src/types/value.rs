//! # Runtime Value Representation
//!
//! `Value` is the owned runtime representation of one leaf value. Each variant
//! corresponds to exactly one leaf [`LayoutType`]; codecs reject a value whose
//! variant does not match the layout type they are invoked on.
//!
//! ## Value Variants
//!
//! | Variant | Rust Type | Layout type |
//! |---------|-----------|-------------|
//! | Null | - | Null |
//! | Boolean | bool | Boolean |
//! | Int8..Int64 | i8..i64 | Int8..Int64 |
//! | UInt8..UInt64 | u8..u64 | UInt8..UInt64 |
//! | VarInt | i64 | VarInt |
//! | VarUInt | u64 | VarUInt |
//! | Float32 / Float64 | f32 / f64 | Float32 / Float64 |
//! | Float128 | `Float128` | Float128 |
//! | Decimal | `Decimal` | Decimal |
//! | DateTime | `DateTime` | DateTime |
//! | UnixDateTime | `UnixDateTime` | UnixDateTime |
//! | Guid | `uuid::Uuid` | Guid |
//! | MongoDbObjectId | `MongoDbObjectId` | MongoDbObjectId |
//! | Utf8 | String | Utf8 |
//! | Binary | `Vec<u8>` | Binary |
//!
//! ## Defaults
//!
//! [`Value::default_for`] gives the value a zeroed fixed slot decodes to: zero,
//! false, the nil GUID, or an empty string. Reads of absent nullable fixed
//! columns report it alongside `NotFound`.

use uuid::Uuid;

use super::{DateTime, Decimal, Float128, LayoutType, MongoDbObjectId, UnixDateTime};

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    VarInt(i64),
    VarUInt(u64),
    Float32(f32),
    Float64(f64),
    Float128(Float128),
    Decimal(Decimal),
    DateTime(DateTime),
    UnixDateTime(UnixDateTime),
    Guid(Uuid),
    MongoDbObjectId(MongoDbObjectId),
    Utf8(String),
    Binary(Vec<u8>),
}

impl Value {
    pub fn layout_type(&self) -> LayoutType {
        match self {
            Value::Null => LayoutType::Null,
            Value::Boolean(_) => LayoutType::Boolean,
            Value::Int8(_) => LayoutType::Int8,
            Value::Int16(_) => LayoutType::Int16,
            Value::Int32(_) => LayoutType::Int32,
            Value::Int64(_) => LayoutType::Int64,
            Value::UInt8(_) => LayoutType::UInt8,
            Value::UInt16(_) => LayoutType::UInt16,
            Value::UInt32(_) => LayoutType::UInt32,
            Value::UInt64(_) => LayoutType::UInt64,
            Value::VarInt(_) => LayoutType::VarInt,
            Value::VarUInt(_) => LayoutType::VarUInt,
            Value::Float32(_) => LayoutType::Float32,
            Value::Float64(_) => LayoutType::Float64,
            Value::Float128(_) => LayoutType::Float128,
            Value::Decimal(_) => LayoutType::Decimal,
            Value::DateTime(_) => LayoutType::DateTime,
            Value::UnixDateTime(_) => LayoutType::UnixDateTime,
            Value::Guid(_) => LayoutType::Guid,
            Value::MongoDbObjectId(_) => LayoutType::MongoDbObjectId,
            Value::Utf8(_) => LayoutType::Utf8,
            Value::Binary(_) => LayoutType::Binary,
        }
    }

    /// The zero value of a leaf type; `None` for scopes.
    pub fn default_for(layout_type: LayoutType) -> Option<Value> {
        let value = match layout_type {
            LayoutType::Null => Value::Null,
            LayoutType::Boolean => Value::Boolean(false),
            LayoutType::Int8 => Value::Int8(0),
            LayoutType::Int16 => Value::Int16(0),
            LayoutType::Int32 => Value::Int32(0),
            LayoutType::Int64 => Value::Int64(0),
            LayoutType::UInt8 => Value::UInt8(0),
            LayoutType::UInt16 => Value::UInt16(0),
            LayoutType::UInt32 => Value::UInt32(0),
            LayoutType::UInt64 => Value::UInt64(0),
            LayoutType::VarInt => Value::VarInt(0),
            LayoutType::VarUInt => Value::VarUInt(0),
            LayoutType::Float32 => Value::Float32(0.0),
            LayoutType::Float64 => Value::Float64(0.0),
            LayoutType::Float128 => Value::Float128(Float128::default()),
            LayoutType::Decimal => Value::Decimal(Decimal::ZERO),
            LayoutType::DateTime => Value::DateTime(DateTime::default()),
            LayoutType::UnixDateTime => Value::UnixDateTime(UnixDateTime::default()),
            LayoutType::Guid => Value::Guid(Uuid::nil()),
            LayoutType::MongoDbObjectId => Value::MongoDbObjectId(MongoDbObjectId::default()),
            LayoutType::Utf8 => Value::Utf8(String::new()),
            LayoutType::Binary => Value::Binary(Vec::new()),
            _ => return None,
        };
        Some(value)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Utf8(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Binary(b) => Some(b),
            Value::Utf8(s) => Some(s.as_bytes()),
            _ => None,
        }
    }

    /// Widens any signed integer variant.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::Int8(v) => Some(v as i64),
            Value::Int16(v) => Some(v as i64),
            Value::Int32(v) => Some(v as i64),
            Value::Int64(v) | Value::VarInt(v) => Some(v),
            _ => None,
        }
    }

    /// Widens any unsigned integer variant.
    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            Value::UInt8(v) => Some(v as u64),
            Value::UInt16(v) => Some(v as u64),
            Value::UInt32(v) => Some(v as u64),
            Value::UInt64(v) | Value::VarUInt(v) => Some(v),
            _ => None,
        }
    }
}

macro_rules! impl_value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_value_from! {
    bool => Boolean,
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u8 => UInt8,
    u16 => UInt16,
    u32 => UInt32,
    u64 => UInt64,
    f32 => Float32,
    f64 => Float64,
    Float128 => Float128,
    Decimal => Decimal,
    DateTime => DateTime,
    UnixDateTime => UnixDateTime,
    Uuid => Guid,
    MongoDbObjectId => MongoDbObjectId,
    String => Utf8,
    Vec<u8> => Binary,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Utf8(v.to_string())
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Binary(v.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_default_reports_its_own_layout_type() {
        for code in 0..=u8::MAX {
            let Ok(t) = LayoutType::try_from(code) else {
                continue;
            };
            match Value::default_for(t) {
                Some(v) => assert_eq!(v.layout_type(), t),
                None => assert!(t.is_scope()),
            }
        }
    }

    #[test]
    fn from_impls_pick_matching_variant() {
        assert_eq!(Value::from(42i8), Value::Int8(42));
        assert_eq!(Value::from("aa"), Value::Utf8("aa".into()));
        assert_eq!(Value::from(&b"\x00\x01"[..]).layout_type(), LayoutType::Binary);
        assert_eq!(Value::from(Uuid::nil()).layout_type(), LayoutType::Guid);
    }

    #[test]
    fn integer_widening() {
        assert_eq!(Value::Int16(-3).as_i64(), Some(-3));
        assert_eq!(Value::VarUInt(7).as_u64(), Some(7));
        assert_eq!(Value::Utf8("x".into()).as_i64(), None);
    }
}
