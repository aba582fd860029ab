//! # Leaf Payload Codec
//!
//! Byte-level encoding of leaf values, shared by the fixed, variable and
//! sparse regions.
//!
//! ## Payload Formats
//!
//! | Type | Payload |
//! |------|---------|
//! | Null | nothing |
//! | Boolean | 1 byte (0 or 1); a bit when fixed |
//! | Int*/UInt* | little-endian, natural width |
//! | VarInt | zigzag LEB128 |
//! | VarUInt | LEB128 |
//! | Float32/Float64 | IEEE 754 little-endian |
//! | Float128 | low u64 LE, high i64 LE |
//! | Decimal | 16 bytes, see `types::Decimal` |
//! | DateTime/UnixDateTime | i64 LE |
//! | Guid | 16 bytes, RFC 4122 byte order |
//! | MongoDbObjectId | 12 bytes |
//! | Utf8/Binary | varuint length + bytes; exactly the declared length when fixed |
//!
//! Decoding failures (truncation, invalid UTF-8, bad decimal bits) surface as
//! `RowError::TypeMismatch`.

use uuid::Uuid;

use crate::config::{DECIMAL_SIZE, FLOAT128_SIZE, GUID_SIZE, MONGODB_OBJECT_ID_SIZE};
use crate::encoding::key;
use crate::encoding::varint::{decode_varint, decode_varuint, push_varint, push_varuint};
use crate::types::{
    DateTime, Decimal, Float128, LayoutType, MongoDbObjectId, UnixDateTime, Value,
};

use super::result::{corrupt, RowError, RowResult};

fn slice(buf: &[u8], offset: usize, len: usize) -> RowResult<&[u8]> {
    let end = offset.checked_add(len).ok_or(RowError::TypeMismatch)?;
    buf.get(offset..end).ok_or(RowError::TypeMismatch)
}

fn array<const N: usize>(buf: &[u8], offset: usize) -> RowResult<[u8; N]> {
    let mut out = [0u8; N];
    out.copy_from_slice(slice(buf, offset, N)?);
    Ok(out)
}

/// Appends the sparse/variable payload of `value`.
pub(crate) fn encode_value(value: &Value, out: &mut Vec<u8>) {
    match value {
        Value::Null => {}
        Value::Boolean(v) => out.push(*v as u8),
        Value::Int8(v) => out.extend_from_slice(&v.to_le_bytes()),
        Value::Int16(v) => out.extend_from_slice(&v.to_le_bytes()),
        Value::Int32(v) => out.extend_from_slice(&v.to_le_bytes()),
        Value::Int64(v) => out.extend_from_slice(&v.to_le_bytes()),
        Value::UInt8(v) => out.push(*v),
        Value::UInt16(v) => out.extend_from_slice(&v.to_le_bytes()),
        Value::UInt32(v) => out.extend_from_slice(&v.to_le_bytes()),
        Value::UInt64(v) => out.extend_from_slice(&v.to_le_bytes()),
        Value::VarInt(v) => push_varint(*v, out),
        Value::VarUInt(v) => push_varuint(*v, out),
        Value::Float32(v) => out.extend_from_slice(&v.to_le_bytes()),
        Value::Float64(v) => out.extend_from_slice(&v.to_le_bytes()),
        Value::Float128(v) => out.extend_from_slice(&v.to_bytes()),
        Value::Decimal(v) => out.extend_from_slice(&v.to_bytes()),
        Value::DateTime(v) => out.extend_from_slice(&v.ticks().to_le_bytes()),
        Value::UnixDateTime(v) => out.extend_from_slice(&v.millis().to_le_bytes()),
        Value::Guid(v) => out.extend_from_slice(v.as_bytes()),
        Value::MongoDbObjectId(v) => out.extend_from_slice(v.as_bytes()),
        Value::Utf8(s) => {
            push_varuint(s.len() as u64, out);
            out.extend_from_slice(s.as_bytes());
        }
        Value::Binary(b) => {
            push_varuint(b.len() as u64, out);
            out.extend_from_slice(b);
        }
    }
}

fn length_prefixed(buf: &[u8], offset: usize) -> RowResult<(usize, usize)> {
    let rest = buf.get(offset..).ok_or(RowError::TypeMismatch)?;
    let (len, read) = decode_varuint(rest).map_err(corrupt)?;
    let len = usize::try_from(len).map_err(corrupt)?;
    slice(buf, offset + read, len)?;
    Ok((read, len))
}

/// Size in bytes of the leaf payload of type `t` starting at `offset`.
pub(crate) fn payload_len(buf: &[u8], offset: usize, t: LayoutType) -> RowResult<usize> {
    if let Some(n) = t.fixed_size() {
        slice(buf, offset, n)?;
        return Ok(n);
    }
    match t {
        LayoutType::VarInt | LayoutType::VarUInt => {
            let rest = buf.get(offset..).ok_or(RowError::TypeMismatch)?;
            let (_, read) = decode_varuint(rest).map_err(corrupt)?;
            Ok(read)
        }
        LayoutType::Utf8 | LayoutType::Binary => {
            let (read, len) = length_prefixed(buf, offset)?;
            Ok(read + len)
        }
        _ => Err(RowError::TypeMismatch),
    }
}

/// Decodes the leaf payload of type `t` at `offset`, returning the value and
/// the number of bytes it occupied.
pub(crate) fn decode_value(buf: &[u8], offset: usize, t: LayoutType) -> RowResult<(Value, usize)> {
    match t {
        LayoutType::VarInt => {
            let rest = buf.get(offset..).ok_or(RowError::TypeMismatch)?;
            let (v, read) = decode_varint(rest).map_err(corrupt)?;
            Ok((Value::VarInt(v), read))
        }
        LayoutType::VarUInt => {
            let rest = buf.get(offset..).ok_or(RowError::TypeMismatch)?;
            let (v, read) = decode_varuint(rest).map_err(corrupt)?;
            Ok((Value::VarUInt(v), read))
        }
        LayoutType::Utf8 => {
            let (read, len) = length_prefixed(buf, offset)?;
            let bytes = slice(buf, offset + read, len)?;
            let s = std::str::from_utf8(bytes).map_err(corrupt)?;
            Ok((Value::Utf8(s.to_string()), read + len))
        }
        LayoutType::Binary => {
            let (read, len) = length_prefixed(buf, offset)?;
            let bytes = slice(buf, offset + read, len)?;
            Ok((Value::Binary(bytes.to_vec()), read + len))
        }
        t => {
            let n = t.fixed_size().ok_or(RowError::TypeMismatch)?;
            let value = decode_fixed_width(t, slice(buf, offset, n)?)?;
            Ok((value, n))
        }
    }
}

/// Decodes a fixed-width leaf from exactly its payload bytes. Fixed Utf8 and
/// Binary columns take the whole slice.
pub(crate) fn decode_fixed_width(t: LayoutType, bytes: &[u8]) -> RowResult<Value> {
    let value = match t {
        LayoutType::Null => Value::Null,
        LayoutType::Boolean => match bytes.first() {
            Some(0) => Value::Boolean(false),
            Some(1) => Value::Boolean(true),
            _ => return Err(RowError::TypeMismatch),
        },
        LayoutType::Int8 => Value::Int8(i8::from_le_bytes(array(bytes, 0)?)),
        LayoutType::Int16 => Value::Int16(i16::from_le_bytes(array(bytes, 0)?)),
        LayoutType::Int32 => Value::Int32(i32::from_le_bytes(array(bytes, 0)?)),
        LayoutType::Int64 => Value::Int64(i64::from_le_bytes(array(bytes, 0)?)),
        LayoutType::UInt8 => Value::UInt8(u8::from_le_bytes(array(bytes, 0)?)),
        LayoutType::UInt16 => Value::UInt16(u16::from_le_bytes(array(bytes, 0)?)),
        LayoutType::UInt32 => Value::UInt32(u32::from_le_bytes(array(bytes, 0)?)),
        LayoutType::UInt64 => Value::UInt64(u64::from_le_bytes(array(bytes, 0)?)),
        LayoutType::Float32 => Value::Float32(f32::from_le_bytes(array(bytes, 0)?)),
        LayoutType::Float64 => Value::Float64(f64::from_le_bytes(array(bytes, 0)?)),
        LayoutType::Float128 => {
            Value::Float128(Float128::from_bytes(slice(bytes, 0, FLOAT128_SIZE)?).map_err(corrupt)?)
        }
        LayoutType::Decimal => {
            Value::Decimal(Decimal::from_bytes(slice(bytes, 0, DECIMAL_SIZE)?).map_err(corrupt)?)
        }
        LayoutType::DateTime => {
            Value::DateTime(DateTime::from_ticks(i64::from_le_bytes(array(bytes, 0)?)))
        }
        LayoutType::UnixDateTime => {
            Value::UnixDateTime(UnixDateTime::from_millis(i64::from_le_bytes(array(bytes, 0)?)))
        }
        LayoutType::Guid => Value::Guid(Uuid::from_bytes(array::<GUID_SIZE>(bytes, 0)?)),
        LayoutType::MongoDbObjectId => Value::MongoDbObjectId(MongoDbObjectId::new(
            array::<MONGODB_OBJECT_ID_SIZE>(bytes, 0)?,
        )),
        LayoutType::Utf8 => Value::Utf8(std::str::from_utf8(bytes).map_err(corrupt)?.to_string()),
        LayoutType::Binary => Value::Binary(bytes.to_vec()),
        _ => return Err(RowError::TypeMismatch),
    };
    Ok(value)
}

/// Fills a fixed-region slot. The slot is exactly the column's size; strings
/// must fill it exactly.
pub(crate) fn encode_fixed(value: &Value, slot: &mut [u8]) -> RowResult<()> {
    match value {
        Value::Utf8(s) => copy_exact(s.as_bytes(), slot),
        Value::Binary(b) => copy_exact(b, slot),
        Value::VarInt(_) | Value::VarUInt(_) => Err(RowError::TypeConstraint),
        other => {
            let mut buf = Vec::with_capacity(slot.len());
            encode_value(other, &mut buf);
            if buf.len() != slot.len() {
                return Err(RowError::TypeConstraint);
            }
            slot.copy_from_slice(&buf);
            Ok(())
        }
    }
}

fn copy_exact(bytes: &[u8], slot: &mut [u8]) -> RowResult<()> {
    if bytes.len() != slot.len() {
        return Err(RowError::TooBig);
    }
    slot.copy_from_slice(bytes);
    Ok(())
}

/// Appends the byte-comparable sort key of a leaf value.
pub(crate) fn append_leaf_key(value: &Value, out: &mut Vec<u8>) {
    match value {
        Value::Null => key::encode_null(out),
        Value::Boolean(v) => key::encode_bool(*v, out),
        Value::Float32(v) => key::encode_float32(*v, out),
        Value::Float64(v) => key::encode_float(*v, out),
        Value::Float128(v) => {
            let mut raw = [0u8; FLOAT128_SIZE];
            raw[..8].copy_from_slice(&((v.high as u64) ^ (1u64 << 63)).to_be_bytes());
            raw[8..].copy_from_slice(&v.low.to_be_bytes());
            key::encode_raw(&raw, out);
        }
        Value::Decimal(d) => {
            let (negative, digits, exponent) = d.normalized();
            key::encode_decimal(negative, &digits, exponent, out);
            key::encode_exact(&d.to_bytes(), out);
        }
        Value::DateTime(v) => key::encode_int(v.ticks(), out),
        Value::UnixDateTime(v) => key::encode_int(v.millis(), out),
        Value::Guid(v) => key::encode_raw(v.as_bytes(), out),
        Value::MongoDbObjectId(v) => key::encode_raw(v.as_bytes(), out),
        Value::Utf8(s) => key::encode_text(s, out),
        Value::Binary(b) => key::encode_blob(b, out),
        other => match (other.as_i64(), other.as_u64()) {
            (Some(i), _) => key::encode_int(i, out),
            (_, Some(u)) => key::encode_uint(u, out),
            _ => key::encode_null(out),
        },
    }
}
