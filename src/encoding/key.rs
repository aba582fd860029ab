//! # Byte-Comparable Sort Keys for Unique Scopes
//!
//! Sets and maps keep their elements sorted and duplicate-free. Rather than
//! comparing values with type-specific logic at every probe, each element's key
//! is encoded into a byte string whose lexicographic order (a single `memcmp`)
//! is the element order. The order is part of the wire contract: two writers
//! must agree on it for their rows to be interchangeable.
//!
//! ## Element Order
//!
//! A sort key is `[layout code][value key]`. Elements therefore group by layout
//! code first (only relevant in untyped scopes, where types can mix) and then
//! order by value within a type.
//!
//! ## Value Key Prefixes
//!
//! ```text
//! 0x01       NULL
//! 0x02-0x03  Booleans (FALSE < TRUE)
//! 0x10-0x19  Numbers (NEG_INFINITY < negatives < ZERO < positives < POS_INFINITY < NAN)
//! 0x20-0x21  Strings (TEXT < BLOB)
//! 0x40       Raw fixed-width identifiers (GUID, object id, Float128 halves)
//! 0x60       Ordered composites (arrays, sets, tuples, maps)
//! 0x64       Opaque composites (objects, UDTs; ordered by escaped payload)
//! ```
//!
//! ## Number Encoding Strategy
//!
//! - Negative integers: NEG_INT prefix (0x12) + two's complement big-endian
//! - Zero: ZERO prefix (0x14) only
//! - Positive integers: POS_INT prefix (0x16) + big-endian bytes
//!
//! For floats, IEEE 754 bit manipulation preserves ordering:
//! - Negative floats: invert all bits (!bits)
//! - Positive floats: flip sign bit (bits ^ (1 << 63))
//!
//! ZERO and NAN are followed by the same ordered bits, so `-0.0` sorts just
//! below `0.0` and NaNs with different payloads stay distinct. `Float32` keys
//! append the ordered 32-bit pattern as well, since widening can quiet a
//! signaling NaN.
//!
//! Decimals are normalized to `0.d1d2d3... x 10^e` with trailing zeros removed,
//! then encoded as `[sign prefix][e + 128][ascii digits][terminator]`; negative
//! decimals invert the exponent and digit bytes so larger magnitudes sort first.
//! Normalization makes `1.0` and `1.00` equal, so the exact payload follows as
//! a fixed-width suffix (see [`encode_exact`]).
//!
//! ## Exact Keys
//!
//! Two elements of a unique scope are duplicates only when their payload bytes
//! are identical. Every key is therefore injective over payloads: values that
//! compare equal but encode differently still get different keys, ordered by
//! their trailing bits.
//!
//! ## Text Encoding Strategy
//!
//! ```text
//! 0x00 -> 0x00 0xFF  (escape null byte)
//! 0xFF -> 0xFF 0x00  (escape 0xFF byte)
//! Terminator: 0x00 0x00
//! ```
//!
//! ## Composite Encoding
//!
//! ```text
//! ORDERED: [0x60][element1][0x01][element2][0x01]...[0x00]
//! OPAQUE:  [0x64][escaped payload bytes][0x00 0x00]
//! ```
//!
//! The separator `0x01` sorts below every element prefix, so a composite that
//! is a strict prefix of another sorts first.

pub mod type_prefix {
    pub const NULL: u8 = 0x01;
    pub const FALSE: u8 = 0x02;
    pub const TRUE: u8 = 0x03;

    pub const NEG_INFINITY: u8 = 0x10;
    pub const NEG_INT: u8 = 0x12;
    pub const NEG_FLOAT: u8 = 0x13;
    pub const ZERO: u8 = 0x14;
    pub const POS_FLOAT: u8 = 0x15;
    pub const POS_INT: u8 = 0x16;
    pub const POS_INFINITY: u8 = 0x18;
    pub const NAN: u8 = 0x19;

    pub const TEXT: u8 = 0x20;
    pub const BLOB: u8 = 0x21;

    pub const RAW: u8 = 0x40;

    pub const ORDERED: u8 = 0x60;
    pub const OPAQUE: u8 = 0x64;

    pub const ELEMENT_SEPARATOR: u8 = 0x01;
    pub const COMPOSITE_END: u8 = 0x00;
}

pub fn encode_null(buf: &mut Vec<u8>) {
    buf.push(type_prefix::NULL);
}

pub fn encode_bool(value: bool, buf: &mut Vec<u8>) {
    buf.push(if value {
        type_prefix::TRUE
    } else {
        type_prefix::FALSE
    });
}

pub fn encode_int(n: i64, buf: &mut Vec<u8>) {
    if n < 0 {
        buf.push(type_prefix::NEG_INT);
        buf.extend((n as u64).to_be_bytes());
    } else if n == 0 {
        buf.push(type_prefix::ZERO);
    } else {
        buf.push(type_prefix::POS_INT);
        buf.extend((n as u64).to_be_bytes());
    }
}

pub fn encode_uint(n: u64, buf: &mut Vec<u8>) {
    if n == 0 {
        buf.push(type_prefix::ZERO);
    } else {
        buf.push(type_prefix::POS_INT);
        buf.extend(n.to_be_bytes());
    }
}

pub fn encode_float(f: f64, buf: &mut Vec<u8>) {
    if f.is_nan() {
        buf.push(type_prefix::NAN);
        buf.extend(ordered_bits(f).to_be_bytes());
    } else if f == f64::NEG_INFINITY {
        buf.push(type_prefix::NEG_INFINITY);
    } else if f == f64::INFINITY {
        buf.push(type_prefix::POS_INFINITY);
    } else if f == 0.0 {
        buf.push(type_prefix::ZERO);
        buf.extend(ordered_bits(f).to_be_bytes());
    } else if f < 0.0 {
        buf.push(type_prefix::NEG_FLOAT);
        buf.extend(ordered_bits(f).to_be_bytes());
    } else {
        buf.push(type_prefix::POS_FLOAT);
        buf.extend(ordered_bits(f).to_be_bytes());
    }
}

pub fn encode_float32(f: f32, buf: &mut Vec<u8>) {
    encode_float(f64::from(f), buf);
    let bits = f.to_bits();
    let ordered = if bits >> 31 == 1 { !bits } else { bits ^ (1u32 << 31) };
    buf.extend(ordered.to_be_bytes());
}

fn ordered_bits(f: f64) -> u64 {
    let bits = f.to_bits();
    if bits >> 63 == 1 {
        !bits
    } else {
        bits ^ (1u64 << 63)
    }
}

/// Encodes a decimal given its sign, its significant digits (ASCII, no leading
/// zeros) and the exponent `e` such that the value is `0.digits x 10^e`.
pub fn encode_decimal(negative: bool, digits: &[u8], exponent: i32, buf: &mut Vec<u8>) {
    let digits = trim_trailing_zeros(digits);
    if digits.is_empty() {
        buf.push(type_prefix::ZERO);
        return;
    }
    let biased = (exponent.clamp(-128, 127) + 128) as u8;
    if negative {
        buf.push(type_prefix::NEG_INT);
        buf.push(!biased);
        buf.extend(digits.iter().map(|d| !d));
        buf.push(0xFF);
    } else {
        buf.push(type_prefix::POS_INT);
        buf.push(biased);
        buf.extend_from_slice(digits);
        buf.push(0x00);
    }
}

fn trim_trailing_zeros(digits: &[u8]) -> &[u8] {
    let end = digits
        .iter()
        .rposition(|&d| d != b'0')
        .map(|p| p + 1)
        .unwrap_or(0);
    &digits[..end]
}

pub fn encode_text(s: &str, buf: &mut Vec<u8>) {
    buf.push(type_prefix::TEXT);
    escape_into(s.as_bytes(), buf);
}

pub fn encode_blob(b: &[u8], buf: &mut Vec<u8>) {
    buf.push(type_prefix::BLOB);
    escape_into(b, buf);
}

/// Fixed-width identifiers compare as raw big-endian byte strings.
pub fn encode_raw(bytes: &[u8], buf: &mut Vec<u8>) {
    buf.push(type_prefix::RAW);
    buf.extend_from_slice(bytes);
}

pub fn encode_opaque(payload: &[u8], buf: &mut Vec<u8>) {
    buf.push(type_prefix::OPAQUE);
    escape_into(payload, buf);
}

/// Appends the exact payload after a normalized value key. `raw` must have
/// the same width for every value of a type.
pub fn encode_exact(raw: &[u8], buf: &mut Vec<u8>) {
    buf.extend_from_slice(raw);
}

pub fn begin_composite(buf: &mut Vec<u8>) {
    buf.push(type_prefix::ORDERED);
}

pub fn separate_element(buf: &mut Vec<u8>) {
    buf.push(type_prefix::ELEMENT_SEPARATOR);
}

pub fn end_composite(buf: &mut Vec<u8>) {
    buf.push(type_prefix::COMPOSITE_END);
}

fn escape_into(bytes: &[u8], buf: &mut Vec<u8>) {
    for &byte in bytes {
        match byte {
            0x00 => {
                buf.push(0x00);
                buf.push(0xFF);
            }
            0xFF => {
                buf.push(0xFF);
                buf.push(0x00);
            }
            b => buf.push(b),
        }
    }
    buf.push(0x00);
    buf.push(0x00);
}
