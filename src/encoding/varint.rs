//! # Variable-Length Integer Encoding
//!
//! This module provides the LEB128 varint encoding used throughout the row
//! format: length prefixes of Utf8/Binary payloads, sparse path tokens, tuple
//! arities, and the payloads of the `VarInt`/`VarUInt` layout types.
//!
//! ## Encoding Format
//!
//! Unsigned values are split into 7-bit groups, least significant group first.
//! Every byte except the last has its high bit set:
//!
//! | Value Range                 | Bytes |
//! |-----------------------------|-------|
//! | 0 - 127                     | 1     |
//! | 128 - 16383                 | 2     |
//! | 16384 - 2097151             | 3     |
//! | 2097152 - 268435455         | 4     |
//! | ...                         | ...   |
//! | 2^63 - u64::MAX             | 10    |
//!
//! Signed values are zigzag-mapped first so that small magnitudes of either
//! sign stay short:
//!
//! ```text
//!  0 -> 0,  -1 -> 1,  1 -> 2,  -2 -> 3,  2 -> 4, ...
//! ```
//!
//! ## Boundary Values
//!
//! - 127: Maximum 1-byte value
//! - 128: Minimum 2-byte value
//! - 16383: Maximum 2-byte value
//! - 16384: Minimum 3-byte value
//! - u64::MAX: 10 bytes
//!
//! ## Usage Example
//!
//! ```rust
//! use hybridrow::encoding::varint::{decode_varuint, encode_varuint, varuint_len};
//!
//! let mut buf = [0u8; 10];
//! let written = encode_varuint(300, &mut buf);
//! assert_eq!(written, varuint_len(300));
//!
//! let (value, read) = decode_varuint(&buf).unwrap();
//! assert_eq!((value, read), (300, 2));
//! ```
//!
//! ## Error Handling
//!
//! Decoders return `eyre::Result` with descriptive messages:
//! - Empty buffer: "empty buffer for varint decode"
//! - Truncated encoding: "truncated varint after N bytes"
//! - More than 10 groups: "varint exceeds 64 bits"

use eyre::{bail, ensure, Result};

pub const MAX_VARINT_LEN: usize = 10;

pub fn varuint_len(value: u64) -> usize {
    let bits = 64 - (value | 1).leading_zeros() as usize;
    bits.div_ceil(7)
}

pub fn varint_len(value: i64) -> usize {
    varuint_len(zigzag_encode(value))
}

#[inline]
pub fn zigzag_encode(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

#[inline]
pub fn zigzag_decode(value: u64) -> i64 {
    ((value >> 1) as i64) ^ -((value & 1) as i64)
}

pub fn encode_varuint(mut value: u64, buf: &mut [u8]) -> usize {
    let mut i = 0;
    while value >= 0x80 {
        buf[i] = (value as u8) | 0x80;
        value >>= 7;
        i += 1;
    }
    buf[i] = value as u8;
    i + 1
}

pub fn encode_varint(value: i64, buf: &mut [u8]) -> usize {
    encode_varuint(zigzag_encode(value), buf)
}

/// Appends the encoding of `value` to `out`.
pub fn push_varuint(value: u64, out: &mut Vec<u8>) {
    let mut buf = [0u8; MAX_VARINT_LEN];
    let n = encode_varuint(value, &mut buf);
    out.extend_from_slice(&buf[..n]);
}

pub fn push_varint(value: i64, out: &mut Vec<u8>) {
    push_varuint(zigzag_encode(value), out);
}

pub fn decode_varuint(buf: &[u8]) -> Result<(u64, usize)> {
    ensure!(!buf.is_empty(), "empty buffer for varint decode");

    let mut value: u64 = 0;
    let mut shift = 0u32;
    for (i, &byte) in buf.iter().enumerate() {
        if i == MAX_VARINT_LEN {
            bail!("varint exceeds 64 bits");
        }
        let group = (byte & 0x7F) as u64;
        if shift == 63 && group > 1 {
            bail!("varint exceeds 64 bits");
        }
        value |= group << shift;
        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
        shift += 7;
    }
    bail!("truncated varint after {} bytes", buf.len())
}

pub fn decode_varint(buf: &[u8]) -> Result<(i64, usize)> {
    let (raw, read) = decode_varuint(buf)?;
    Ok((zigzag_decode(raw), read))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn varuint_len_single_byte_values() {
        assert_eq!(varuint_len(0), 1);
        assert_eq!(varuint_len(1), 1);
        assert_eq!(varuint_len(127), 1);
    }

    #[test]
    fn varuint_len_multi_byte_values() {
        assert_eq!(varuint_len(128), 2);
        assert_eq!(varuint_len(16383), 2);
        assert_eq!(varuint_len(16384), 3);
        assert_eq!(varuint_len(2_097_151), 3);
        assert_eq!(varuint_len(2_097_152), 4);
        assert_eq!(varuint_len(u64::MAX), 10);
    }

    #[test]
    fn encode_varuint_matches_len() {
        let mut buf = [0u8; MAX_VARINT_LEN];
        for value in [0, 1, 127, 128, 300, 16383, 16384, u32::MAX as u64, u64::MAX] {
            assert_eq!(encode_varuint(value, &mut buf), varuint_len(value), "value {}", value);
        }
    }

    #[test]
    fn encode_varuint_two_byte_layout() {
        let mut buf = [0u8; MAX_VARINT_LEN];
        assert_eq!(encode_varuint(300, &mut buf), 2);
        assert_eq!(&buf[..2], &[0xAC, 0x02]);
    }

    #[test]
    fn decode_varuint_reads_back_boundaries() {
        let mut buf = [0u8; MAX_VARINT_LEN];
        for value in [0, 127, 128, 16383, 16384, 0xFFFF_FFFF, u64::MAX] {
            let n = encode_varuint(value, &mut buf);
            assert_eq!(decode_varuint(&buf[..n]).unwrap(), (value, n));
        }
    }

    #[test]
    fn decode_varuint_ignores_trailing_bytes() {
        let buf = [0x05, 0xFF, 0xFF];
        assert_eq!(decode_varuint(&buf).unwrap(), (5, 1));
    }

    #[test]
    fn decode_varuint_rejects_empty() {
        let err = decode_varuint(&[]).unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn decode_varuint_rejects_truncated() {
        let err = decode_varuint(&[0x80, 0x80]).unwrap_err();
        assert!(err.to_string().contains("truncated"));
    }

    #[test]
    fn decode_varuint_rejects_overlong() {
        let buf = [0xFF; 11];
        assert!(decode_varuint(&buf).is_err());
    }

    #[test]
    fn zigzag_maps_small_magnitudes_to_small_codes() {
        assert_eq!(zigzag_encode(0), 0);
        assert_eq!(zigzag_encode(-1), 1);
        assert_eq!(zigzag_encode(1), 2);
        assert_eq!(zigzag_encode(-2), 3);
        assert_eq!(zigzag_encode(i64::MAX), u64::MAX - 1);
        assert_eq!(zigzag_encode(i64::MIN), u64::MAX);
    }

    #[test]
    fn signed_varint_extremes() {
        let mut buf = [0u8; MAX_VARINT_LEN];
        for value in [0, -1, 1, -64, 64, i64::MIN, i64::MAX] {
            let n = encode_varint(value, &mut buf);
            assert_eq!(n, varint_len(value));
            assert_eq!(decode_varint(&buf[..n]).unwrap(), (value, n));
        }
    }

    #[test]
    fn push_helpers_append() {
        let mut out = vec![0xAA];
        push_varuint(128, &mut out);
        push_varint(-1, &mut out);
        assert_eq!(out, vec![0xAA, 0x80, 0x01, 0x01]);
    }
}
