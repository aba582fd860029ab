//! # Decimal Values
//!
//! A base-10 fixed-point number with a 96-bit magnitude, a scale of at most
//! 28 digits after the point, and an explicit sign.
//!
//! ## Encoding (16 bytes)
//!
//! ```text
//! +---------------------------+--------+-------+------+
//! | magnitude (96 bits, LE)   | 0x0000 | scale | sign |
//! |        bytes 0..12        | 12..14 |  14   |  15  |
//! +---------------------------+--------+-------+------+
//! ```
//!
//! The sign byte is `0x80` for negative values and `0x00` otherwise. The sign is
//! stored separately from the magnitude so a negative zero survives a round
//! trip byte-for-byte.
//!
//! ## Ordering
//!
//! Two decimals with the same numeric value but different scales (`1.0` and
//! `1`) compare equal under [`Decimal::normalized`], which strips trailing
//! zeros. That form feeds the sort key of set and map elements.

use std::fmt;
use std::str::FromStr;

use eyre::{bail, ensure, Result};

use crate::config::{DECIMAL_SIZE, MAX_DECIMAL_SCALE};

const SIGN_MASK: u8 = 0x80;
const SCALE_INDEX: usize = 14;
const SIGN_INDEX: usize = 15;
const MAGNITUDE_BYTES: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Decimal {
    magnitude: u128,
    scale: u8,
    negative: bool,
}

impl Decimal {
    pub const MAX_MAGNITUDE: u128 = (1u128 << 96) - 1;

    pub const ZERO: Decimal = Decimal {
        magnitude: 0,
        scale: 0,
        negative: false,
    };

    /// Creates `mantissa * 10^-scale`.
    pub fn new(mantissa: i128, scale: u8) -> Result<Self> {
        Self::from_parts(mantissa < 0, mantissa.unsigned_abs(), scale)
    }

    pub fn from_parts(negative: bool, magnitude: u128, scale: u8) -> Result<Self> {
        ensure!(
            magnitude <= Self::MAX_MAGNITUDE,
            "decimal magnitude {} exceeds 96 bits",
            magnitude
        );
        ensure!(
            scale <= MAX_DECIMAL_SCALE,
            "decimal scale {} exceeds maximum {}",
            scale,
            MAX_DECIMAL_SCALE
        );
        Ok(Self {
            magnitude,
            scale,
            negative,
        })
    }

    pub fn mantissa(&self) -> i128 {
        let m = self.magnitude as i128;
        if self.negative {
            -m
        } else {
            m
        }
    }

    pub fn magnitude(&self) -> u128 {
        self.magnitude
    }

    pub fn scale(&self) -> u8 {
        self.scale
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    pub fn is_zero(&self) -> bool {
        self.magnitude == 0
    }

    pub fn to_bytes(&self) -> [u8; DECIMAL_SIZE] {
        let mut out = [0u8; DECIMAL_SIZE];
        out[..MAGNITUDE_BYTES].copy_from_slice(&self.magnitude.to_le_bytes()[..MAGNITUDE_BYTES]);
        out[SCALE_INDEX] = self.scale;
        out[SIGN_INDEX] = if self.negative { SIGN_MASK } else { 0 };
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        ensure!(
            bytes.len() >= DECIMAL_SIZE,
            "buffer too small for Decimal: {} < {}",
            bytes.len(),
            DECIMAL_SIZE
        );
        ensure!(
            bytes[MAGNITUDE_BYTES..SCALE_INDEX] == [0, 0],
            "decimal reserved bytes are not zero"
        );
        let sign = bytes[SIGN_INDEX];
        ensure!(
            sign & !SIGN_MASK == 0,
            "invalid decimal sign byte: {:#04x}",
            sign
        );

        let mut magnitude = [0u8; 16];
        magnitude[..MAGNITUDE_BYTES].copy_from_slice(&bytes[..MAGNITUDE_BYTES]);
        Self::from_parts(
            sign == SIGN_MASK,
            u128::from_le_bytes(magnitude),
            bytes[SCALE_INDEX],
        )
    }

    /// Returns `(negative, digits, exponent)` such that the value equals
    /// `0.digits x 10^exponent`, with no leading or trailing zero digits.
    /// Zero yields an empty digit string.
    pub fn normalized(&self) -> (bool, Vec<u8>, i32) {
        if self.magnitude == 0 {
            return (false, Vec::new(), 0);
        }
        let digits = self.magnitude.to_string().into_bytes();
        let exponent = digits.len() as i32 - self.scale as i32;
        let end = digits
            .iter()
            .rposition(|&d| d != b'0')
            .map(|p| p + 1)
            .unwrap_or(0);
        (self.negative, digits[..end].to_vec(), exponent)
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.magnitude.to_string();
        let scale = self.scale as usize;
        if self.negative {
            f.write_str("-")?;
        }
        if scale == 0 {
            return f.write_str(&digits);
        }
        if digits.len() > scale {
            let (int_part, frac_part) = digits.split_at(digits.len() - scale);
            write!(f, "{}.{}", int_part, frac_part)
        } else {
            write!(f, "0.{:0>width$}", digits, width = scale)
        }
    }
}

impl FromStr for Decimal {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self> {
        let (negative, body) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };
        let (int_part, frac_part) = match body.split_once('.') {
            Some((i, f)) => (i, f),
            None => (body, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            bail!("empty decimal literal: {:?}", s);
        }
        if !int_part.bytes().chain(frac_part.bytes()).all(|b| b.is_ascii_digit()) {
            bail!("invalid decimal literal: {:?}", s);
        }
        ensure!(
            frac_part.len() <= MAX_DECIMAL_SCALE as usize,
            "decimal literal {:?} has more than {} fractional digits",
            s,
            MAX_DECIMAL_SCALE
        );

        let mut magnitude: u128 = 0;
        for b in int_part.bytes().chain(frac_part.bytes()) {
            magnitude = magnitude
                .checked_mul(10)
                .and_then(|m| m.checked_add((b - b'0') as u128))
                .ok_or_else(|| eyre::eyre!("decimal literal {:?} overflows", s))?;
        }
        Self::from_parts(negative, magnitude, frac_part.len() as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_layout_matches_format() {
        let d = Decimal::new(-258, 2).unwrap();
        let bytes = d.to_bytes();
        assert_eq!(&bytes[..3], &[0x02, 0x01, 0x00]);
        assert_eq!(bytes[14], 2);
        assert_eq!(bytes[15], 0x80);
    }

    #[test]
    fn bytes_round_trip_preserves_negative_zero() {
        let d = Decimal::from_parts(true, 0, 3).unwrap();
        let back = Decimal::from_bytes(&d.to_bytes()).unwrap();
        assert_eq!(back, d);
        assert!(back.is_negative());
    }

    #[test]
    fn rejects_out_of_range_parts() {
        assert!(Decimal::from_parts(false, 1u128 << 96, 0).is_err());
        assert!(Decimal::new(1, 29).is_err());
    }

    #[test]
    fn from_bytes_rejects_reserved_bits() {
        let mut bytes = Decimal::new(1, 0).unwrap().to_bytes();
        bytes[12] = 1;
        assert!(Decimal::from_bytes(&bytes).is_err());

        let mut bytes = Decimal::new(1, 0).unwrap().to_bytes();
        bytes[15] = 0x01;
        assert!(Decimal::from_bytes(&bytes).is_err());
    }

    #[test]
    fn display_and_parse() {
        for text in ["0", "123.45", "-0.005", "79228162514264337593543950335"] {
            let d: Decimal = text.parse().unwrap();
            assert_eq!(d.to_string(), text);
        }
        assert!("1.2.3".parse::<Decimal>().is_err());
        assert!("".parse::<Decimal>().is_err());
    }

    #[test]
    fn normalized_strips_trailing_zeros() {
        let a = Decimal::new(10, 1).unwrap();
        let b = Decimal::new(1, 0).unwrap();
        assert_eq!(a.normalized(), b.normalized());
        assert_eq!(b.normalized(), (false, b"1".to_vec(), 1));
        assert_eq!(Decimal::new(-5, 3).unwrap().normalized(), (true, b"5".to_vec(), -2));
    }
}
