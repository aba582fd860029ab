//! # Fixed-Width Value Types
//!
//! Small value types for the leaf layout types that have no natural Rust
//! primitive: 128-bit floats, two timestamp flavours and MongoDB object ids.
//!
//! | Type | Representation | Encoded size |
//! |------|----------------|--------------|
//! | `Float128` | IEEE 754 binary128 split into two 64-bit halves | 16 bytes (low, high) |
//! | `DateTime` | 100 ns ticks since 0001-01-01T00:00:00Z | 8 bytes |
//! | `UnixDateTime` | milliseconds since 1970-01-01T00:00:00Z | 8 bytes |
//! | `MongoDbObjectId` | 12 opaque bytes | 12 bytes |
//!
//! Float128 values are carried bit-for-bit; no arithmetic is offered.

use std::fmt;

use eyre::{ensure, Result};

use crate::config::{FLOAT128_SIZE, MONGODB_OBJECT_ID_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Float128 {
    pub high: i64,
    pub low: u64,
}

impl Float128 {
    pub fn new(high: i64, low: u64) -> Self {
        Self { high, low }
    }

    pub fn to_bytes(&self) -> [u8; FLOAT128_SIZE] {
        let mut out = [0u8; FLOAT128_SIZE];
        out[..8].copy_from_slice(&self.low.to_le_bytes());
        out[8..].copy_from_slice(&self.high.to_le_bytes());
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        ensure!(
            bytes.len() >= FLOAT128_SIZE,
            "buffer too small for Float128: {} < {}",
            bytes.len(),
            FLOAT128_SIZE
        );
        let mut low = [0u8; 8];
        let mut high = [0u8; 8];
        low.copy_from_slice(&bytes[..8]);
        high.copy_from_slice(&bytes[8..16]);
        Ok(Self {
            high: i64::from_le_bytes(high),
            low: u64::from_le_bytes(low),
        })
    }
}

/// Ticks between 0001-01-01 and the Unix epoch.
pub const UNIX_EPOCH_TICKS: i64 = 621_355_968_000_000_000;

pub const TICKS_PER_MILLISECOND: i64 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct DateTime(i64);

impl DateTime {
    pub fn from_ticks(ticks: i64) -> Self {
        Self(ticks)
    }

    pub fn ticks(&self) -> i64 {
        self.0
    }
}

impl From<UnixDateTime> for DateTime {
    fn from(value: UnixDateTime) -> Self {
        DateTime(
            value
                .millis()
                .saturating_mul(TICKS_PER_MILLISECOND)
                .saturating_add(UNIX_EPOCH_TICKS),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct UnixDateTime(i64);

impl UnixDateTime {
    pub fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    pub fn millis(&self) -> i64 {
        self.0
    }
}

impl From<DateTime> for UnixDateTime {
    fn from(value: DateTime) -> Self {
        UnixDateTime((value.ticks() - UNIX_EPOCH_TICKS).div_euclid(TICKS_PER_MILLISECOND))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct MongoDbObjectId([u8; MONGODB_OBJECT_ID_SIZE]);

impl MongoDbObjectId {
    pub fn new(bytes: [u8; MONGODB_OBJECT_ID_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        ensure!(
            bytes.len() >= MONGODB_OBJECT_ID_SIZE,
            "buffer too small for MongoDbObjectId: {} < {}",
            bytes.len(),
            MONGODB_OBJECT_ID_SIZE
        );
        let mut out = [0u8; MONGODB_OBJECT_ID_SIZE];
        out.copy_from_slice(&bytes[..MONGODB_OBJECT_ID_SIZE]);
        Ok(Self(out))
    }

    pub fn as_bytes(&self) -> &[u8; MONGODB_OBJECT_ID_SIZE] {
        &self.0
    }
}

impl fmt::Display for MongoDbObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.0 {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float128_stores_low_half_first() {
        let f = Float128::new(-1, 2);
        let bytes = f.to_bytes();
        assert_eq!(&bytes[..8], &2u64.to_le_bytes());
        assert_eq!(&bytes[8..], &(-1i64).to_le_bytes());
        assert_eq!(Float128::from_bytes(&bytes).unwrap(), f);
    }

    #[test]
    fn unix_epoch_converts_to_ticks() {
        let epoch = DateTime::from(UnixDateTime::from_millis(0));
        assert_eq!(epoch.ticks(), UNIX_EPOCH_TICKS);
        assert_eq!(UnixDateTime::from(epoch).millis(), 0);
    }

    #[test]
    fn pre_epoch_ticks_round_down() {
        let before = DateTime::from_ticks(UNIX_EPOCH_TICKS - 1);
        assert_eq!(UnixDateTime::from(before).millis(), -1);
    }

    #[test]
    fn object_id_displays_as_hex() {
        let id = MongoDbObjectId::new([0xAB; 12]);
        assert_eq!(id.to_string(), "ab".repeat(12));
        assert!(MongoDbObjectId::from_slice(&[0u8; 11]).is_err());
    }
}
