//! # Row Header
//!
//! The five bytes that start every row:
//!
//! ```text
//! Offset  Size  Field
//! 0       1     format version
//! 1       4     owning schema id (i32, little-endian)
//! ```
//!
//! Typed array, set and map scopes start with a little-endian `u32` element
//! count, modelled by `ScopeCount`.

use eyre::{ensure, Result};
use zerocopy::little_endian::{I32, U32};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use crate::config::{HEADER_SIZE, SCOPE_COUNT_SIZE};
use crate::schema::SchemaId;

#[repr(C)]
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
pub struct RowHeader {
    version: u8,
    schema_id: I32,
}

const _: () = assert!(std::mem::size_of::<RowHeader>() == HEADER_SIZE);

impl RowHeader {
    pub fn new(version: u8, schema_id: SchemaId) -> Self {
        Self {
            version,
            schema_id: I32::new(schema_id.0),
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<&Self> {
        ensure!(
            bytes.len() >= HEADER_SIZE,
            "buffer too small for RowHeader: {} < {}",
            bytes.len(),
            HEADER_SIZE
        );
        Self::ref_from_bytes(&bytes[..HEADER_SIZE])
            .map_err(|e| eyre::eyre!("failed to parse RowHeader: {:?}", e))
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    zerocopy_accessors! {
        schema_id: i32,
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
pub struct ScopeCount {
    count: U32,
}

const _: () = assert!(std::mem::size_of::<ScopeCount>() == SCOPE_COUNT_SIZE);

impl ScopeCount {
    pub fn new(count: u32) -> Self {
        Self {
            count: U32::new(count),
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<&Self> {
        ensure!(
            bytes.len() >= SCOPE_COUNT_SIZE,
            "buffer too small for ScopeCount: {} < {}",
            bytes.len(),
            SCOPE_COUNT_SIZE
        );
        Self::ref_from_bytes(&bytes[..SCOPE_COUNT_SIZE])
            .map_err(|e| eyre::eyre!("failed to parse ScopeCount: {:?}", e))
    }

    zerocopy_accessors! {
        count: u32,
    }
}
