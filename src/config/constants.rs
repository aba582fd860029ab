//! # HybridRow Format Constants
//!
//! This module centralizes the constants that define the binary row format.
//! Several of them are part of the wire contract: changing them makes existing
//! rows unreadable, so they are grouped here with their dependencies spelled
//! out.
//!
//! ## Dependency Graph
//!
//! ```text
//! HEADER_SIZE (5 bytes)
//!       │
//!       ├─> VERSION_SIZE (1 byte, format version)
//!       │
//!       └─> SCHEMA_ID_SIZE (4 bytes, owning schema id, little-endian)
//!
//! SCOPE_COUNT_SIZE (4 bytes)
//!       │
//!       └─> Element count prefix of typed array / typed set / typed map.
//!           MAX_SCOPE_ELEMENTS must fit in it.
//!
//! MAX_NESTING_DEPTH (64)
//!       │
//!       └─> Bounds recursion when sizing or comparing nested scopes so that
//!           malformed rows cannot overflow the stack.
//! ```
//!
//! ## Critical Invariants
//!
//! 1. `HEADER_SIZE == VERSION_SIZE + SCHEMA_ID_SIZE`
//! 2. `MAX_SCOPE_ELEMENTS <= u32::MAX`
//! 3. `MAX_DECIMAL_SCALE < 32` (scale lives in a single byte of the payload)

// ============================================================================
// ROW HEADER
// ============================================================================

/// Current row format version written by `RowBuffer::init_layout`.
pub const HYBRID_ROW_VERSION: u8 = 1;

/// Size of the format version field.
pub const VERSION_SIZE: usize = 1;

/// Size of the schema id field.
pub const SCHEMA_ID_SIZE: usize = 4;

/// Total size of the row header preceding the fixed region.
pub const HEADER_SIZE: usize = VERSION_SIZE + SCHEMA_ID_SIZE;

const _: () = assert!(
    HEADER_SIZE == VERSION_SIZE + SCHEMA_ID_SIZE,
    "HEADER_SIZE must cover exactly the version and schema id fields"
);

// ============================================================================
// SPARSE SCOPES
// ============================================================================

/// Size of the element count that prefixes typed (homogeneous) scopes.
pub const SCOPE_COUNT_SIZE: usize = 4;

/// Upper bound on the number of elements a typed scope can hold.
pub const MAX_SCOPE_ELEMENTS: u64 = u32::MAX as u64;

const _: () = assert!(
    MAX_SCOPE_ELEMENTS <= u32::MAX as u64,
    "typed scope counts are stored as u32"
);

/// Maximum depth of nested scopes the engine will descend into when sizing,
/// comparing or defaulting values.
pub const MAX_NESTING_DEPTH: usize = 64;

// ============================================================================
// VALUE ENCODING
// ============================================================================

/// Encoded size of a Decimal payload.
pub const DECIMAL_SIZE: usize = 16;

/// Largest decimal scale (digits after the decimal point).
pub const MAX_DECIMAL_SCALE: u8 = 28;

const _: () = assert!(MAX_DECIMAL_SCALE < 32, "decimal scale must fit in 5 bits");

/// Encoded size of a Float128 payload.
pub const FLOAT128_SIZE: usize = 16;

/// Encoded size of a Guid payload.
pub const GUID_SIZE: usize = 16;

/// Encoded size of a MongoDB object id payload.
pub const MONGODB_OBJECT_ID_SIZE: usize = 12;

// ============================================================================
// BUFFER SIZING
// ============================================================================

/// Initial capacity reserved by `RowBuffer::default()`.
pub const DEFAULT_ROW_CAPACITY: usize = 512;
