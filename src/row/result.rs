//! # Row Operation Results
//!
//! Every row operation reports a closed result code instead of an open-ended
//! error. `Ok` is success; `RowError` lists the ways a single operation can be
//! refused. A refused mutation leaves the row byte-identical.
//!
//! | Error | Meaning |
//! |-------|---------|
//! | `NotFound` | The addressed value is absent |
//! | `TypeMismatch` | The value is present but has a different runtime type, or the bytes are malformed |
//! | `TypeConstraint` | The write violates a static rule: declared type, tuple slot type, UDT schema id, `InsertAt` outside an array |
//! | `Exists` | `Insert` found a value already present |
//! | `InsufficientPermissions` | Mutation through a read-only cursor or directly inside a set/map |
//! | `TooBig` | Payload exceeds the declared length |
//!
//! Schema compilation and resolution failures are not row results; they use
//! `eyre` errors.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum RowError {
    #[error("value not found")]
    NotFound,
    #[error("value has a different type")]
    TypeMismatch,
    #[error("write violates a type constraint")]
    TypeConstraint,
    #[error("value already exists")]
    Exists,
    #[error("cursor does not permit mutation")]
    InsufficientPermissions,
    #[error("value exceeds the declared size")]
    TooBig,
}

pub type RowResult<T = ()> = Result<T, RowError>;

/// Malformed row bytes surface as a type mismatch.
#[inline]
pub(crate) fn corrupt<E>(_: E) -> RowError {
    RowError::TypeMismatch
}

/// Write policy for sparse values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UpdateOptions {
    /// Fail with `Exists` if the value is present.
    Insert,
    /// Fail with `NotFound` if the value is absent.
    Update,
    /// Write whether or not the value is present.
    #[default]
    Upsert,
    /// Insert before the current array element, shifting it and its
    /// successors up by one index.
    InsertAt,
}
