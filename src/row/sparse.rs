//! # Sparse Codec
//!
//! Reads, writes and deletes self-describing values at a cursor position.
//! Every leaf type and every scope type goes through the same write path, so
//! permission, constraint and existence checks run in one order everywhere:
//!
//! 1. immutable cursor, or a direct write into a set or map:
//!    `InsufficientPermissions`
//! 2. `InsertAt` outside an array: `TypeConstraint`
//! 3. value does not fit the scope: typed element type, tuple slot type,
//!    declared column type, unschematized path, tuple arity: `TypeConstraint`
//! 4. `Insert` over a present value: `Exists`; `Update` of an absent value:
//!    `NotFound`
//!
//! Only after all checks pass is a single splice applied to the row, so a
//! refused write leaves the bytes untouched.

use crate::config::MAX_SCOPE_ELEMENTS;
use crate::layouts::{LayoutColumn, TypeArgumentList};
use crate::schema::StorageKind;
use crate::types::{LayoutType, Value};

use super::buffer::RowBuffer;
use super::codec::{decode_value, encode_value};
use super::cursor::RowCursor;
use super::element::{element_type, SparsePath};
use super::result::{RowError, RowResult, UpdateOptions};

pub(crate) fn check_writable(edit: &RowCursor, options: UpdateOptions) -> RowResult {
    if edit.immutable || edit.scope_type.is_unique_scope() {
        return Err(RowError::InsufficientPermissions);
    }
    if options == UpdateOptions::InsertAt
        && !matches!(edit.scope_type, LayoutType::Array | LayoutType::TypedArray)
    {
        return Err(RowError::TypeConstraint);
    }
    Ok(())
}

/// The schema column declared at the cursor's path, if any.
fn declared_column(edit: &RowCursor) -> Option<&LayoutColumn> {
    let scope_path = edit.scope_path.as_deref()?;
    let segment = edit.read_path().filter(|s| !s.is_empty())?;
    if scope_path.is_empty() {
        edit.layout.find_column(segment)
    } else {
        edit.layout
            .find_column(&format!("{}.{}", scope_path, segment))
    }
}

/// Checks that a value of type `t<args>` may live at the cursor position.
/// The cursor must be primed.
pub(crate) fn check_cell_type(edit: &RowCursor, t: LayoutType, args: &TypeArgumentList) -> RowResult {
    match edit.scope_type {
        scope if scope.is_typed_scope() => {
            let expected =
                element_type(scope, &edit.scope_type_args, edit.index).ok_or(RowError::TypeConstraint)?;
            if expected.layout_type() != t || expected.type_args() != args {
                return Err(RowError::TypeConstraint);
            }
        }
        LayoutType::Tuple => {
            let slot = edit
                .scope_type_args
                .get(edit.index)
                .ok_or(RowError::TypeConstraint)?;
            let fits = t == LayoutType::Null
                || (slot.layout_type() == t && slot.type_args() == args);
            if !fits {
                return Err(RowError::TypeConstraint);
            }
        }
        scope if scope.is_named_scope() => match declared_column(edit) {
            Some(column) => {
                if column.storage() != StorageKind::Sparse
                    || column.layout_type() != t
                    || column.type_args() != args
                {
                    return Err(RowError::TypeConstraint);
                }
            }
            None => {
                let staged = edit.read_path().map_or(true, str::is_empty);
                if !staged && !edit.layout.allows_unschematized() {
                    return Err(RowError::TypeConstraint);
                }
            }
        },
        _ => {}
    }
    Ok(())
}

pub(crate) fn check_existence(edit: &RowCursor, options: UpdateOptions) -> RowResult {
    match options {
        UpdateOptions::Insert if edit.exists => Err(RowError::Exists),
        UpdateOptions::Update if !edit.exists => Err(RowError::NotFound),
        _ => Ok(()),
    }
}

/// Writes `t<args>` with `payload` at the cursor, replacing the current
/// element unless inserting. Leaves the cursor on the written element.
pub(crate) fn commit_write(
    row: &mut RowBuffer,
    edit: &mut RowCursor,
    t: LayoutType,
    args: &TypeArgumentList,
    payload: &[u8],
    options: UpdateOptions,
) -> RowResult {
    if edit.scope_type.is_named_scope() && edit.path.is_none() {
        edit.path = Some(SparsePath::empty());
    }

    let mut bytes = Vec::with_capacity(payload.len() + 8);
    if !edit.scope_type.is_typed_scope() {
        bytes.push(t.code());
        args.encode(t, &mut bytes);
    }
    if let Some(path) = edit.path.as_ref().filter(|_| edit.scope_type.is_named_scope()) {
        path.encode(&edit.layout, &mut bytes);
    }
    let value_start = bytes.len();
    bytes.extend_from_slice(payload);

    let replace = edit.exists && options != UpdateOptions::InsertAt;
    let count = if !replace && edit.scope_type.is_counted_scope() {
        let count = row.read_count(edit.start)?;
        if u64::from(count) >= MAX_SCOPE_ELEMENTS {
            return Err(RowError::TooBig);
        }
        Some(count)
    } else {
        None
    };
    let remove = if replace {
        edit.end_offset - edit.meta_offset
    } else {
        0
    };

    if let Some(count) = count {
        row.write_count(edit.start, count + 1)?;
    }
    row.splice(edit.meta_offset, remove, &bytes);

    edit.primed = true;
    edit.exists = true;
    edit.cell_type = Some(t);
    edit.cell_type_args = args.clone();
    edit.value_offset = edit.meta_offset + value_start;
    edit.end_offset = edit.meta_offset + bytes.len();
    Ok(())
}

/// Removes the element under the cursor. The cursor stays at the same index
/// with nothing loaded; named scopes keep the path staged for a rewrite.
pub(crate) fn delete_current(row: &mut RowBuffer, edit: &mut RowCursor) -> RowResult {
    let count = if edit.scope_type.is_counted_scope() {
        Some(row.read_count(edit.start)?)
    } else {
        None
    };
    if let Some(count) = count {
        row.write_count(edit.start, count.saturating_sub(1))?;
    }
    row.splice(edit.meta_offset, edit.end_offset - edit.meta_offset, &[]);

    edit.exists = false;
    edit.cell_type = None;
    edit.cell_type_args = TypeArgumentList::default();
    edit.value_offset = edit.meta_offset;
    edit.end_offset = edit.meta_offset;
    if !edit.scope_type.is_named_scope() {
        edit.path = None;
    }
    Ok(())
}

impl LayoutType {
    /// Reads the leaf value under the cursor.
    pub fn read_sparse(self, row: &RowBuffer, edit: &RowCursor) -> RowResult<Value> {
        if !edit.exists() {
            return Err(RowError::NotFound);
        }
        if edit.cell_type != Some(self) || !self.is_leaf() {
            return Err(RowError::TypeMismatch);
        }
        let (value, _) = decode_value(row.as_bytes(), edit.value_offset, self)?;
        Ok(value)
    }

    /// Writes a leaf value at the cursor.
    pub fn write_sparse(
        self,
        row: &mut RowBuffer,
        edit: &mut RowCursor,
        value: &Value,
        options: UpdateOptions,
    ) -> RowResult {
        check_writable(edit, options)?;
        if !self.is_leaf() || value.layout_type() != self {
            return Err(RowError::TypeConstraint);
        }
        edit.prime(row)?;
        let args = TypeArgumentList::default();
        check_cell_type(edit, self, &args)?;
        check_existence(edit, options)?;

        let mut payload = Vec::new();
        encode_value(value, &mut payload);
        commit_write(row, edit, self, &args, &payload, options)
    }

    /// Deletes the value under the cursor, leaf or scope.
    pub fn delete_sparse(self, row: &mut RowBuffer, edit: &mut RowCursor) -> RowResult {
        if edit.immutable {
            return Err(RowError::InsufficientPermissions);
        }
        if edit.scope_type.is_fixed_arity() {
            return Err(RowError::TypeConstraint);
        }
        if !edit.prime(row)? {
            return Err(RowError::NotFound);
        }
        if edit.cell_type != Some(self) {
            return Err(RowError::TypeMismatch);
        }
        delete_current(row, edit)
    }
}
