//! # Fixed and Variable Codecs
//!
//! Schema-declared columns of a layout scope (the root or a udt) live at
//! positions the layout computed at compile time.
//!
//! ## Fixed Columns
//!
//! ```text
//! scope.start
//!     │
//!     ▼
//!     [ bitmask ][ col 0 payload ][ col 1 payload ] ...
//!       │           ▲
//!       │           └── scope.start + column.offset()
//!       └── null bit: set = present; bool bit: value of a fixed boolean
//! ```
//!
//! Fixed writes never change the row length. Deleting a nullable fixed column
//! clears its bits and zeroes its payload.
//!
//! ## Variable Columns
//!
//! The variable region holds the present variable columns back to back, in
//! declaration order, right after the fixed region. The presence bit of each
//! variable column lives in the bitmask, so locating column `i` walks the
//! present columns before it.

use crate::layouts::LayoutColumn;
use crate::schema::StorageKind;
use crate::types::{LayoutType, Value};

use super::buffer::RowBuffer;
use super::codec::{decode_fixed_width, decode_value, encode_fixed, encode_value, payload_len};
use super::cursor::RowCursor;
use super::element::variable_offset;
use super::result::{RowError, RowResult};

/// True if `column` is a `t` column of `storage` in the layout governing
/// `scope`.
fn owns(scope: &RowCursor, column: &LayoutColumn, storage: StorageKind, t: LayoutType) -> bool {
    scope.scope_type == LayoutType::Udt
        && column.storage() == storage
        && column.layout_type() == t
        && scope
            .layout
            .columns()
            .get(column.index())
            .is_some_and(|c| c.full_path() == column.full_path())
}

impl LayoutType {
    pub fn read_fixed(self, row: &RowBuffer, scope: &RowCursor, column: &LayoutColumn) -> RowResult<Value> {
        if !owns(scope, column, StorageKind::Fixed, self) {
            return Err(RowError::TypeMismatch);
        }
        if let Some(bit) = column.null_bit() {
            if !row.bit(scope.start, bit)? {
                return Err(RowError::NotFound);
            }
        }
        match self {
            LayoutType::Null => Ok(Value::Null),
            LayoutType::Boolean => {
                let bit = column.bool_bit().ok_or(RowError::TypeMismatch)?;
                Ok(Value::Boolean(row.bit(scope.start, bit)?))
            }
            t => decode_fixed_width(t, row.bytes(scope.start + column.offset(), column.size())?),
        }
    }

    /// `read_fixed`, also yielding the type's default value when the read
    /// fails.
    pub fn read_fixed_or_default(
        self,
        row: &RowBuffer,
        scope: &RowCursor,
        column: &LayoutColumn,
    ) -> (RowResult, Value) {
        match self.read_fixed(row, scope, column) {
            Ok(value) => (Ok(()), value),
            Err(e) => (Err(e), Value::default_for(self).unwrap_or(Value::Null)),
        }
    }

    pub fn write_fixed(
        self,
        row: &mut RowBuffer,
        scope: &RowCursor,
        column: &LayoutColumn,
        value: &Value,
    ) -> RowResult {
        if scope.immutable {
            return Err(RowError::InsufficientPermissions);
        }
        if !owns(scope, column, StorageKind::Fixed, self) || value.layout_type() != self {
            return Err(RowError::TypeConstraint);
        }

        match value {
            Value::Null => {}
            Value::Boolean(on) => {
                let bit = column.bool_bit().ok_or(RowError::TypeConstraint)?;
                row.set_bit(scope.start, bit, *on)?;
            }
            other => {
                let mut slot = vec![0u8; column.size()];
                encode_fixed(other, &mut slot)?;
                row.write_bytes(scope.start + column.offset(), &slot)?;
            }
        }
        if let Some(bit) = column.null_bit() {
            row.set_bit(scope.start, bit, true)?;
        }
        Ok(())
    }

    pub fn delete_fixed(self, row: &mut RowBuffer, scope: &RowCursor, column: &LayoutColumn) -> RowResult {
        if scope.immutable {
            return Err(RowError::InsufficientPermissions);
        }
        if !owns(scope, column, StorageKind::Fixed, self) {
            return Err(RowError::TypeMismatch);
        }
        let null_bit = column.null_bit().ok_or(RowError::TypeMismatch)?;

        if let Some(bit) = column.bool_bit() {
            row.set_bit(scope.start, bit, false)?;
        }
        row.write_bytes(scope.start + column.offset(), &vec![0u8; column.size()])?;
        row.set_bit(scope.start, null_bit, false)
    }

    pub fn read_variable(self, row: &RowBuffer, scope: &RowCursor, column: &LayoutColumn) -> RowResult<Value> {
        if !owns(scope, column, StorageKind::Variable, self) {
            return Err(RowError::TypeMismatch);
        }
        let bit = column.null_bit().ok_or(RowError::TypeMismatch)?;
        if !row.bit(scope.start, bit)? {
            return Err(RowError::NotFound);
        }
        let offset = variable_offset(row, &scope.layout, scope.start, column.offset())?;
        let (value, _) = decode_value(row.as_bytes(), offset, self)?;
        Ok(value)
    }

    /// Writes a variable column, growing or shrinking the row by the change
    /// in encoded length.
    pub fn write_variable(
        self,
        row: &mut RowBuffer,
        scope: &RowCursor,
        column: &LayoutColumn,
        value: &Value,
    ) -> RowResult {
        if scope.immutable {
            return Err(RowError::InsufficientPermissions);
        }
        if !owns(scope, column, StorageKind::Variable, self) || value.layout_type() != self {
            return Err(RowError::TypeConstraint);
        }
        let bit = column.null_bit().ok_or(RowError::TypeConstraint)?;
        if column.size() > 0 {
            if let Some(bytes) = value.as_bytes() {
                if bytes.len() > column.size() {
                    return Err(RowError::TooBig);
                }
            }
        }

        let offset = variable_offset(row, &scope.layout, scope.start, column.offset())?;
        let existing = if row.bit(scope.start, bit)? {
            payload_len(row.as_bytes(), offset, self)?
        } else {
            0
        };
        let mut bytes = Vec::new();
        encode_value(value, &mut bytes);

        row.splice(offset, existing, &bytes);
        row.set_bit(scope.start, bit, true)
    }

    pub fn delete_variable(self, row: &mut RowBuffer, scope: &RowCursor, column: &LayoutColumn) -> RowResult {
        if scope.immutable {
            return Err(RowError::InsufficientPermissions);
        }
        if !owns(scope, column, StorageKind::Variable, self) {
            return Err(RowError::TypeMismatch);
        }
        let bit = column.null_bit().ok_or(RowError::TypeMismatch)?;
        if !row.bit(scope.start, bit)? {
            return Err(RowError::NotFound);
        }

        let offset = variable_offset(row, &scope.layout, scope.start, column.offset())?;
        let len = payload_len(row.as_bytes(), offset, self)?;
        row.splice(offset, len, &[]);
        row.set_bit(scope.start, bit, false)
    }
}
