//! # Layout Columns
//!
//! One compiled, schema-declared field. Fixed columns know their byte offset
//! and bits inside the fixed region; variable columns know their position in
//! the variable region; sparse columns are purely descriptive and only
//! constrain what may be written at their path.
//!
//! ## Bit Addressing
//!
//! ```text
//! fixed region:  [ bitmask bytes ............ ][ fixed payloads ... ]
//!                  bit 0 = byte 0, mask 0x01
//!                  bit 9 = byte 1, mask 0x02
//! ```

use crate::schema::StorageKind;
use crate::types::LayoutType;

use super::TypeArgumentList;

/// Index of a single bit in the bitmask at the start of a fixed region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayoutBit(usize);

impl LayoutBit {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }

    #[inline]
    pub fn byte_offset(self) -> usize {
        self.0 / 8
    }

    #[inline]
    pub fn mask(self) -> u8 {
        1 << (self.0 % 8)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutColumn {
    pub(crate) path: String,
    pub(crate) full_path: String,
    pub(crate) layout_type: LayoutType,
    pub(crate) type_args: TypeArgumentList,
    pub(crate) storage: StorageKind,
    pub(crate) nullable: bool,
    pub(crate) parent: Option<usize>,
    pub(crate) index: usize,
    pub(crate) offset: usize,
    pub(crate) null_bit: Option<LayoutBit>,
    pub(crate) bool_bit: Option<LayoutBit>,
    pub(crate) size: usize,
}

impl LayoutColumn {
    /// Property name relative to the enclosing object.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Dotted path from the layout root, e.g. `address.city`.
    pub fn full_path(&self) -> &str {
        &self.full_path
    }

    pub fn layout_type(&self) -> LayoutType {
        self.layout_type
    }

    pub fn type_args(&self) -> &TypeArgumentList {
        &self.type_args
    }

    pub fn storage(&self) -> StorageKind {
        self.storage
    }

    pub fn nullable(&self) -> bool {
        self.nullable
    }

    /// Index of the enclosing object column, for properties nested in objects.
    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    /// Position of this column in `Layout::columns`.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Fixed columns: byte offset from the start of the fixed region.
    /// Variable columns: index within the variable region.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Presence bit. Set means present.
    pub fn null_bit(&self) -> Option<LayoutBit> {
        self.null_bit
    }

    /// Value bit of a fixed boolean.
    pub fn bool_bit(&self) -> Option<LayoutBit> {
        self.bool_bit
    }

    /// Fixed columns: payload bytes. Variable Utf8/Binary: max length, 0 for
    /// unbounded.
    pub fn size(&self) -> usize {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bits_address_bytes_little_end_first() {
        assert_eq!(LayoutBit::new(0).byte_offset(), 0);
        assert_eq!(LayoutBit::new(0).mask(), 0x01);
        assert_eq!(LayoutBit::new(9).byte_offset(), 1);
        assert_eq!(LayoutBit::new(9).mask(), 0x02);
        assert_eq!(LayoutBit::new(15).mask(), 0x80);
    }
}
