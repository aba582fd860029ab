//! # Composite Scopes
//!
//! Opening, creating and deleting nested scopes, and the two-step protocol
//! for sets and maps.
//!
//! ## Writing Into a Set or Map
//!
//! Elements of unique scopes are never written in place. The caller stages
//! the candidate as an unnamed field of a named scope, then moves it:
//!
//! ```text
//! let mut staged = root.clone();
//! staged.find(&row, "");                       // stage at the end of root
//! LayoutType::Utf8.write_sparse(&mut row, &mut staged, &"bb".into(), Upsert)?;
//! LayoutType::TypedSet.move_field(&mut row, &mut set, staged, Upsert)?;
//! ```
//!
//! `move_field` removes the staged field and splices the element into sorted
//! position. Map elements are (key, value) tuples and only the key takes part
//! in ordering.
//!
//! ## Ordering
//!
//! Elements are ordered by their layout code, then by a byte-comparable sort
//! key of the value:
//!
//! | Value | Key |
//! |-------|-----|
//! | integers, date times | sign-split big-endian |
//! | floats | order-preserving IEEE 754 |
//! | decimal | normalized exponent and digits |
//! | utf8, binary | escaped bytes, `00 00` terminator |
//! | guid, object id, float128 | raw big-endian bytes |
//! | arrays, sets, maps, tuples | per-element code and key, with separators |
//! | objects, udts | escaped raw payload |
//!
//! The order is total and deterministic; it is part of the row format.

use std::sync::Arc;

use crate::config::{MAX_NESTING_DEPTH, MAX_SCOPE_ELEMENTS};
use crate::encoding::key;
use crate::layouts::{Layout, TypeArgumentList};
use crate::types::LayoutType;

use super::buffer::RowBuffer;
use super::codec::{append_leaf_key, decode_value};
use super::cursor::RowCursor;
use super::element::{self, element_type, Element, Frame};
use super::result::{RowError, RowResult, UpdateOptions};
use super::sparse::{check_cell_type, check_existence, check_writable, commit_write};

impl LayoutType {
    /// Creates an empty scope of this type at the cursor and returns a cursor
    /// over it. Tuples are created with every slot present: null for `Tuple`,
    /// the slot type's default for `TypedTuple`.
    pub fn write_scope(
        self,
        row: &mut RowBuffer,
        edit: &mut RowCursor,
        type_args: &TypeArgumentList,
        options: UpdateOptions,
    ) -> RowResult<RowCursor> {
        check_writable(edit, options)?;
        if !self.is_scope() || !type_args.is_valid_for(self) {
            return Err(RowError::TypeConstraint);
        }
        edit.prime(row)?;
        check_cell_type(edit, self, type_args)?;

        let layout = if self == LayoutType::Udt {
            row.resolve(type_args.schema_id())
                .ok_or(RowError::TypeConstraint)?
        } else {
            Arc::clone(&edit.layout)
        };
        let mut payload = Vec::new();
        element::default_payload(row, self, type_args, 0, &mut payload)?;
        check_existence(edit, options)?;

        commit_write(row, edit, self, type_args, &payload, options)?;
        Ok(edit.child(self, type_args, layout))
    }

    /// Opens the scope under the cursor. Elements of sets and maps open as
    /// read-only scopes.
    pub fn read_scope(self, row: &RowBuffer, edit: &RowCursor) -> RowResult<RowCursor> {
        if !edit.exists() {
            return Err(RowError::NotFound);
        }
        if edit.cell_type != Some(self) || !self.is_scope() {
            return Err(RowError::TypeMismatch);
        }
        let layout = if self == LayoutType::Udt {
            row.resolve(edit.cell_type_args.schema_id())
                .ok_or(RowError::TypeMismatch)?
        } else {
            Arc::clone(&edit.layout)
        };
        Ok(edit.child(self, &edit.cell_type_args, layout))
    }

    /// Deletes the scope under the cursor with everything inside it.
    pub fn delete_scope(self, row: &mut RowBuffer, edit: &mut RowCursor) -> RowResult {
        if !self.is_scope() {
            return Err(RowError::TypeMismatch);
        }
        self.delete_sparse(row, edit)
    }

    /// Moves the staged field into sorted position in the set or map `scope`.
    ///
    /// `Insert` fails with `Exists` and `Update` with `NotFound` as for any
    /// write; `Upsert` replaces an element with an equal key. On success the
    /// staged field is gone and `scope` is rewound to its first element.
    pub fn move_field(
        self,
        row: &mut RowBuffer,
        scope: &mut RowCursor,
        staged: RowCursor,
        options: UpdateOptions,
    ) -> RowResult {
        if scope.immutable || staged.immutable {
            return Err(RowError::InsufficientPermissions);
        }
        if self != scope.scope_type || !self.is_unique_scope() {
            return Err(RowError::TypeConstraint);
        }
        if options == UpdateOptions::InsertAt {
            return Err(RowError::TypeConstraint);
        }
        let staged = staged_element(row, scope, staged)?;

        let mut bytes = Vec::with_capacity(staged.end_offset - staged.meta_offset);
        if !self.is_typed_scope() {
            bytes.push(staged.layout_type.code());
            staged.type_args.encode(staged.layout_type, &mut bytes);
        }
        bytes.extend_from_slice(row.bytes(staged.value_offset, staged.end_offset - staged.value_offset)?);

        let mut sort_key = Vec::new();
        element_key(row, self, &staged, &scope.layout, &mut sort_key)?;
        let (entries, append_at) = scope_entries(row, scope)?;
        let search = entries.binary_search_by(|e| e.key.as_slice().cmp(&sort_key));

        let (target, remove) = match search {
            Ok(_) if options == UpdateOptions::Insert => return Err(RowError::Exists),
            Ok(i) => (entries[i].meta_offset, entries[i].end_offset - entries[i].meta_offset),
            Err(_) if options == UpdateOptions::Update => return Err(RowError::NotFound),
            Err(p) => (entries.get(p).map_or(append_at, |e| e.meta_offset), 0),
        };
        let count = match search {
            Err(_) if self.is_counted_scope() => {
                let count = row.read_count(scope.start)?;
                if u64::from(count) >= MAX_SCOPE_ELEMENTS {
                    return Err(RowError::TooBig);
                }
                Some(count)
            }
            _ => None,
        };

        if let Some(count) = count {
            row.write_count(scope.start, count + 1)?;
        }
        let staged_len = staged.end_offset - staged.meta_offset;
        if staged.meta_offset > target {
            row.splice(staged.meta_offset, staged_len, &[]);
            row.splice(target, remove, &bytes);
        } else {
            row.splice(target, remove, &bytes);
            row.splice(staged.meta_offset, staged_len, &[]);
        }

        if staged.meta_offset < scope.start {
            scope.start -= staged_len;
        }
        rewind(scope);
        Ok(())
    }

    /// Finds the element of the set or map `scope` equal to the staged
    /// `pattern` (for maps, with an equal key). The pattern is removed from
    /// the row either way; the returned cursor is a copy of `scope`
    /// positioned on the match.
    pub fn find_unique(
        self,
        row: &mut RowBuffer,
        scope: &RowCursor,
        pattern: RowCursor,
    ) -> RowResult<RowCursor> {
        if pattern.immutable {
            return Err(RowError::InsufficientPermissions);
        }
        if self != scope.scope_type || !self.is_unique_scope() {
            return Err(RowError::TypeConstraint);
        }
        let pattern = staged_element(row, scope, pattern)?;

        let mut sort_key = Vec::new();
        element_key(row, self, &pattern, &scope.layout, &mut sort_key)?;

        let pattern_len = pattern.end_offset - pattern.meta_offset;
        row.splice(pattern.meta_offset, pattern_len, &[]);
        let mut found = scope.clone();
        if pattern.meta_offset < found.start {
            found.start -= pattern_len;
        }
        rewind(&mut found);

        let (entries, _) = scope_entries(row, &found)?;
        match entries.binary_search_by(|e| e.key.as_slice().cmp(&sort_key)) {
            Ok(i) => {
                found.load(row, i, entries[i].meta_offset)?;
                Ok(found)
            }
            Err(_) => Err(RowError::NotFound),
        }
    }
}

fn rewind(scope: &mut RowCursor) {
    scope.index = 0;
    scope.primed = false;
    scope.exists = false;
    scope.cell_type = None;
    scope.cell_type_args = TypeArgumentList::default();
    scope.path = None;
}

/// Validates a staged field against the unique scope it is headed for and
/// returns it as an element.
fn staged_element(row: &RowBuffer, scope: &RowCursor, mut staged: RowCursor) -> RowResult<Element> {
    let parent = staged.scope_type;
    if parent.is_counted_scope() || parent.is_fixed_arity() || parent.is_unique_scope() {
        return Err(RowError::TypeConstraint);
    }
    if staged.layout.schema_id() != scope.layout.schema_id() {
        return Err(RowError::TypeConstraint);
    }
    if !staged.prime(row)? {
        return Err(RowError::NotFound);
    }
    let layout_type = staged.cell_type.ok_or(RowError::NotFound)?;
    let type_args = staged.cell_type_args.clone();

    match scope.scope_type {
        LayoutType::TypedSet | LayoutType::TypedMap => {
            let expected = element_type(scope.scope_type, &scope.scope_type_args, 0)
                .ok_or(RowError::TypeConstraint)?;
            if expected.layout_type() != layout_type || expected.type_args() != &type_args {
                return Err(RowError::TypeConstraint);
            }
        }
        LayoutType::Map => {
            if !layout_type.is_fixed_arity() || type_args.len() != 2 {
                return Err(RowError::TypeConstraint);
            }
        }
        _ => {}
    }

    let scope_end = element::scope_end(row, &scope.frame(), scope.start, 0)?;
    if staged.meta_offset < scope_end && staged.end_offset > scope.start {
        return Err(RowError::TypeConstraint);
    }

    Ok(Element {
        layout_type,
        type_args,
        path: None,
        meta_offset: staged.meta_offset,
        value_offset: staged.value_offset,
        end_offset: staged.end_offset,
    })
}

struct Entry {
    meta_offset: usize,
    end_offset: usize,
    key: Vec<u8>,
}

/// Elements of a unique scope with their sort keys, plus the offset where an
/// element after the last one would go.
fn scope_entries(row: &RowBuffer, scope: &RowCursor) -> RowResult<(Vec<Entry>, usize)> {
    let frame = scope.frame();
    let mut offset = element::first_element(row, &frame, scope.start)?;
    let mut index = 0;
    let mut entries = Vec::new();
    while !element::at_end(row, &frame, scope.start, offset, index)? {
        let el = element::read_element(row, &frame, offset, index, 0)?;
        let mut key = Vec::new();
        element_key(row, scope.scope_type, &el, &scope.layout, &mut key)?;
        offset = el.end_offset;
        entries.push(Entry {
            meta_offset: el.meta_offset,
            end_offset: el.end_offset,
            key,
        });
        index += 1;
    }
    Ok((entries, offset))
}

/// Sort key of an element of a unique scope: the whole element for sets,
/// slot 0 for maps.
fn element_key(
    row: &RowBuffer,
    scope_type: LayoutType,
    el: &Element,
    layout: &Layout,
    out: &mut Vec<u8>,
) -> RowResult {
    if matches!(scope_type, LayoutType::Map | LayoutType::TypedMap) {
        let frame = Frame::new(el.layout_type, &el.type_args, layout, false);
        let slot = element::read_element(row, &frame, el.value_offset, 0, 1)?;
        out.push(slot.layout_type.code());
        return value_key(row, &slot, layout, 1, out);
    }
    out.push(el.layout_type.code());
    value_key(row, el, layout, 0, out)
}

fn value_key(row: &RowBuffer, el: &Element, layout: &Layout, depth: usize, out: &mut Vec<u8>) -> RowResult {
    if depth > MAX_NESTING_DEPTH {
        return Err(RowError::TypeMismatch);
    }
    let t = el.layout_type;
    if t.is_leaf() {
        let (value, _) = decode_value(row.as_bytes(), el.value_offset, t)?;
        append_leaf_key(&value, out);
        return Ok(());
    }
    if t.is_named_scope() {
        key::encode_opaque(row.bytes(el.value_offset, el.end_offset - el.value_offset)?, out);
        return Ok(());
    }

    let frame = Frame::new(t, &el.type_args, layout, false);
    let mut offset = element::first_element(row, &frame, el.value_offset)?;
    let mut index = 0;
    key::begin_composite(out);
    while !element::at_end(row, &frame, el.value_offset, offset, index)? {
        if index > 0 {
            key::separate_element(out);
        }
        let child = element::read_element(row, &frame, offset, index, depth + 1)?;
        out.push(child.layout_type.code());
        value_key(row, &child, layout, depth + 1, out)?;
        offset = child.end_offset;
        index += 1;
    }
    key::end_composite(out);
    Ok(())
}
