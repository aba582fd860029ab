//! # Scope Walking
//!
//! Stateless helpers that walk the elements of a scope directly over row
//! bytes. Cursors, validation on load, sort-key construction and structural
//! edits all share them, so there is exactly one definition of where an
//! element starts and ends.
//!
//! ## Element Shapes
//!
//! ```text
//! named scope (root, object, udt):   [code][type args][path][payload]
//! untyped array, set, map, tuple:    [code][type args][payload]
//! typed array, set, map, tuple:      [payload]
//! ```
//!
//! ## Scope Ends
//!
//! | Scope | First element | End test |
//! |-------|---------------|----------|
//! | root | after the variable region | end of row |
//! | udt | after its fixed and variable regions | `END_SCOPE` byte |
//! | object, array, set, map | payload start | `END_SCOPE` byte |
//! | typed array, set, map | after the `u32` count | index reaches count |
//! | tuple, typed tuple | payload start | index reaches arity |

use crate::config::{HEADER_SIZE, MAX_NESTING_DEPTH, SCOPE_COUNT_SIZE};
use crate::encoding::varint::{decode_varuint, push_varuint};
use crate::layouts::{Layout, TypeArgument, TypeArgumentList};
use crate::types::{LayoutType, Value, END_SCOPE};

use super::buffer::RowBuffer;
use super::codec::{encode_value, payload_len};
use super::result::{corrupt, RowError, RowResult};

/// Path of a field in a named scope, as stored on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SparsePath {
    Token(u64),
    Inline(String),
}

impl SparsePath {
    /// Uses the layout's token when the path has one.
    pub(crate) fn for_path(layout: &Layout, path: &str) -> Self {
        match layout.tokenizer().token(path) {
            Some(token) if !path.is_empty() => SparsePath::Token(token),
            _ => SparsePath::Inline(path.to_string()),
        }
    }

    pub(crate) fn empty() -> Self {
        SparsePath::Inline(String::new())
    }

    pub(crate) fn as_str<'a>(&'a self, layout: &'a Layout) -> Option<&'a str> {
        match self {
            SparsePath::Token(token) => layout.tokenizer().string(*token),
            SparsePath::Inline(path) => Some(path),
        }
    }

    pub(crate) fn same_as(&self, other: &SparsePath, layout: &Layout) -> bool {
        match (self, other) {
            (SparsePath::Token(a), SparsePath::Token(b)) => a == b,
            (SparsePath::Inline(a), SparsePath::Inline(b)) => a == b,
            _ => self.as_str(layout) == other.as_str(layout),
        }
    }

    pub(crate) fn encode(&self, layout: &Layout, out: &mut Vec<u8>) {
        let count = layout.tokenizer().count();
        match self {
            SparsePath::Token(token) => push_varuint(*token, out),
            SparsePath::Inline(path) => {
                push_varuint(count + path.len() as u64, out);
                out.extend_from_slice(path.as_bytes());
            }
        }
    }

    pub(crate) fn decode(row: &RowBuffer, offset: usize, layout: &Layout) -> RowResult<(Self, usize)> {
        let rest = row.as_bytes().get(offset..).ok_or(RowError::TypeMismatch)?;
        let (v, read) = decode_varuint(rest).map_err(corrupt)?;
        let count = layout.tokenizer().count();
        if v < count {
            return Ok((SparsePath::Token(v), read));
        }
        let len = usize::try_from(v - count).map_err(corrupt)?;
        let bytes = row.bytes(offset + read, len)?;
        let path = std::str::from_utf8(bytes).map_err(corrupt)?;
        Ok((SparsePath::Inline(path.to_string()), read + len))
    }
}

/// The scope an element lives in.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Frame<'a> {
    pub(crate) scope_type: LayoutType,
    pub(crate) scope_args: &'a TypeArgumentList,
    pub(crate) layout: &'a Layout,
    pub(crate) is_root: bool,
}

impl<'a> Frame<'a> {
    pub(crate) fn new(
        scope_type: LayoutType,
        scope_args: &'a TypeArgumentList,
        layout: &'a Layout,
        is_root: bool,
    ) -> Self {
        Self {
            scope_type,
            scope_args,
            layout,
            is_root,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Element {
    pub(crate) layout_type: LayoutType,
    pub(crate) type_args: TypeArgumentList,
    pub(crate) path: Option<SparsePath>,
    pub(crate) meta_offset: usize,
    pub(crate) value_offset: usize,
    pub(crate) end_offset: usize,
}

/// Type of element `index` of a typed scope.
pub(crate) fn element_type(
    scope_type: LayoutType,
    scope_args: &TypeArgumentList,
    index: usize,
) -> Option<TypeArgument> {
    match scope_type {
        LayoutType::TypedArray | LayoutType::TypedSet => scope_args.get(0).cloned(),
        LayoutType::TypedMap => Some(TypeArgument::new(
            LayoutType::TypedTuple,
            TypeArgumentList::new(scope_args.iter().cloned()),
        )),
        LayoutType::TypedTuple => scope_args.get(index).cloned(),
        _ => None,
    }
}

/// Offset of variable column `var_index` within the layout-governed scope
/// whose fixed region starts at `fixed_start`. Absent columns take no bytes.
pub(crate) fn variable_offset(
    row: &RowBuffer,
    layout: &Layout,
    fixed_start: usize,
    var_index: usize,
) -> RowResult<usize> {
    row.bytes(fixed_start, layout.size())?;
    let mut offset = fixed_start + layout.size();
    for column in layout.variable_columns().iter().take(var_index) {
        let bit = column.null_bit().ok_or(RowError::TypeMismatch)?;
        if row.bit(fixed_start, bit)? {
            offset += payload_len(row.as_bytes(), offset, column.layout_type())?;
        }
    }
    Ok(offset)
}

pub(crate) fn first_element(row: &RowBuffer, frame: &Frame<'_>, start: usize) -> RowResult<usize> {
    match frame.scope_type {
        LayoutType::Udt => {
            variable_offset(row, frame.layout, start, frame.layout.variable_columns().len())
        }
        t if t.is_counted_scope() => {
            row.read_count(start)?;
            Ok(start + SCOPE_COUNT_SIZE)
        }
        _ => Ok(start),
    }
}

pub(crate) fn at_end(
    row: &RowBuffer,
    frame: &Frame<'_>,
    start: usize,
    offset: usize,
    index: usize,
) -> RowResult<bool> {
    if frame.is_root {
        return Ok(offset >= row.len());
    }
    let t = frame.scope_type;
    if t.has_end_scope() {
        Ok(row.byte(offset)? == END_SCOPE)
    } else if t.is_counted_scope() {
        Ok(index >= row.read_count(start)? as usize)
    } else if t.is_fixed_arity() {
        Ok(index >= frame.scope_args.len())
    } else {
        Err(RowError::TypeMismatch)
    }
}

/// Reads the element starting at `offset`, including where it ends.
pub(crate) fn read_element(
    row: &RowBuffer,
    frame: &Frame<'_>,
    offset: usize,
    index: usize,
    depth: usize,
) -> RowResult<Element> {
    let (layout_type, type_args, mut pos) = if frame.scope_type.is_typed_scope() {
        let arg = element_type(frame.scope_type, frame.scope_args, index)
            .ok_or(RowError::TypeMismatch)?;
        (arg.layout_type(), arg.type_args().clone(), offset)
    } else {
        let t = LayoutType::try_from(row.byte(offset)?).map_err(corrupt)?;
        let rest = row.as_bytes().get(offset + 1..).ok_or(RowError::TypeMismatch)?;
        let (args, read) = TypeArgumentList::decode(rest, t).map_err(corrupt)?;
        (t, args, offset + 1 + read)
    };

    let path = if frame.scope_type.is_named_scope() {
        let (path, read) = SparsePath::decode(row, pos, frame.layout)?;
        pos += read;
        Some(path)
    } else {
        None
    };

    let end_offset = skip_value(row, pos, layout_type, &type_args, frame.layout, depth)?;
    Ok(Element {
        layout_type,
        type_args,
        path,
        meta_offset: offset,
        value_offset: pos,
        end_offset,
    })
}

/// Offset just past the payload of type `t` at `offset`.
pub(crate) fn skip_value(
    row: &RowBuffer,
    offset: usize,
    t: LayoutType,
    args: &TypeArgumentList,
    layout: &Layout,
    depth: usize,
) -> RowResult<usize> {
    if depth > MAX_NESTING_DEPTH {
        return Err(RowError::TypeMismatch);
    }
    if t.is_leaf() {
        return Ok(offset + payload_len(row.as_bytes(), offset, t)?);
    }
    if t == LayoutType::Udt {
        let nested = row.resolve(args.schema_id()).ok_or(RowError::TypeMismatch)?;
        return scope_end(row, &Frame::new(t, args, &nested, false), offset, depth + 1);
    }
    scope_end(row, &Frame::new(t, args, layout, false), offset, depth + 1)
}

/// Offset just past a whole scope, its terminator included.
pub(crate) fn scope_end(row: &RowBuffer, frame: &Frame<'_>, start: usize, depth: usize) -> RowResult<usize> {
    let mut offset = first_element(row, frame, start)?;
    if frame.scope_type.is_counted_scope() {
        check_count(row, frame, start, offset)?;
    }

    let mut index = 0;
    while !at_end(row, frame, start, offset, index)? {
        offset = read_element(row, frame, offset, index, depth)?.end_offset;
        index += 1;
    }
    if frame.scope_type.has_end_scope() && !frame.is_root {
        offset += 1;
    }
    Ok(offset)
}

/// Rejects counts that cannot fit in the rest of the row.
fn check_count(row: &RowBuffer, frame: &Frame<'_>, start: usize, first: usize) -> RowResult {
    let count = row.read_count(start)? as usize;
    let min = element_type(frame.scope_type, frame.scope_args, 0)
        .map(|arg| min_payload_len(arg.layout_type()))
        .unwrap_or(0);
    let remaining = row.len().saturating_sub(first);
    if count.saturating_mul(min) > remaining {
        return Err(RowError::TypeMismatch);
    }
    Ok(())
}

fn min_payload_len(t: LayoutType) -> usize {
    match t.fixed_size() {
        Some(n) => n,
        None if t.is_leaf() || t.has_end_scope() => 1,
        None if t.is_counted_scope() => SCOPE_COUNT_SIZE,
        None => 0,
    }
}

/// Checks that the whole row parses under its layout.
pub(crate) fn validate_root(row: &RowBuffer, layout: &Layout) -> RowResult {
    let args = TypeArgumentList::from_schema_id(layout.schema_id());
    let frame = Frame::new(LayoutType::Udt, &args, layout, true);
    let end = scope_end(row, &frame, HEADER_SIZE, 0)?;
    if end != row.len() {
        return Err(RowError::TypeMismatch);
    }
    Ok(())
}

/// Appends the payload of a freshly created value of type `t`: the zero value
/// of a leaf, an empty collection, a tuple of null or default slots, or a udt
/// with an all-absent fixed region.
pub(crate) fn default_payload(
    row: &RowBuffer,
    t: LayoutType,
    args: &TypeArgumentList,
    depth: usize,
    out: &mut Vec<u8>,
) -> RowResult {
    if depth > MAX_NESTING_DEPTH {
        return Err(RowError::TypeConstraint);
    }
    match t {
        LayoutType::Object | LayoutType::Array | LayoutType::Set | LayoutType::Map => {
            out.push(END_SCOPE)
        }
        LayoutType::TypedArray | LayoutType::TypedSet | LayoutType::TypedMap => {
            out.extend_from_slice(&0u32.to_le_bytes())
        }
        LayoutType::Tuple => out.extend(args.iter().map(|_| LayoutType::Null.code())),
        LayoutType::TypedTuple => {
            for arg in args {
                default_payload(row, arg.layout_type(), arg.type_args(), depth + 1, out)?;
            }
        }
        LayoutType::Udt => {
            let nested = row
                .resolve(args.schema_id())
                .ok_or(RowError::TypeConstraint)?;
            out.resize(out.len() + nested.size(), 0);
            out.push(END_SCOPE);
        }
        leaf => {
            let value = Value::default_for(leaf).ok_or(RowError::TypeConstraint)?;
            encode_value(&value, out);
        }
    }
    Ok(())
}
