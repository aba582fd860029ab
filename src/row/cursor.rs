//! # RowCursor - Scope Navigation
//!
//! A `RowCursor` says where in a row the next operation applies: which scope
//! it is in, and which element of that scope it points at. Cursors never own
//! the row; every operation takes the `RowBuffer` explicitly.
//!
//! ## States
//!
//! ```text
//!   opened (unprimed, index 0)
//!        │ move_next / find / move_to / first write
//!        ▼
//!   positioned ── exists: on an element ──── move_next ──> next element
//!        │
//!        └─────── !exists: at the scope end, where a write appends
//! ```
//!
//! Deleting the current element leaves the cursor at the same index with
//! nothing loaded, so the next `move_next` lands on the element that shifted
//! into place.
//!
//! ## Validity
//!
//! A cursor caches offsets. After any length-changing edit at or before those
//! offsets it must be re-derived (`find`, `move_to`, or a fresh `read_scope`
//! from an ancestor whose offsets precede the edit).

use std::sync::Arc;

use crate::config::HEADER_SIZE;
use crate::layouts::{Layout, TypeArgumentList};
use crate::types::LayoutType;

use super::buffer::RowBuffer;
use super::element::{self, Frame, SparsePath};
use super::result::{RowError, RowResult};

#[derive(Debug, Clone)]
pub struct RowCursor {
    /// Layout governing paths and fixed columns: the root or enclosing udt.
    pub(crate) layout: Arc<Layout>,
    pub(crate) scope_type: LayoutType,
    pub(crate) scope_type_args: TypeArgumentList,
    /// Dotted path of the scope from its layout root, when it has one.
    pub(crate) scope_path: Option<String>,
    pub(crate) is_root: bool,
    pub(crate) immutable: bool,
    /// Start of the scope payload: the count of counted scopes, the fixed
    /// region of layout scopes, the first element otherwise.
    pub(crate) start: usize,
    pub(crate) index: usize,
    pub(crate) primed: bool,
    pub(crate) exists: bool,
    pub(crate) meta_offset: usize,
    pub(crate) value_offset: usize,
    pub(crate) end_offset: usize,
    pub(crate) cell_type: Option<LayoutType>,
    pub(crate) cell_type_args: TypeArgumentList,
    pub(crate) path: Option<SparsePath>,
}

impl RowCursor {
    /// Root cursor of a bound row. Fails with `NotFound` on an unbound buffer.
    pub fn create(row: &RowBuffer) -> RowResult<RowCursor> {
        let layout = Arc::clone(row.layout().ok_or(RowError::NotFound)?);
        let scope_type_args = TypeArgumentList::from_schema_id(layout.schema_id());
        Ok(RowCursor {
            layout,
            scope_type: LayoutType::Udt,
            scope_type_args,
            scope_path: Some(String::new()),
            is_root: true,
            immutable: false,
            start: HEADER_SIZE,
            index: 0,
            primed: false,
            exists: false,
            meta_offset: HEADER_SIZE,
            value_offset: HEADER_SIZE,
            end_offset: HEADER_SIZE,
            cell_type: None,
            cell_type_args: TypeArgumentList::default(),
            path: None,
        })
    }

    pub fn as_read_only(&self) -> RowCursor {
        RowCursor {
            immutable: true,
            ..self.clone()
        }
    }

    /// Cursor over the scope the current element opens.
    pub(crate) fn child(
        &self,
        scope_type: LayoutType,
        scope_type_args: &TypeArgumentList,
        layout: Arc<Layout>,
    ) -> RowCursor {
        let scope_path = match scope_type {
            LayoutType::Udt => Some(String::new()),
            LayoutType::Object => match (self.scope_path.as_deref(), self.read_path()) {
                (Some(""), Some(segment)) if !segment.is_empty() => Some(segment.to_string()),
                (Some(parent), Some(segment)) if !segment.is_empty() => {
                    Some(format!("{}.{}", parent, segment))
                }
                _ => None,
            },
            _ => None,
        };

        RowCursor {
            layout,
            scope_type,
            scope_type_args: scope_type_args.clone(),
            scope_path,
            is_root: false,
            immutable: self.immutable || self.scope_type.is_unique_scope(),
            start: self.value_offset,
            index: 0,
            primed: false,
            exists: false,
            meta_offset: self.value_offset,
            value_offset: self.value_offset,
            end_offset: self.value_offset,
            cell_type: None,
            cell_type_args: TypeArgumentList::default(),
            path: None,
        }
    }

    pub(crate) fn frame(&self) -> Frame<'_> {
        Frame::new(
            self.scope_type,
            &self.scope_type_args,
            &self.layout,
            self.is_root,
        )
    }

    /// Positions on the current index if nothing has positioned the cursor
    /// yet, or re-reads the element already under it. Returns whether an
    /// element is there.
    pub(crate) fn prime(&mut self, row: &RowBuffer) -> RowResult<bool> {
        if self.primed {
            if !self.exists {
                return Ok(false);
            }
            // Writes inside the loaded element leave its cached end stale.
            return self.load(row, self.index, self.meta_offset);
        }
        let offset = if self.index == 0 {
            element::first_element(row, &self.frame(), self.start)?
        } else {
            self.meta_offset
        };
        self.load(row, self.index, offset)
    }

    /// Positions on element `index` at `offset`, or on the scope end.
    pub(crate) fn load(&mut self, row: &RowBuffer, index: usize, offset: usize) -> RowResult<bool> {
        self.index = index;
        self.primed = true;
        self.exists = false;
        self.meta_offset = offset;
        self.value_offset = offset;
        self.end_offset = offset;
        self.cell_type = None;
        self.cell_type_args = TypeArgumentList::default();
        self.path = None;

        if element::at_end(row, &self.frame(), self.start, offset, index)? {
            return Ok(false);
        }
        let element = element::read_element(row, &self.frame(), offset, index, 0)?;
        self.value_offset = element.value_offset;
        self.end_offset = element.end_offset;
        self.cell_type = Some(element.layout_type);
        self.cell_type_args = element.type_args;
        self.path = element.path;
        self.exists = true;
        Ok(true)
    }

    /// Moves to the field named `path` in a root, object or udt scope.
    ///
    /// When no field matches, the cursor is left at the end of the scope with
    /// `path` staged, so a following write creates the field. The empty path
    /// never matches: it stages an unnamed value for `move_field`.
    pub fn find(&mut self, row: &RowBuffer, path: &str) -> bool {
        if !self.scope_type.is_named_scope() {
            return false;
        }
        let target = SparsePath::for_path(&self.layout, path);
        match self.find_path(row, target, !path.is_empty()) {
            Ok(found) => found,
            Err(_) => {
                self.primed = false;
                self.index = 0;
                false
            }
        }
    }

    /// `find` by a token of this scope's layout. Unknown tokens leave the
    /// cursor untouched.
    pub fn find_token(&mut self, row: &RowBuffer, token: u64) -> bool {
        let Some(path) = self.layout.tokenizer().string(token).map(str::to_string) else {
            return false;
        };
        self.find(row, &path)
    }

    fn find_path(&mut self, row: &RowBuffer, target: SparsePath, matchable: bool) -> RowResult<bool> {
        let mut offset = element::first_element(row, &self.frame(), self.start)?;
        let mut index = 0;
        while self.load(row, index, offset)? {
            let matched = matchable
                && self
                    .path
                    .as_ref()
                    .is_some_and(|p| p.same_as(&target, &self.layout));
            if matched {
                return Ok(true);
            }
            offset = self.end_offset;
            index += 1;
        }
        self.path = Some(target);
        Ok(false)
    }

    /// Advances to the next element. The first call after a scope is opened
    /// lands on element 0. Returns false at the end of the scope, leaving the
    /// cursor where an append would go.
    pub fn move_next(&mut self, row: &RowBuffer) -> bool {
        let result = if !self.primed {
            self.prime(row)
        } else if !self.exists {
            self.load(row, self.index, self.meta_offset)
        } else {
            self.prime(row)
                .and_then(|_| self.load(row, self.index + 1, self.end_offset))
        };
        result.unwrap_or_else(|_| {
            self.exists = false;
            false
        })
    }

    /// Seeks to element `index` of an array or tuple scope.
    pub fn move_to(&mut self, row: &RowBuffer, index: usize) -> bool {
        if !self.scope_type.is_indexed_scope() {
            return false;
        }
        self.seek(row, index).unwrap_or_else(|_| {
            self.exists = false;
            false
        })
    }

    fn seek(&mut self, row: &RowBuffer, index: usize) -> RowResult<bool> {
        if !self.primed || index < self.index {
            let first = element::first_element(row, &self.frame(), self.start)?;
            self.load(row, 0, first)?;
        } else {
            self.prime(row)?;
        }
        while self.index < index && self.exists {
            self.load(row, self.index + 1, self.end_offset)?;
        }
        Ok(self.index == index && self.exists)
    }

    /// Type of the scope; the root and udt scopes report `Udt`.
    pub fn scope_type(&self) -> LayoutType {
        self.scope_type
    }

    pub fn scope_type_args(&self) -> &TypeArgumentList {
        &self.scope_type_args
    }

    pub fn layout(&self) -> &Arc<Layout> {
        &self.layout
    }

    pub fn immutable(&self) -> bool {
        self.immutable
    }

    pub fn is_root(&self) -> bool {
        self.is_root
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn exists(&self) -> bool {
        self.primed && self.exists
    }

    /// Type of the element under the cursor.
    pub fn cell_type(&self) -> Option<LayoutType> {
        self.cell_type.filter(|_| self.exists())
    }

    pub fn cell_type_args(&self) -> &TypeArgumentList {
        &self.cell_type_args
    }

    /// Name of the current field of a named scope, or the path staged by a
    /// `find` that did not match.
    pub fn read_path(&self) -> Option<&str> {
        self.path.as_ref()?.as_str(&self.layout)
    }
}
