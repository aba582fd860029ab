//! # LayoutBuilder - Layout Construction
//!
//! `LayoutBuilder` accumulates columns in declaration order and assigns bits,
//! byte offsets and variable indices when `build` is called. The compiler
//! drives it while walking a schema; tests use it directly for small layouts.
//!
//! ## Usage
//!
//! ```
//! use hybridrow::layouts::LayoutBuilder;
//! use hybridrow::schema::SchemaId;
//! use hybridrow::types::LayoutType;
//!
//! let mut builder = LayoutBuilder::new("Point", SchemaId(1));
//! builder.add_fixed_column("x", LayoutType::Int32, false, 0).unwrap();
//! builder.add_fixed_column("y", LayoutType::Int32, true, 0).unwrap();
//! let layout = builder.build().unwrap();
//!
//! // one presence bit for `y`, then two 4-byte payloads
//! assert_eq!(layout.size(), 1 + 4 + 4);
//! ```
//!
//! ## Offset Assignment
//!
//! Bits are handed out immediately, in call order. Payload offsets are only
//! final once the bitmask width is known, so fixed columns record their
//! payload position relative to the end of the bitmask and `build` adds the
//! bitmask width.

use eyre::{bail, ensure, Result};
use hashbrown::HashMap;

use crate::schema::{SchemaId, SchemaOptions, StorageKind};
use crate::types::LayoutType;

use super::{Layout, LayoutBit, LayoutColumn, StringTokenizer, TypeArgumentList};

pub struct LayoutBuilder {
    name: String,
    schema_id: SchemaId,
    options: SchemaOptions,
    fixed: Vec<LayoutColumn>,
    variable: Vec<LayoutColumn>,
    sparse: Vec<LayoutColumn>,
    next_bit: usize,
    fixed_payload_size: usize,
    scope: Vec<usize>,
    tokenizer: StringTokenizer,
}

impl LayoutBuilder {
    pub fn new(name: impl Into<String>, schema_id: SchemaId) -> Self {
        Self {
            name: name.into(),
            schema_id,
            options: SchemaOptions::default(),
            fixed: Vec::new(),
            variable: Vec::new(),
            sparse: Vec::new(),
            next_bit: 0,
            fixed_payload_size: 0,
            scope: Vec::new(),
            tokenizer: StringTokenizer::new(),
        }
    }

    pub fn set_options(&mut self, options: SchemaOptions) {
        self.options = options;
    }

    fn allocate_bit(&mut self) -> LayoutBit {
        let bit = LayoutBit::new(self.next_bit);
        self.next_bit += 1;
        bit
    }

    fn full_path(&self, path: &str) -> String {
        match self.scope.last() {
            Some(&parent) => format!("{}.{}", self.sparse[parent].full_path, path),
            None => path.to_string(),
        }
    }

    fn new_column(
        &self,
        path: &str,
        layout_type: LayoutType,
        type_args: TypeArgumentList,
        storage: StorageKind,
    ) -> LayoutColumn {
        LayoutColumn {
            path: path.to_string(),
            full_path: self.full_path(path),
            layout_type,
            type_args,
            storage,
            nullable: true,
            parent: None,
            index: 0,
            offset: 0,
            null_bit: None,
            bool_bit: None,
            size: 0,
        }
    }

    pub fn add_fixed_column(
        &mut self,
        path: &str,
        layout_type: LayoutType,
        nullable: bool,
        length: usize,
    ) -> Result<()> {
        ensure!(
            self.scope.is_empty(),
            "fixed column '{}' cannot be declared inside an object",
            path
        );
        ensure!(
            layout_type.is_leaf(),
            "column '{}': {} cannot use fixed storage",
            path,
            layout_type
        );
        if layout_type == LayoutType::Null {
            ensure!(nullable, "fixed null column '{}' must be nullable", path);
        }

        let size = match layout_type {
            LayoutType::Utf8 | LayoutType::Binary => {
                ensure!(
                    length > 0,
                    "fixed {} column '{}' requires a length",
                    layout_type,
                    path
                );
                length
            }
            LayoutType::Boolean => 0,
            t => match t.fixed_size() {
                Some(n) => n,
                None => bail!("column '{}': {} cannot use fixed storage", path, t),
            },
        };

        let mut column = self.new_column(path, layout_type, TypeArgumentList::default(), StorageKind::Fixed);
        column.nullable = nullable;
        if nullable {
            column.null_bit = Some(self.allocate_bit());
        }
        if layout_type == LayoutType::Boolean {
            column.bool_bit = Some(self.allocate_bit());
        }
        column.offset = self.fixed_payload_size;
        column.size = size;
        self.fixed_payload_size += size;
        self.fixed.push(column);
        Ok(())
    }

    /// `max_length` bounds Utf8/Binary payloads in bytes; 0 means unbounded.
    pub fn add_variable_column(
        &mut self,
        path: &str,
        layout_type: LayoutType,
        max_length: usize,
    ) -> Result<()> {
        ensure!(
            self.scope.is_empty(),
            "variable column '{}' cannot be declared inside an object",
            path
        );
        ensure!(
            layout_type.is_varlen(),
            "column '{}': {} cannot use variable storage",
            path,
            layout_type
        );

        let mut column = self.new_column(path, layout_type, TypeArgumentList::default(), StorageKind::Variable);
        column.null_bit = Some(self.allocate_bit());
        column.offset = self.variable.len();
        column.size = max_length;
        self.variable.push(column);
        Ok(())
    }

    pub fn add_sparse_column(
        &mut self,
        path: &str,
        layout_type: LayoutType,
        type_args: TypeArgumentList,
    ) -> Result<()> {
        ensure!(
            type_args.is_valid_for(layout_type),
            "column '{}': invalid type arguments {} for {}",
            path,
            type_args,
            layout_type
        );

        let mut column = self.new_column(path, layout_type, type_args, StorageKind::Sparse);
        column.parent = self.scope.last().copied();
        self.tokenizer.add(path);
        self.sparse.push(column);
        Ok(())
    }

    /// Declares an object column; columns added until the matching
    /// `end_object_scope` are nested inside it.
    pub fn add_object_scope(&mut self, path: &str) -> Result<()> {
        self.add_sparse_column(path, LayoutType::Object, TypeArgumentList::default())?;
        self.scope.push(self.sparse.len() - 1);
        Ok(())
    }

    pub fn end_object_scope(&mut self) -> Result<()> {
        ensure!(self.scope.pop().is_some(), "no object scope to end");
        Ok(())
    }

    pub fn build(self) -> Result<Layout> {
        ensure!(
            self.scope.is_empty(),
            "layout '{}' has {} unterminated object scope(s)",
            self.name,
            self.scope.len()
        );

        let num_bitmask_bytes = self.next_bit.div_ceil(8);
        let num_fixed = self.fixed.len();
        let num_variable = self.variable.len();
        let sparse_base = num_fixed + num_variable;

        let mut columns = Vec::with_capacity(sparse_base + self.sparse.len());
        columns.extend(self.fixed.into_iter().map(|mut c| {
            c.offset += num_bitmask_bytes;
            c
        }));
        columns.extend(self.variable);
        columns.extend(self.sparse.into_iter().map(|mut c| {
            c.parent = c.parent.map(|p| p + sparse_base);
            c
        }));

        let mut path_index = HashMap::with_capacity(columns.len());
        for (i, column) in columns.iter_mut().enumerate() {
            column.index = i;
            if path_index.insert(column.full_path.clone(), i).is_some() {
                bail!(
                    "duplicate path '{}' in layout '{}'",
                    column.full_path,
                    self.name
                );
            }
        }

        Ok(Layout {
            name: self.name,
            schema_id: self.schema_id,
            columns,
            num_fixed,
            num_variable,
            path_index,
            tokenizer: self.tokenizer,
            num_bitmask_bytes,
            size: num_bitmask_bytes + self.fixed_payload_size,
            options: self.options,
        })
    }
}
