//! # Layout
//!
//! The compiled, immutable plan for rows of one schema. A layout is produced
//! once by the `LayoutCompiler`, shared through `Arc`, and consulted by every
//! cursor operation that needs to know where a declared field lives.
//!
//! ## Fixed Region
//!
//! ```text
//! +----------------------+------------------+------------------+-----+
//! | bitmask (ceil(b/8))  | fixed payload 0  | fixed payload 1  | ... |
//! +----------------------+------------------+------------------+-----+
//! |<------------------------------ size ---------------------------->|
//! ```
//!
//! `b` counts one presence bit per nullable fixed column, one value bit per
//! fixed boolean, and one presence bit per variable column, assigned in
//! declaration order.
//!
//! ## Column Order
//!
//! `columns()` lists fixed columns, then variable columns, then sparse columns,
//! each group in declaration order. Variable column `i` is the `i`th entry of
//! the variable region.

use hashbrown::HashMap;

use crate::schema::{SchemaId, SchemaOptions};

use super::{LayoutColumn, StringTokenizer};

#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub(crate) name: String,
    pub(crate) schema_id: SchemaId,
    pub(crate) columns: Vec<LayoutColumn>,
    pub(crate) num_fixed: usize,
    pub(crate) num_variable: usize,
    pub(crate) path_index: HashMap<String, usize>,
    pub(crate) tokenizer: StringTokenizer,
    pub(crate) num_bitmask_bytes: usize,
    pub(crate) size: usize,
    pub(crate) options: SchemaOptions,
}

impl Layout {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema_id(&self) -> SchemaId {
        self.schema_id
    }

    pub fn columns(&self) -> &[LayoutColumn] {
        &self.columns
    }

    pub fn fixed_columns(&self) -> &[LayoutColumn] {
        &self.columns[..self.num_fixed]
    }

    pub fn variable_columns(&self) -> &[LayoutColumn] {
        &self.columns[self.num_fixed..self.num_fixed + self.num_variable]
    }

    pub fn sparse_columns(&self) -> &[LayoutColumn] {
        &self.columns[self.num_fixed + self.num_variable..]
    }

    /// Looks up a column by its dotted path from the layout root.
    pub fn find_column(&self, full_path: &str) -> Option<&LayoutColumn> {
        self.path_index.get(full_path).map(|&i| &self.columns[i])
    }

    pub fn tokenizer(&self) -> &StringTokenizer {
        &self.tokenizer
    }

    pub fn num_bitmask_bytes(&self) -> usize {
        self.num_bitmask_bytes
    }

    /// Total bytes of the fixed region, bitmask included.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn options(&self) -> SchemaOptions {
        self.options
    }

    pub fn allows_unschematized(&self) -> bool {
        !self.options.disallow_unschematized
    }
}
