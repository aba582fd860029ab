//! # Row Engine
//!
//! A row is one contiguous byte buffer bound to a compiled `Layout`. It is
//! read and mutated in place through cursors; nothing is re-encoded as a
//! whole.
//!
//! ## Binary Layout
//!
//! ```text
//! +--------+---------------------------+------------------+------------------------+
//! | header | fixed region              | variable region  | sparse region          |
//! |        | bitmask | fixed payloads  | present columns  | fields until row end   |
//! +--------+---------------------------+------------------+------------------------+
//! ```
//!
//! | Region | Contents | Length |
//! |--------|----------|--------|
//! | header | version `u8`, schema id `i32` LE | 5 |
//! | fixed | presence and boolean bits, then fixed payloads | `layout.size()`, constant |
//! | variable | present variable columns in declaration order | varies |
//! | sparse | self-describing `[code][type args][path][payload]` fields | varies |
//!
//! ## Storage Kinds
//!
//! | Kind | Addressed by | Operations |
//! |------|--------------|------------|
//! | Fixed | `LayoutColumn` | `read_fixed`, `write_fixed`, `delete_fixed` |
//! | Variable | `LayoutColumn` | `read_variable`, `write_variable`, `delete_variable` |
//! | Sparse | `RowCursor` position | `read_sparse`, `write_sparse`, `delete_sparse` |
//! | Scopes | `RowCursor` position | `write_scope`, `read_scope`, `delete_scope`, `move_field`, `find_unique` |
//!
//! Codecs are methods on `LayoutType`, so the type named at the call site
//! decides how bytes are read or written:
//!
//! ```
//! use std::sync::Arc;
//! use hybridrow::config::HYBRID_ROW_VERSION;
//! use hybridrow::layouts::{LayoutResolver, LayoutResolverNamespace};
//! use hybridrow::row::{RowBuffer, RowCursor, UpdateOptions};
//! use hybridrow::schema::{Namespace, Property, PropertyType, Schema, SchemaId, TypeKind};
//! use hybridrow::types::{LayoutType, Value};
//!
//! let schema = Schema::new("Person", SchemaId(1))
//!     .with_property(Property::new("name", PropertyType::primitive(TypeKind::Utf8)));
//! let resolver = Arc::new(LayoutResolverNamespace::new(
//!     Namespace::new("demo").with_schema(schema).unwrap(),
//! ));
//! let layout = resolver.resolve(SchemaId(1)).unwrap();
//!
//! let mut row = RowBuffer::default();
//! row.init_layout(HYBRID_ROW_VERSION, layout, resolver);
//!
//! let mut cursor = RowCursor::create(&row).unwrap();
//! cursor.find(&row, "name");
//! LayoutType::Utf8
//!     .write_sparse(&mut row, &mut cursor, &Value::from("Ada"), UpdateOptions::Upsert)
//!     .unwrap();
//!
//! let mut cursor = RowCursor::create(&row).unwrap();
//! assert!(cursor.find(&row, "name"));
//! assert_eq!(LayoutType::Utf8.read_sparse(&row, &cursor), Ok(Value::from("Ada")));
//! ```
//!
//! ## Results
//!
//! Every operation returns a `RowResult`. A refused mutation leaves the row
//! byte-identical: all checks run before the single splice that applies it.

mod buffer;
mod codec;
mod cursor;
mod element;
mod fixed;
mod header;
mod result;
mod scope;
mod sparse;

#[cfg(test)]
mod tests;

pub use buffer::RowBuffer;
pub use cursor::RowCursor;
pub use header::{RowHeader, ScopeCount};
pub use result::{RowError, RowResult, UpdateOptions};
