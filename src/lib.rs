//! # hybridrow - Schema-Driven Binary Rows
//!
//! HybridRow is a compact binary encoding for semi-structured records. Every
//! field of a schema chooses one of three storage disciplines, and rows can be
//! read and mutated in place without re-encoding the whole record:
//!
//! - **Fixed**: schema-declared, at a static byte offset, nullable via a bit
//! - **Variable**: schema-declared, length-prefixed, stored in declaration order
//! - **Sparse**: self-describing, path-addressed, absent unless written
//!
//! Sparse fields may be nested scopes: objects, arrays, typed arrays, sets,
//! maps, tuples and user-defined types bound to other schemas.
//!
//! ## Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use hybridrow::config::HYBRID_ROW_VERSION;
//! use hybridrow::layouts::{LayoutResolver, LayoutResolverNamespace};
//! use hybridrow::row::{RowBuffer, RowCursor};
//! use hybridrow::schema::{Namespace, Property, PropertyType, Schema, SchemaId, TypeKind};
//! use hybridrow::types::{LayoutType, Value};
//!
//! let schema = Schema::new("Sensor", SchemaId(1))
//!     .with_property(Property::new("reading", PropertyType::primitive(TypeKind::Int8).fixed()));
//! let resolver = Arc::new(LayoutResolverNamespace::new(
//!     Namespace::new("telemetry").with_schema(schema).unwrap(),
//! ));
//! let layout = resolver.resolve(SchemaId(1)).unwrap();
//! let reading = layout.find_column("reading").unwrap().clone();
//!
//! let mut row = RowBuffer::default();
//! row.init_layout(HYBRID_ROW_VERSION, layout, resolver);
//! let root = RowCursor::create(&row).unwrap();
//!
//! LayoutType::Int8.write_fixed(&mut row, &root, &reading, &Value::Int8(42)).unwrap();
//! assert_eq!(LayoutType::Int8.read_fixed(&row, &root, &reading), Ok(Value::Int8(42)));
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   schema: Namespace / Schema model   │
//! ├─────────────────────────────────────┤
//! │  layouts: LayoutCompiler -> Layout   │
//! │           LayoutResolver (by id)     │
//! ├─────────────────────────────────────┤
//! │  row: RowBuffer + RowCursor          │
//! │       fixed / variable / sparse      │
//! │       codecs on LayoutType           │
//! ├─────────────────────────────────────┤
//! │  types / encoding: values, varints,  │
//! │  order-preserving sort keys          │
//! └─────────────────────────────────────┘
//! ```
//!
//! ## Module Overview
//!
//! - [`schema`]: Namespace, Schema, Property and PropertyType model
//! - [`layouts`]: layout compilation, tokenized sparse paths, resolution
//! - [`row`]: row buffers, cursors and every read/write/delete codec
//! - [`types`]: `LayoutType` codes and the `Value` model
//! - [`encoding`]: LEB128 varints and byte-comparable keys for set/map order
//! - [`config`]: format constants

#[macro_use]
mod macros;

pub mod config;
pub mod encoding;
pub mod layouts;
pub mod row;
pub mod schema;
pub mod types;

pub use layouts::{Layout, LayoutCompiler, LayoutResolver, LayoutResolverNamespace};
pub use row::{RowBuffer, RowCursor, RowError, RowResult, UpdateOptions};
pub use schema::{Namespace, Schema, SchemaId};
pub use types::{LayoutType, Value};
