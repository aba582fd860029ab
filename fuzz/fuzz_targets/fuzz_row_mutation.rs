//! Fuzz testing for in-place row mutation.
//!
//! Replays an arbitrary sequence of sparse writes, deletes and set inserts
//! against one row. Refused operations must leave the bytes untouched, and
//! after every step the row must still load through `read_from`.

#![no_main]

use std::sync::Arc;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use hybridrow::config::HYBRID_ROW_VERSION;
use hybridrow::layouts::{LayoutResolver, LayoutResolverNamespace, TypeArgument, TypeArgumentList};
use hybridrow::row::{RowBuffer, RowCursor, UpdateOptions};
use hybridrow::schema::{Namespace, Property, PropertyType, Schema, SchemaId, TypeKind};
use hybridrow::types::{LayoutType, Value};

#[derive(Debug, Arbitrary)]
enum FuzzOp {
    WriteInt { path: u8, value: i64, options: FuzzOptions },
    WriteText { path: u8, value: String, options: FuzzOptions },
    Delete { path: u8 },
    Label { value: Vec<u8> },
    AddTag { value: i64, options: FuzzOptions },
}

#[derive(Debug, Arbitrary, Clone, Copy)]
enum FuzzOptions {
    Insert,
    Update,
    Upsert,
    InsertAt,
}

impl From<FuzzOptions> for UpdateOptions {
    fn from(options: FuzzOptions) -> Self {
        match options {
            FuzzOptions::Insert => UpdateOptions::Insert,
            FuzzOptions::Update => UpdateOptions::Update,
            FuzzOptions::Upsert => UpdateOptions::Upsert,
            FuzzOptions::InsertAt => UpdateOptions::InsertAt,
        }
    }
}

const PATHS: [&str; 4] = ["p0", "p1", "p2", "p3"];

fn path(index: u8) -> &'static str {
    PATHS[index as usize % PATHS.len()]
}

fn field(row: &RowBuffer, path: &str) -> RowCursor {
    let mut cursor = RowCursor::create(row).unwrap();
    cursor.find(row, path);
    cursor
}

fn apply(row: &mut RowBuffer, op: FuzzOp) {
    let root = RowCursor::create(row).unwrap();
    let before = row.as_bytes().to_vec();
    let result = match op {
        FuzzOp::WriteInt { path: p, value, options } => {
            let mut edit = field(row, path(p));
            LayoutType::Int64.write_sparse(row, &mut edit, &Value::Int64(value), options.into())
        }
        FuzzOp::WriteText { path: p, value, options } => {
            let mut edit = field(row, path(p));
            LayoutType::Utf8.write_sparse(row, &mut edit, &Value::Utf8(value), options.into())
        }
        FuzzOp::Delete { path: p } => {
            let mut edit = field(row, path(p));
            match edit.cell_type() {
                Some(t) => t.delete_sparse(row, &mut edit),
                None => LayoutType::Int64.delete_sparse(row, &mut edit),
            }
        }
        FuzzOp::Label { value } => {
            let label = root.layout().find_column("label").unwrap().clone();
            LayoutType::Binary.write_variable(row, &root, &label, &Value::Binary(value))
        }
        FuzzOp::AddTag { value, options } => {
            let mut staged = field(row, "");
            LayoutType::Int64
                .write_sparse(row, &mut staged, &Value::Int64(value), UpdateOptions::Upsert)
                .unwrap();
            let staged_bytes = row.as_bytes().to_vec();
            let edit = field(row, "tags");
            let mut set = LayoutType::TypedSet.read_scope(row, &edit).unwrap();
            let result = LayoutType::TypedSet.move_field(row, &mut set, staged, options.into());
            if result.is_err() {
                assert_eq!(row.as_bytes(), staged_bytes.as_slice());
                let mut cursor = RowCursor::create(row).unwrap();
                while cursor.move_next(row) && cursor.read_path() != Some("") {}
                LayoutType::Int64.delete_sparse(row, &mut cursor).unwrap();
            }
            result
        }
    };

    if result.is_err() {
        assert_eq!(row.as_bytes(), before.as_slice());
    }
}

fuzz_target!(|ops: Vec<FuzzOp>| {
    let schema = Schema::new("Fuzz", SchemaId(1))
        .with_property(Property::new("label", PropertyType::primitive(TypeKind::Binary).variable()))
        .with_property(Property::new(
            "tags",
            PropertyType::set(PropertyType::primitive(TypeKind::Int64).not_null()),
        ));
    let namespace = Namespace::new("fuzz").with_schema(schema).unwrap();
    let resolver = Arc::new(LayoutResolverNamespace::new(namespace));
    let layout = resolver.resolve(SchemaId(1)).unwrap();

    let mut row = RowBuffer::default();
    row.init_layout(HYBRID_ROW_VERSION, layout, Arc::clone(&resolver) as Arc<dyn LayoutResolver>);
    let mut edit = field(&row, "tags");
    LayoutType::TypedSet
        .write_scope(
            &mut row,
            &mut edit,
            &TypeArgumentList::new([TypeArgument::leaf(LayoutType::Int64)]),
            UpdateOptions::Upsert,
        )
        .unwrap();

    for op in ops.into_iter().take(64) {
        apply(&mut row, op);
        let mut reloaded = RowBuffer::default();
        assert!(reloaded.read_from(row.as_bytes(), HYBRID_ROW_VERSION, resolver.clone()));
    }
});
