//! Fuzz testing for row loading.
//!
//! Arbitrary bytes are loaded with `RowBuffer::read_from`. Malformed rows must
//! be rejected without panicking, and an accepted row must be fully
//! traversable.

#![no_main]

use std::sync::{Arc, OnceLock};

use libfuzzer_sys::fuzz_target;

use hybridrow::config::HYBRID_ROW_VERSION;
use hybridrow::layouts::LayoutResolverNamespace;
use hybridrow::row::{RowBuffer, RowCursor};
use hybridrow::schema::{Namespace, Property, PropertyType, Schema, SchemaId, TypeKind};

fn resolver() -> Arc<LayoutResolverNamespace> {
    static RESOLVER: OnceLock<Arc<LayoutResolverNamespace>> = OnceLock::new();
    Arc::clone(RESOLVER.get_or_init(|| {
        let schema = Schema::new("Fuzz", SchemaId(1))
            .with_property(Property::new("a", PropertyType::primitive(TypeKind::Int32).fixed()))
            .with_property(Property::new("b", PropertyType::primitive(TypeKind::Utf8).variable()))
            .with_property(Property::new("c", PropertyType::schema_ref("Fuzz")));
        let namespace = Namespace::new("fuzz").with_schema(schema).unwrap();
        Arc::new(LayoutResolverNamespace::new(namespace))
    }))
}

fn walk(row: &RowBuffer, mut cursor: RowCursor, depth: usize) {
    if depth > 8 {
        return;
    }
    while cursor.move_next(row) {
        if let Some(t) = cursor.cell_type() {
            if t.is_scope() {
                if let Ok(child) = t.read_scope(row, &cursor) {
                    walk(row, child, depth + 1);
                }
            } else {
                let _ = t.read_sparse(row, &cursor);
            }
        }
    }
}

fuzz_target!(|data: &[u8]| {
    let mut row = RowBuffer::default();
    if row.read_from(data, HYBRID_ROW_VERSION, resolver()) {
        let root = RowCursor::create(&row).unwrap();
        walk(&row, root, 0);
    }
});
