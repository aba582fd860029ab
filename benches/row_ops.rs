//! Row operation benchmarks for hybridrow
//!
//! These benchmarks measure in-place row mutation: fixed writes that never
//! move bytes, variable resizes that shift the tail of the row, sparse lookup
//! by path, and sorted inserts into a typed set.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use hybridrow::config::HYBRID_ROW_VERSION;
use hybridrow::encoding::varint::{decode_varuint, encode_varuint};
use hybridrow::layouts::{LayoutResolver, LayoutResolverNamespace, TypeArgument, TypeArgumentList};
use hybridrow::row::{RowBuffer, RowCursor, UpdateOptions};
use hybridrow::schema::{Namespace, Property, PropertyType, Schema, SchemaId, TypeKind};
use hybridrow::types::{LayoutType, Value};

fn resolver() -> Arc<LayoutResolverNamespace> {
    let mut schema = Schema::new("Bench", SchemaId(1))
        .with_property(Property::new("id", PropertyType::primitive(TypeKind::Int64).fixed()))
        .with_property(Property::new("body", PropertyType::primitive(TypeKind::Binary).variable()))
        .with_property(Property::new(
            "tags",
            PropertyType::set(PropertyType::primitive(TypeKind::Int64).not_null()),
        ));
    for i in 0..32 {
        schema = schema.with_property(Property::new(
            format!("s{}", i),
            PropertyType::primitive(TypeKind::Int32),
        ));
    }
    let namespace = Namespace::new("bench").with_schema(schema).unwrap();
    Arc::new(LayoutResolverNamespace::new(namespace))
}

fn new_row(resolver: &Arc<LayoutResolverNamespace>) -> RowBuffer {
    let layout = resolver.resolve(SchemaId(1)).unwrap();
    let mut row = RowBuffer::default();
    row.init_layout(HYBRID_ROW_VERSION, layout, Arc::clone(resolver) as Arc<dyn LayoutResolver>);
    row
}

fn bench_varuint(c: &mut Criterion) {
    let mut group = c.benchmark_group("varuint");

    for (value, name) in [(0u64, "zero"), (16383, "2_byte_max"), (u64::MAX, "max_u64")] {
        group.bench_with_input(BenchmarkId::new("round_trip", name), &value, |b, &value| {
            let mut buf = [0u8; 10];
            b.iter(|| {
                let len = encode_varuint(black_box(value), &mut buf);
                black_box(decode_varuint(&buf[..len]).unwrap())
            });
        });
    }

    group.finish();
}

fn bench_fixed(c: &mut Criterion) {
    let resolver = resolver();
    let mut row = new_row(&resolver);
    let root = RowCursor::create(&row).unwrap();
    let id = root.layout().find_column("id").unwrap().clone();

    c.bench_function("fixed_write_read_int64", |b| {
        let mut n = 0i64;
        b.iter(|| {
            n = n.wrapping_add(1);
            LayoutType::Int64.write_fixed(&mut row, &root, &id, &Value::Int64(n)).unwrap();
            black_box(LayoutType::Int64.read_fixed(&row, &root, &id).unwrap())
        });
    });
}

fn bench_variable_resize(c: &mut Criterion) {
    let mut group = c.benchmark_group("variable_resize");
    let resolver = resolver();

    for size in [16usize, 256, 4096] {
        let mut row = new_row(&resolver);
        let root = RowCursor::create(&row).unwrap();
        let body = root.layout().find_column("body").unwrap().clone();
        let small = Value::Binary(vec![1; size / 2]);
        let large = Value::Binary(vec![2; size]);

        group.bench_with_input(BenchmarkId::new("grow_shrink", size), &size, |b, _| {
            b.iter(|| {
                LayoutType::Binary.write_variable(&mut row, &root, &body, &large).unwrap();
                LayoutType::Binary.write_variable(&mut row, &root, &body, &small).unwrap();
            });
        });
    }

    group.finish();
}

fn bench_sparse_find(c: &mut Criterion) {
    let resolver = resolver();
    let mut row = new_row(&resolver);
    for i in 0..32 {
        let mut edit = RowCursor::create(&row).unwrap();
        edit.find(&row, &format!("s{}", i));
        LayoutType::Int32
            .write_sparse(&mut row, &mut edit, &Value::Int32(i), UpdateOptions::Insert)
            .unwrap();
    }

    c.bench_function("sparse_find_last_of_32", |b| {
        b.iter(|| {
            let mut cursor = RowCursor::create(&row).unwrap();
            black_box(cursor.find(&row, black_box("s31")));
            black_box(LayoutType::Int32.read_sparse(&row, &cursor).unwrap())
        });
    });
}

fn bench_set_insert(c: &mut Criterion) {
    let resolver = resolver();
    let args = TypeArgumentList::new([TypeArgument::leaf(LayoutType::Int64)]);

    c.bench_function("typed_set_insert_64", |b| {
        b.iter(|| {
            let mut row = new_row(&resolver);
            let mut edit = RowCursor::create(&row).unwrap();
            edit.find(&row, "tags");
            LayoutType::TypedSet
                .write_scope(&mut row, &mut edit, &args, UpdateOptions::Upsert)
                .unwrap();

            for i in 0..64i64 {
                let mut staged = RowCursor::create(&row).unwrap();
                staged.find(&row, "");
                let n = (i * 7919) % 64;
                LayoutType::Int64
                    .write_sparse(&mut row, &mut staged, &Value::Int64(n), UpdateOptions::Upsert)
                    .unwrap();
                let mut edit = RowCursor::create(&row).unwrap();
                edit.find(&row, "tags");
                let mut set = LayoutType::TypedSet.read_scope(&row, &edit).unwrap();
                LayoutType::TypedSet
                    .move_field(&mut row, &mut set, staged, UpdateOptions::Upsert)
                    .unwrap();
            }
            black_box(row.len())
        });
    });
}

criterion_group!(
    benches,
    bench_varuint,
    bench_fixed,
    bench_variable_resize,
    bench_sparse_find,
    bench_set_insert,
);
criterion_main!(benches);
