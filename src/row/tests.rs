//! Tests for the row module

use std::sync::Arc;

use super::*;
use crate::config::{HEADER_SIZE, HYBRID_ROW_VERSION};
use crate::layouts::{LayoutColumn, LayoutResolver, LayoutResolverNamespace, TypeArgument, TypeArgumentList};
use crate::schema::{Namespace, Property, PropertyType, Schema, SchemaId, TypeKind};
use crate::types::{LayoutType, Value};

fn prim(kind: TypeKind) -> PropertyType {
    PropertyType::primitive(kind)
}

fn resolver() -> Arc<LayoutResolverNamespace> {
    let root = Schema::new("Root", SchemaId(1))
        .with_property(Property::new("a", prim(TypeKind::Int8).fixed()))
        .with_property(Property::new("flag", prim(TypeKind::Boolean).fixed()))
        .with_property(Property::new("label", prim(TypeKind::Utf8).variable()))
        .with_property(Property::new("code", prim(TypeKind::Utf8).variable().with_length(4)))
        .with_property(Property::new("name", prim(TypeKind::Utf8)))
        .with_property(Property::new("tags", PropertyType::set(prim(TypeKind::Utf8).not_null())))
        .with_property(Property::new("nums", PropertyType::array(prim(TypeKind::Int32).not_null())))
        .with_property(Property::new(
            "pair",
            PropertyType::tuple(vec![prim(TypeKind::Int32), prim(TypeKind::Utf8)]),
        ))
        .with_property(Property::new(
            "scores",
            PropertyType::map(prim(TypeKind::Utf8).not_null(), prim(TypeKind::Int32).not_null()),
        ))
        .with_property(Property::new("home", PropertyType::schema_ref_id("Address", SchemaId(3))));
    let address_v1 = Schema::new("Address", SchemaId(2))
        .with_property(Property::new("street", prim(TypeKind::Utf8)));
    let address_v2 = Schema::new("Address", SchemaId(3))
        .with_property(Property::new("zip", prim(TypeKind::Int32).fixed()))
        .with_property(Property::new("city", prim(TypeKind::Utf8)));

    let namespace = Namespace::new("tests")
        .with_schema(root)
        .and_then(|ns| ns.with_schema(address_v1))
        .and_then(|ns| ns.with_schema(address_v2))
        .unwrap();
    Arc::new(LayoutResolverNamespace::new(namespace))
}

fn new_row() -> RowBuffer {
    let resolver = resolver();
    let layout = resolver.resolve(SchemaId(1)).unwrap();
    let mut row = RowBuffer::default();
    row.init_layout(HYBRID_ROW_VERSION, layout, resolver);
    row
}

fn column(row: &RowBuffer, path: &str) -> LayoutColumn {
    row.layout().unwrap().find_column(path).unwrap().clone()
}

fn args(types: &[LayoutType]) -> TypeArgumentList {
    TypeArgumentList::new(types.iter().map(|t| TypeArgument::leaf(*t)))
}

fn field(row: &RowBuffer, path: &str) -> RowCursor {
    let mut cursor = RowCursor::create(row).unwrap();
    cursor.find(row, path);
    cursor
}

fn insert_into_set(row: &mut RowBuffer, value: &str, options: UpdateOptions) -> RowResult {
    let mut staged = field(row, "");
    LayoutType::Utf8.write_sparse(row, &mut staged, &Value::from(value), UpdateOptions::Upsert)?;
    let cursor = field(row, "tags");
    let mut set = LayoutType::TypedSet.read_scope(row, &cursor)?;
    LayoutType::TypedSet.move_field(row, &mut set, staged, options)
}

fn set_contents(row: &RowBuffer) -> Vec<Value> {
    let cursor = field(row, "tags");
    let mut set = LayoutType::TypedSet.read_scope(row, &cursor).unwrap();
    let mut values = Vec::new();
    while set.move_next(row) {
        values.push(LayoutType::Utf8.read_sparse(row, &set).unwrap());
    }
    values
}

#[test]
fn new_row_is_header_and_zeroed_fixed_region() {
    let row = new_row();
    let layout = row.layout().unwrap();
    assert_eq!(row.len(), HEADER_SIZE + layout.size());
    assert_eq!(row.version(), Some(HYBRID_ROW_VERSION));
    assert_eq!(row.schema_id(), Some(SchemaId(1)));
    assert!(row.as_bytes()[HEADER_SIZE..].iter().all(|b| *b == 0));
}

#[test]
fn nullable_fixed_int8_lifecycle() {
    let mut row = new_row();
    let root = RowCursor::create(&row).unwrap();
    let a = column(&row, "a");

    LayoutType::Int8.write_fixed(&mut row, &root, &a, &Value::Int8(42)).unwrap();
    assert_eq!(LayoutType::Int8.read_fixed(&row, &root, &a), Ok(Value::Int8(42)));

    assert_eq!(LayoutType::Int8.delete_fixed(&mut row, &root, &a), Ok(()));
    let (result, value) = LayoutType::Int8.read_fixed_or_default(&row, &root, &a);
    assert_eq!(result, Err(RowError::NotFound));
    assert_eq!(value, Value::Int8(0));
}

#[test]
fn fixed_boolean_lives_in_the_bitmask() {
    let mut row = new_row();
    let root = RowCursor::create(&row).unwrap();
    let flag = column(&row, "flag");
    let before = row.len();

    LayoutType::Boolean.write_fixed(&mut row, &root, &flag, &Value::Boolean(true)).unwrap();
    assert_eq!(row.len(), before);
    assert_eq!(LayoutType::Boolean.read_fixed(&row, &root, &flag), Ok(Value::Boolean(true)));
}

#[test]
fn fixed_column_rejects_wrong_codec() {
    let mut row = new_row();
    let root = RowCursor::create(&row).unwrap();
    let a = column(&row, "a");

    assert_eq!(
        LayoutType::Int16.write_fixed(&mut row, &root, &a, &Value::Int16(1)),
        Err(RowError::TypeConstraint)
    );
    assert_eq!(LayoutType::Int16.read_fixed(&row, &root, &a), Err(RowError::TypeMismatch));
}

#[test]
fn read_only_cursor_refuses_every_mutation() {
    let mut row = new_row();
    let root = RowCursor::create(&row).unwrap().as_read_only();
    let a = column(&row, "a");
    let label = column(&row, "label");
    let before = row.as_bytes().to_vec();

    assert_eq!(
        LayoutType::Int8.write_fixed(&mut row, &root, &a, &Value::Int8(1)),
        Err(RowError::InsufficientPermissions)
    );
    assert_eq!(
        LayoutType::Utf8.write_variable(&mut row, &root, &label, &Value::from("x")),
        Err(RowError::InsufficientPermissions)
    );
    let mut edit = root.clone();
    edit.find(&row, "name");
    assert_eq!(
        LayoutType::Utf8.write_sparse(&mut row, &mut edit, &Value::from("x"), UpdateOptions::Upsert),
        Err(RowError::InsufficientPermissions)
    );
    assert_eq!(
        LayoutType::TypedArray.write_scope(
            &mut row,
            &mut edit,
            &args(&[LayoutType::Int32]),
            UpdateOptions::Upsert
        ).map(|_| ()),
        Err(RowError::InsufficientPermissions)
    );
    assert_eq!(row.as_bytes(), before.as_slice());
}

#[test]
fn variable_resize_keeps_sibling_intact() {
    let mut row = new_row();
    let root = RowCursor::create(&row).unwrap();
    let label = column(&row, "label");
    let code = column(&row, "code");

    LayoutType::Utf8.write_variable(&mut row, &root, &label, &Value::from("medium")).unwrap();
    LayoutType::Utf8.write_variable(&mut row, &root, &code, &Value::from("ab")).unwrap();
    let base = row.len();

    LayoutType::Utf8.write_variable(&mut row, &root, &label, &Value::from("a much longer label")).unwrap();
    assert!(row.len() > base);
    assert_eq!(LayoutType::Utf8.read_variable(&row, &root, &code), Ok(Value::from("ab")));

    LayoutType::Utf8.write_variable(&mut row, &root, &label, &Value::from("s")).unwrap();
    assert!(row.len() < base);
    assert_eq!(LayoutType::Utf8.read_variable(&row, &root, &code), Ok(Value::from("ab")));
}

#[test]
fn variable_length_bound_is_enforced() {
    let mut row = new_row();
    let root = RowCursor::create(&row).unwrap();
    let code = column(&row, "code");
    let before = row.as_bytes().to_vec();

    assert_eq!(
        LayoutType::Utf8.write_variable(&mut row, &root, &code, &Value::from("toolong")),
        Err(RowError::TooBig)
    );
    assert_eq!(row.as_bytes(), before.as_slice());
    assert_eq!(LayoutType::Utf8.delete_variable(&mut row, &root, &code), Err(RowError::NotFound));
}

#[test]
fn sparse_field_write_read_delete() {
    let mut row = new_row();
    let mut edit = field(&row, "name");
    LayoutType::Utf8
        .write_sparse(&mut row, &mut edit, &Value::from("Ada"), UpdateOptions::Insert)
        .unwrap();

    let mut edit = field(&row, "name");
    assert!(edit.exists());
    assert_eq!(edit.read_path(), Some("name"));
    assert_eq!(
        LayoutType::Utf8.write_sparse(&mut row, &mut edit, &Value::from("Bob"), UpdateOptions::Insert),
        Err(RowError::Exists)
    );
    assert_eq!(LayoutType::Int32.read_sparse(&row, &edit), Err(RowError::TypeMismatch));

    LayoutType::Utf8.delete_sparse(&mut row, &mut edit).unwrap();
    let edit = field(&row, "name");
    assert!(!edit.exists());
    assert_eq!(LayoutType::Utf8.read_sparse(&row, &edit), Err(RowError::NotFound));
}

#[test]
fn declared_sparse_column_constrains_its_type() {
    let mut row = new_row();
    let mut edit = field(&row, "name");
    assert_eq!(
        LayoutType::Int32.write_sparse(&mut row, &mut edit, &Value::Int32(7), UpdateOptions::Upsert),
        Err(RowError::TypeConstraint)
    );
}

#[test]
fn typed_array_append_and_delete() {
    let mut row = new_row();
    let mut edit = field(&row, "nums");
    let mut nums = LayoutType::TypedArray
        .write_scope(&mut row, &mut edit, &args(&[LayoutType::Int32]), UpdateOptions::Upsert)
        .unwrap();

    for n in [10, 20, 30] {
        nums.move_next(&row);
        LayoutType::Int32
            .write_sparse(&mut row, &mut nums, &Value::Int32(n), UpdateOptions::Insert)
            .unwrap();
    }
    assert_eq!(
        LayoutType::Int64.write_sparse(&mut row, &mut nums, &Value::Int64(1), UpdateOptions::Upsert),
        Err(RowError::TypeConstraint)
    );

    let edit = field(&row, "nums");
    let mut nums = LayoutType::TypedArray.read_scope(&row, &edit).unwrap();
    assert!(nums.move_to(&row, 1));
    LayoutType::Int32.delete_sparse(&mut row, &mut nums).unwrap();

    let edit = field(&row, "nums");
    let mut nums = LayoutType::TypedArray.read_scope(&row, &edit).unwrap();
    let mut seen = Vec::new();
    while nums.move_next(&row) {
        seen.push(LayoutType::Int32.read_sparse(&row, &nums).unwrap());
    }
    assert_eq!(seen, vec![Value::Int32(10), Value::Int32(30)]);
}

#[test]
fn insert_at_shifts_array_elements() {
    let mut row = new_row();
    let mut edit = field(&row, "nums");
    let mut nums = LayoutType::TypedArray
        .write_scope(&mut row, &mut edit, &args(&[LayoutType::Int32]), UpdateOptions::Upsert)
        .unwrap();
    LayoutType::Int32.write_sparse(&mut row, &mut nums, &Value::Int32(2), UpdateOptions::Insert).unwrap();

    let edit = field(&row, "nums");
    let mut nums = LayoutType::TypedArray.read_scope(&row, &edit).unwrap();
    assert!(nums.move_to(&row, 0));
    LayoutType::Int32.write_sparse(&mut row, &mut nums, &Value::Int32(1), UpdateOptions::InsertAt).unwrap();

    let edit = field(&row, "nums");
    let mut nums = LayoutType::TypedArray.read_scope(&row, &edit).unwrap();
    assert!(nums.move_to(&row, 1));
    assert_eq!(LayoutType::Int32.read_sparse(&row, &nums), Ok(Value::Int32(2)));
}

#[test]
fn insert_at_outside_an_array_is_a_constraint_violation() {
    let mut row = new_row();
    let mut edit = field(&row, "name");
    assert_eq!(
        LayoutType::Utf8.write_sparse(&mut row, &mut edit, &Value::from("x"), UpdateOptions::InsertAt),
        Err(RowError::TypeConstraint)
    );
}

#[test]
fn tuple_scope_checks_arity_and_slot_types() {
    let mut row = new_row();
    let before = row.as_bytes().to_vec();
    let mut edit = field(&row, "pair");
    assert_eq!(
        LayoutType::Tuple
            .write_scope(&mut row, &mut edit, &args(&[LayoutType::Int32]), UpdateOptions::Upsert)
            .map(|_| ()),
        Err(RowError::TypeConstraint)
    );
    assert_eq!(row.as_bytes(), before.as_slice());

    let mut edit = field(&row, "pair");
    let mut pair = LayoutType::Tuple
        .write_scope(
            &mut row,
            &mut edit,
            &args(&[LayoutType::Int32, LayoutType::Utf8]),
            UpdateOptions::Upsert,
        )
        .unwrap();
    assert!(pair.move_next(&row));
    assert_eq!(pair.cell_type(), Some(LayoutType::Null));
    assert_eq!(
        LayoutType::Utf8.write_sparse(&mut row, &mut pair, &Value::from("x"), UpdateOptions::Upsert),
        Err(RowError::TypeConstraint)
    );
    LayoutType::Int32.write_sparse(&mut row, &mut pair, &Value::Int32(5), UpdateOptions::Upsert).unwrap();
    assert_eq!(LayoutType::Int32.delete_sparse(&mut row, &mut pair), Err(RowError::TypeConstraint));
    assert!(pair.move_next(&row));
    assert!(!pair.move_next(&row));
}

#[test]
fn set_elements_are_sorted() {
    let mut row = new_row();
    let mut edit = field(&row, "tags");
    LayoutType::TypedSet
        .write_scope(&mut row, &mut edit, &args(&[LayoutType::Utf8]), UpdateOptions::Upsert)
        .unwrap();

    insert_into_set(&mut row, "bb", UpdateOptions::Insert).unwrap();
    insert_into_set(&mut row, "aa", UpdateOptions::Insert).unwrap();
    assert_eq!(set_contents(&row), vec![Value::from("aa"), Value::from("bb")]);
}

#[test]
fn set_rejects_duplicate_insert_without_change() {
    let mut row = new_row();
    let mut edit = field(&row, "tags");
    LayoutType::TypedSet
        .write_scope(&mut row, &mut edit, &args(&[LayoutType::Utf8]), UpdateOptions::Upsert)
        .unwrap();
    insert_into_set(&mut row, "aa", UpdateOptions::Insert).unwrap();

    assert_eq!(insert_into_set(&mut row, "aa", UpdateOptions::Insert), Err(RowError::Exists));
    insert_into_set(&mut row, "aa", UpdateOptions::Upsert).unwrap();
    assert_eq!(set_contents(&row), vec![Value::from("aa")]);
}

#[test]
fn set_elements_cannot_be_written_in_place() {
    let mut row = new_row();
    let mut edit = field(&row, "tags");
    let mut set = LayoutType::TypedSet
        .write_scope(&mut row, &mut edit, &args(&[LayoutType::Utf8]), UpdateOptions::Upsert)
        .unwrap();
    assert_eq!(
        LayoutType::Utf8.write_sparse(&mut row, &mut set, &Value::from("x"), UpdateOptions::Upsert),
        Err(RowError::InsufficientPermissions)
    );
}

#[test]
fn map_upsert_replaces_value_and_insert_reports_exists() {
    let mut row = new_row();
    let kv = args(&[LayoutType::Utf8, LayoutType::Int32]);
    let mut edit = field(&row, "scores");
    LayoutType::TypedMap
        .write_scope(&mut row, &mut edit, &kv, UpdateOptions::Upsert)
        .unwrap();

    let put = |row: &mut RowBuffer, key: &str, value: i32, options: UpdateOptions| -> RowResult {
        let mut staged = field(row, "");
        let mut pair = LayoutType::TypedTuple.write_scope(row, &mut staged, &kv, UpdateOptions::Upsert)?;
        pair.move_next(row);
        LayoutType::Utf8.write_sparse(row, &mut pair, &Value::from(key), UpdateOptions::Upsert)?;
        pair.move_next(row);
        LayoutType::Int32.write_sparse(row, &mut pair, &Value::Int32(value), UpdateOptions::Upsert)?;
        let cursor = field(row, "scores");
        let mut map = LayoutType::TypedMap.read_scope(row, &cursor)?;
        LayoutType::TypedMap.move_field(row, &mut map, staged, options)
    };

    put(&mut row, "b", 2, UpdateOptions::Insert).unwrap();
    put(&mut row, "a", 1, UpdateOptions::Insert).unwrap();
    let len = row.len();
    assert_eq!(put(&mut row, "a", 9, UpdateOptions::Insert), Err(RowError::Exists));
    assert_eq!(row.len(), len);
    put(&mut row, "a", 7, UpdateOptions::Upsert).unwrap();
    assert_eq!(put(&mut row, "z", 0, UpdateOptions::Update), Err(RowError::NotFound));

    let cursor = field(&row, "scores");
    let mut map = LayoutType::TypedMap.read_scope(&row, &cursor).unwrap();
    let mut entries = Vec::new();
    while map.move_next(&row) {
        let mut pair = LayoutType::TypedTuple.read_scope(&row, &map).unwrap();
        assert!(pair.immutable());
        pair.move_next(&row);
        let key = LayoutType::Utf8.read_sparse(&row, &pair).unwrap();
        pair.move_next(&row);
        let value = LayoutType::Int32.read_sparse(&row, &pair).unwrap();
        entries.push((key, value));
    }
    assert_eq!(
        entries,
        vec![
            (Value::from("a"), Value::Int32(7)),
            (Value::from("b"), Value::Int32(2)),
        ]
    );
}

#[test]
fn find_unique_locates_and_consumes_pattern() {
    let mut row = new_row();
    let mut edit = field(&row, "tags");
    LayoutType::TypedSet
        .write_scope(&mut row, &mut edit, &args(&[LayoutType::Utf8]), UpdateOptions::Upsert)
        .unwrap();
    for tag in ["c", "a", "b"] {
        insert_into_set(&mut row, tag, UpdateOptions::Insert).unwrap();
    }
    let len = row.len();

    let mut pattern = field(&row, "");
    LayoutType::Utf8.write_sparse(&mut row, &mut pattern, &Value::from("b"), UpdateOptions::Upsert).unwrap();
    let cursor = field(&row, "tags");
    let set = LayoutType::TypedSet.read_scope(&row, &cursor).unwrap();
    let found = LayoutType::TypedSet.find_unique(&mut row, &set, pattern).unwrap();
    assert_eq!(found.index(), 1);
    assert_eq!(LayoutType::Utf8.read_sparse(&row, &found), Ok(Value::from("b")));
    assert_eq!(row.len(), len);

    let mut pattern = field(&row, "");
    LayoutType::Utf8.write_sparse(&mut row, &mut pattern, &Value::from("q"), UpdateOptions::Upsert).unwrap();
    let cursor = field(&row, "tags");
    let set = LayoutType::TypedSet.read_scope(&row, &cursor).unwrap();
    assert_eq!(
        LayoutType::TypedSet.find_unique(&mut row, &set, pattern).map(|_| ()),
        Err(RowError::NotFound)
    );
    assert_eq!(row.len(), len);
}

#[test]
fn udt_scope_binds_to_schema_id() {
    let mut row = new_row();
    let mut edit = field(&row, "home");
    let udt_args = TypeArgumentList::from_schema_id(SchemaId(3));
    let home = LayoutType::Udt
        .write_scope(&mut row, &mut edit, &udt_args, UpdateOptions::Upsert)
        .unwrap();
    assert_eq!(home.layout().schema_id(), SchemaId(3));

    let zip = home.layout().find_column("zip").unwrap().clone();
    LayoutType::Int32.write_fixed(&mut row, &home, &zip, &Value::Int32(98052)).unwrap();
    let mut city = home.clone();
    city.find(&row, "city");
    LayoutType::Utf8.write_sparse(&mut row, &mut city, &Value::from("Redmond"), UpdateOptions::Upsert).unwrap();

    let edit = field(&row, "home");
    let home = LayoutType::Udt.read_scope(&row, &edit).unwrap();
    assert_eq!(home.layout().schema_id(), SchemaId(3));
    assert_eq!(LayoutType::Int32.read_fixed(&row, &home, &zip), Ok(Value::Int32(98052)));
    let mut city = home.clone();
    assert!(city.find(&row, "city"));
    assert_eq!(LayoutType::Utf8.read_sparse(&row, &city), Ok(Value::from("Redmond")));
}

#[test]
fn udt_scope_rejects_other_schema_ids() {
    let mut row = new_row();
    let mut edit = field(&row, "home");
    assert_eq!(
        LayoutType::Udt
            .write_scope(&mut row, &mut edit, &TypeArgumentList::from_schema_id(SchemaId(2)), UpdateOptions::Upsert)
            .map(|_| ()),
        Err(RowError::TypeConstraint)
    );
}

#[test]
fn read_from_round_trips_and_rejects_garbage() {
    let mut row = new_row();
    let mut edit = field(&row, "name");
    LayoutType::Utf8.write_sparse(&mut row, &mut edit, &Value::from("Ada"), UpdateOptions::Upsert).unwrap();
    let bytes = row.as_bytes().to_vec();

    let mut copy = RowBuffer::default();
    assert!(copy.read_from(&bytes, HYBRID_ROW_VERSION, resolver()));
    assert_eq!(copy.as_bytes(), bytes.as_slice());

    let mut truncated = RowBuffer::default();
    assert!(!truncated.read_from(&bytes[..bytes.len() - 1], HYBRID_ROW_VERSION, resolver()));
    assert!(truncated.is_empty());
    assert!(!truncated.read_from(&bytes, HYBRID_ROW_VERSION + 1, resolver()));
}

#[test]
fn unbound_buffer_has_no_root_cursor() {
    let row = RowBuffer::default();
    assert_eq!(RowCursor::create(&row).map(|_| ()), Err(RowError::NotFound));
}

#[test]
fn shifts_are_all_or_nothing() {
    let mut row = new_row();
    let fixed_end = row.len();
    let before = row.as_bytes().to_vec();

    assert!(row.shift_insert(fixed_end - 1, 4).is_err());
    assert!(row.shift_insert(fixed_end + 1, 4).is_err());
    assert!(row.shift_delete(fixed_end, 1).is_err());
    assert_eq!(row.as_bytes(), before.as_slice());

    row.shift_insert(fixed_end, 3).unwrap();
    assert_eq!(row.len(), fixed_end + 3);
    assert!(row.shift_delete(fixed_end + 1, 3).is_err());
    row.shift_delete(fixed_end, 3).unwrap();
    assert_eq!(row.as_bytes(), before.as_slice());

    assert!(RowBuffer::default().shift_insert(0, 1).is_err());
}

fn object_with_inner_field(row: &mut RowBuffer) -> RowCursor {
    let mut edit = field(row, "obj");
    let mut child = LayoutType::Object
        .write_scope(row, &mut edit, &TypeArgumentList::default(), UpdateOptions::Upsert)
        .unwrap();
    child.find(row, "inner");
    LayoutType::Int64
        .write_sparse(row, &mut child, &Value::Int64(9), UpdateOptions::Insert)
        .unwrap();
    edit
}

fn reloads(row: &RowBuffer) -> bool {
    RowBuffer::default().read_from(row.as_bytes(), HYBRID_ROW_VERSION, resolver())
}

#[test]
fn overwrite_after_nested_write_replaces_whole_scope() {
    let mut row = new_row();
    let mut edit = object_with_inner_field(&mut row);

    LayoutType::Utf8
        .write_sparse(&mut row, &mut edit, &Value::from("flat"), UpdateOptions::Upsert)
        .unwrap();
    assert!(reloads(&row));

    let edit = field(&row, "obj");
    assert_eq!(LayoutType::Utf8.read_sparse(&row, &edit).unwrap(), Value::from("flat"));
    let mut cursor = RowCursor::create(&row).unwrap();
    let mut paths = Vec::new();
    while cursor.move_next(&row) {
        paths.push(cursor.read_path().map(str::to_owned));
    }
    assert_eq!(paths, vec![Some("obj".to_owned())]);
}

#[test]
fn delete_after_nested_write_removes_whole_scope() {
    let mut row = new_row();
    let empty_len = row.len();
    let mut edit = object_with_inner_field(&mut row);

    LayoutType::Object.delete_scope(&mut row, &mut edit).unwrap();
    assert!(reloads(&row));
    assert_eq!(row.len(), empty_len);
    assert!(!field(&row, "obj").exists());
}

#[test]
fn move_next_after_nested_write_skips_whole_scope() {
    let mut row = new_row();
    let mut edit = object_with_inner_field(&mut row);
    let mut name = field(&row, "name");
    LayoutType::Utf8
        .write_sparse(&mut row, &mut name, &Value::from("Ada"), UpdateOptions::Insert)
        .unwrap();

    let mut child = LayoutType::Object.read_scope(&row, &edit).unwrap();
    child.find(&row, "more");
    LayoutType::Int64
        .write_sparse(&mut row, &mut child, &Value::Int64(1), UpdateOptions::Insert)
        .unwrap();

    assert!(edit.move_next(&row));
    assert_eq!(edit.read_path(), Some("name"));
    assert_eq!(LayoutType::Utf8.read_sparse(&row, &edit).unwrap(), Value::from("Ada"));
    assert!(reloads(&row));
}
