//! # Layout Compiler
//!
//! Turns a `Schema` (plus the `Namespace` it lives in, for schema references)
//! into a `Layout`. Compilation is pure: the same inputs always produce the
//! same layout, and the result is freely shareable.
//!
//! ## Property Mapping
//!
//! | Property type | Layout type | Storage |
//! |---------------|-------------|---------|
//! | Primitive | its `TypeKind` | as declared |
//! | Object | Object | sparse; nested properties must be sparse |
//! | Array, items absent or nullable | Array | sparse |
//! | Array, items non-nullable | TypedArray\<item\> | sparse |
//! | Set | Set / TypedSet\<item\> | sparse (same rule as arrays) |
//! | Map, keys and values non-nullable | TypedMap\<key, value\> | sparse |
//! | Map, otherwise | Map | sparse |
//! | Tuple, all items non-nullable | TypedTuple\<items\> | sparse |
//! | Tuple, otherwise | Tuple\<items\> | sparse |
//! | SchemaRef | Udt bound to the referenced id | sparse |
//!
//! ## Schema References
//!
//! A reference binds to a `SchemaId` at compile time but the referenced schema
//! is not compiled here. UDT layouts are resolved lazily through a
//! `LayoutResolver` when a row first touches them, which keeps recursive
//! schemas (a `Node` holding a `Node`) finite.
//!
//! ## Errors
//!
//! Structurally invalid schemas fail with an `eyre` error naming the offending
//! property: fixed non-nullable null columns, fixed varints, variable storage
//! on non-string types, fixed strings without a length, fixed or variable
//! storage inside an object, duplicate paths, and dangling or ambiguous
//! schema references.

use eyre::{ensure, Result, WrapErr};
use tracing::debug;

use crate::config::MAX_NESTING_DEPTH;
use crate::schema::{Namespace, Property, PropertyType, Schema, StorageKind};
use crate::types::LayoutType;

use super::{Layout, LayoutBuilder, TypeArgument, TypeArgumentList};

pub struct LayoutCompiler;

impl LayoutCompiler {
    pub fn compile(namespace: &Namespace, schema: &Schema) -> Result<Layout> {
        ensure!(
            schema.schema_id.is_valid(),
            "schema '{}' has the invalid schema id",
            schema.name
        );

        let mut builder = LayoutBuilder::new(schema.name.clone(), schema.schema_id);
        builder.set_options(schema.options);
        add_properties(&mut builder, namespace, &schema.properties, 0)
            .wrap_err_with(|| format!("failed to compile schema '{}'", schema.name))?;
        let layout = builder.build()?;

        debug!(
            name = %layout.name(),
            schema_id = %layout.schema_id(),
            size = layout.size(),
            columns = layout.columns().len(),
            "compiled layout"
        );
        Ok(layout)
    }
}

fn add_properties(
    builder: &mut LayoutBuilder,
    namespace: &Namespace,
    properties: &[Property],
    depth: usize,
) -> Result<()> {
    ensure!(
        depth <= MAX_NESTING_DEPTH,
        "objects nested deeper than {}",
        MAX_NESTING_DEPTH
    );

    for property in properties {
        let path = property.path.as_str();
        ensure!(!path.is_empty(), "property with an empty path");

        match &property.property_type {
            PropertyType::Primitive {
                kind,
                storage,
                length,
                nullable,
            } => {
                let layout_type = kind.layout_type();
                match storage {
                    StorageKind::Fixed => builder.add_fixed_column(
                        path,
                        layout_type,
                        *nullable,
                        *length as usize,
                    )?,
                    StorageKind::Variable => {
                        builder.add_variable_column(path, layout_type, *length as usize)?
                    }
                    StorageKind::Sparse => {
                        builder.add_sparse_column(path, layout_type, TypeArgumentList::default())?
                    }
                }
            }
            PropertyType::Object { properties, .. } => {
                builder.add_object_scope(path)?;
                add_properties(builder, namespace, properties, depth + 1)?;
                builder.end_object_scope()?;
            }
            other => {
                let (layout_type, type_args) = logical_type(namespace, other, 0)
                    .wrap_err_with(|| format!("property '{}'", path))?;
                builder.add_sparse_column(path, layout_type, type_args)?;
            }
        }
    }
    Ok(())
}

fn logical_type(
    namespace: &Namespace,
    property_type: &PropertyType,
    depth: usize,
) -> Result<(LayoutType, TypeArgumentList)> {
    ensure!(
        depth <= MAX_NESTING_DEPTH,
        "types nested deeper than {}",
        MAX_NESTING_DEPTH
    );

    let resolved = match property_type {
        PropertyType::Primitive { kind, .. } => (kind.layout_type(), TypeArgumentList::default()),
        PropertyType::Object { .. } => (LayoutType::Object, TypeArgumentList::default()),
        PropertyType::Array { items, .. } => match typed_item(items) {
            Some(item) => (
                LayoutType::TypedArray,
                TypeArgumentList::new([argument(namespace, item, depth)?]),
            ),
            None => (LayoutType::Array, TypeArgumentList::default()),
        },
        PropertyType::Set { items, .. } => match typed_item(items) {
            Some(item) => (
                LayoutType::TypedSet,
                TypeArgumentList::new([argument(namespace, item, depth)?]),
            ),
            None => (LayoutType::Set, TypeArgumentList::default()),
        },
        PropertyType::Map { keys, values, .. } => match (typed_item(keys), typed_item(values)) {
            (Some(k), Some(v)) => (
                LayoutType::TypedMap,
                TypeArgumentList::new([
                    argument(namespace, k, depth)?,
                    argument(namespace, v, depth)?,
                ]),
            ),
            _ => (LayoutType::Map, TypeArgumentList::default()),
        },
        PropertyType::Tuple { items, .. } => {
            ensure!(!items.is_empty(), "tuple must have at least one item");
            let all_typed = items.iter().all(|item| !item.is_nullable());
            let args = items
                .iter()
                .map(|item| argument(namespace, item, depth))
                .collect::<Result<Vec<_>>>()?;
            let layout_type = if all_typed {
                LayoutType::TypedTuple
            } else {
                LayoutType::Tuple
            };
            (layout_type, TypeArgumentList::new(args))
        }
        PropertyType::SchemaRef {
            name, schema_id, ..
        } => {
            let id = namespace.resolve_ref(name, *schema_id)?;
            (LayoutType::Udt, TypeArgumentList::from_schema_id(id))
        }
    };
    Ok(resolved)
}

/// Collection items only produce a typed scope when they cannot be null.
fn typed_item(items: &Option<Box<PropertyType>>) -> Option<&PropertyType> {
    match items {
        Some(item) if !item.is_nullable() => Some(item.as_ref()),
        _ => None,
    }
}

fn argument(
    namespace: &Namespace,
    property_type: &PropertyType,
    depth: usize,
) -> Result<TypeArgument> {
    let (layout_type, type_args) = logical_type(namespace, property_type, depth + 1)?;
    Ok(TypeArgument::new(layout_type, type_args))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{SchemaId, TypeKind};

    fn prim(kind: TypeKind) -> PropertyType {
        PropertyType::primitive(kind)
    }

    fn compile(properties: Vec<Property>) -> Result<Layout> {
        let mut schema = Schema::new("T", SchemaId(1));
        schema.properties = properties;
        let ns = Namespace::new("ns").with_schema(schema.clone())?;
        LayoutCompiler::compile(&ns, &schema)
    }

    #[test]
    fn fixed_nullable_int8_layout() {
        let layout = compile(vec![Property::new("a", prim(TypeKind::Int8).fixed())]).unwrap();
        let a = layout.find_column("a").unwrap();
        assert_eq!(a.storage(), StorageKind::Fixed);
        assert!(a.null_bit().is_some());
        assert_eq!(layout.size(), 2);
    }

    #[test]
    fn nullable_fixed_null_is_a_single_bit() {
        let layout = compile(vec![Property::new("n", prim(TypeKind::Null).fixed())]).unwrap();
        assert_eq!(layout.size(), 1);
        assert!(compile(vec![Property::new("n", prim(TypeKind::Null).fixed().not_null())]).is_err());
    }

    #[test]
    fn collection_mapping() {
        let layout = compile(vec![
            Property::new("a", PropertyType::array(prim(TypeKind::Int32).not_null())),
            Property::new("b", PropertyType::array(prim(TypeKind::Int32))),
            Property::new("c", PropertyType::set_any()),
            Property::new(
                "d",
                PropertyType::map(prim(TypeKind::Utf8).not_null(), prim(TypeKind::Int64).not_null()),
            ),
            Property::new("e", PropertyType::map(prim(TypeKind::Utf8).not_null(), prim(TypeKind::Int64))),
            Property::new(
                "f",
                PropertyType::tuple(vec![prim(TypeKind::Int8).not_null(), prim(TypeKind::Utf8).not_null()]),
            ),
            Property::new("g", PropertyType::tuple(vec![prim(TypeKind::Int8)])),
        ])
        .unwrap();

        let col = |p: &str| layout.find_column(p).unwrap();
        assert_eq!(col("a").layout_type(), LayoutType::TypedArray);
        assert_eq!(col("a").type_args().to_string(), "<int32>");
        assert_eq!(col("b").layout_type(), LayoutType::Array);
        assert_eq!(col("c").layout_type(), LayoutType::Set);
        assert_eq!(col("d").layout_type(), LayoutType::TypedMap);
        assert_eq!(col("d").type_args().len(), 2);
        assert_eq!(col("e").layout_type(), LayoutType::Map);
        assert_eq!(col("f").layout_type(), LayoutType::TypedTuple);
        assert_eq!(col("g").layout_type(), LayoutType::Tuple);
        assert_eq!(col("g").type_args().to_string(), "<int8>");
    }

    #[test]
    fn schema_refs_bind_by_id() {
        let udt_v1 = Schema::new("Udt", SchemaId(2));
        let udt_v2 = Schema::new("Udt", SchemaId(3));
        let row = Schema::new("Row", SchemaId(1))
            .with_property(Property::new("u", PropertyType::schema_ref_id("Udt", SchemaId(3))));
        let ns = Namespace::new("ns")
            .with_schema(udt_v1)
            .and_then(|ns| ns.with_schema(udt_v2))
            .and_then(|ns| ns.with_schema(row.clone()))
            .unwrap();

        let layout = LayoutCompiler::compile(&ns, &row).unwrap();
        let u = layout.find_column("u").unwrap();
        assert_eq!(u.layout_type(), LayoutType::Udt);
        assert_eq!(u.type_args().schema_id(), SchemaId(3));

        let ambiguous = Schema::new("Row2", SchemaId(4))
            .with_property(Property::new("u", PropertyType::schema_ref("Udt")));
        assert!(LayoutCompiler::compile(&ns, &ambiguous).is_err());
    }

    #[test]
    fn recursive_schema_compiles() {
        let node = Schema::new("Node", SchemaId(1))
            .with_property(Property::new("next", PropertyType::schema_ref("Node")));
        let ns = Namespace::new("ns").with_schema(node.clone()).unwrap();
        let layout = LayoutCompiler::compile(&ns, &node).unwrap();
        assert_eq!(layout.find_column("next").unwrap().type_args().schema_id(), SchemaId(1));
    }

    #[test]
    fn object_properties_must_be_sparse() {
        let err = compile(vec![Property::new(
            "o",
            PropertyType::object(vec![Property::new("x", prim(TypeKind::Int32).fixed())]),
        )])
        .unwrap_err();
        assert!(format!("{:?}", err).contains("inside an object"));
    }

    #[test]
    fn variable_storage_only_for_strings_and_varints() {
        assert!(compile(vec![Property::new("v", prim(TypeKind::VarInt).variable())]).is_ok());
        assert!(compile(vec![Property::new("v", prim(TypeKind::Float64).variable())]).is_err());
    }

    #[test]
    fn unschematized_option_carries_into_layout() {
        let schema = Schema::new("T", SchemaId(1)).with_options(crate::schema::SchemaOptions {
            disallow_unschematized: true,
        });
        let ns = Namespace::new("ns").with_schema(schema.clone()).unwrap();
        let layout = LayoutCompiler::compile(&ns, &schema).unwrap();
        assert!(!layout.allows_unschematized());
    }
}
