//! # Layout Resolution
//!
//! A `LayoutResolver` maps a `SchemaId` to its compiled `Layout`. It is the one
//! extension point a host supplies to the row engine: rows resolve their own
//! schema through it when loaded, and UDT scopes resolve their nested schema
//! through it on first touch.
//!
//! ## Caching
//!
//! `LayoutResolverNamespace` compiles on demand and memoizes by id:
//!
//! ```text
//! resolve(id)
//!     │
//!     ├── read lock: cache hit? ──> Arc<Layout>
//!     │
//!     ├── schema id in namespace? ── no ──> parent resolver, or error
//!     │
//!     ├── compile (no lock held)
//!     │
//!     └── write lock: insert unless another thread won the race
//! ```
//!
//! Resolution is keyed by id only. Two schemas may share a name (successive
//! versions of a UDT); a column bound to id 3 always sees the layout of id 3.

use std::fmt;
use std::sync::Arc;

use eyre::{bail, Result};
use hashbrown::HashMap;
use parking_lot::RwLock;
use tracing::debug;

use crate::schema::{Namespace, SchemaId};

use super::{Layout, LayoutCompiler};

pub trait LayoutResolver: Send + Sync {
    fn resolve(&self, schema_id: SchemaId) -> Result<Arc<Layout>>;
}

pub struct LayoutResolverNamespace {
    namespace: Namespace,
    parent: Option<Arc<dyn LayoutResolver>>,
    cache: RwLock<HashMap<SchemaId, Arc<Layout>>>,
}

impl LayoutResolverNamespace {
    pub fn new(namespace: Namespace) -> Self {
        Self {
            namespace,
            parent: None,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Ids this namespace does not define are delegated to `parent`.
    pub fn with_parent(namespace: Namespace, parent: Arc<dyn LayoutResolver>) -> Self {
        Self {
            namespace,
            parent: Some(parent),
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    pub fn cached_count(&self) -> usize {
        self.cache.read().len()
    }
}

impl LayoutResolver for LayoutResolverNamespace {
    fn resolve(&self, schema_id: SchemaId) -> Result<Arc<Layout>> {
        if let Some(layout) = self.cache.read().get(&schema_id) {
            return Ok(Arc::clone(layout));
        }

        let Some(schema) = self.namespace.schema_by_id(schema_id) else {
            if let Some(parent) = &self.parent {
                return parent.resolve(schema_id);
            }
            bail!(
                "schema id {} not found in namespace '{}'",
                schema_id,
                self.namespace.name
            );
        };

        debug!(
            schema_id = %schema_id,
            name = %schema.name,
            namespace = %self.namespace.name,
            "layout cache miss"
        );
        let layout = Arc::new(LayoutCompiler::compile(&self.namespace, schema)?);

        let mut cache = self.cache.write();
        let entry = cache.entry(schema_id).or_insert(layout);
        Ok(Arc::clone(entry))
    }
}

impl fmt::Debug for LayoutResolverNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutResolverNamespace")
            .field("namespace", &self.namespace.name)
            .field("has_parent", &self.parent.is_some())
            .field("cached", &self.cached_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Property, PropertyType, Schema, TypeKind};

    fn namespace() -> Namespace {
        let mut ns = Namespace::new("ns");
        ns.add_schema(
            Schema::new("Udt", SchemaId(2))
                .with_property(Property::new("a", PropertyType::primitive(TypeKind::Int8).fixed())),
        )
        .unwrap();
        ns.add_schema(
            Schema::new("Udt", SchemaId(3))
                .with_property(Property::new("a", PropertyType::primitive(TypeKind::Int64).fixed()))
                .with_property(Property::new("b", PropertyType::primitive(TypeKind::Int64).fixed())),
        )
        .unwrap();
        ns
    }

    #[test]
    fn resolves_by_id_not_name() {
        let resolver = LayoutResolverNamespace::new(namespace());
        let v2 = resolver.resolve(SchemaId(2)).unwrap();
        let v3 = resolver.resolve(SchemaId(3)).unwrap();
        assert_eq!(v2.name(), v3.name());
        assert_eq!(v2.schema_id(), SchemaId(2));
        assert_eq!(v3.schema_id(), SchemaId(3));
        assert_ne!(v2.size(), v3.size());
    }

    #[test]
    fn memoizes_compiled_layouts() {
        let resolver = LayoutResolverNamespace::new(namespace());
        let first = resolver.resolve(SchemaId(3)).unwrap();
        let second = resolver.resolve(SchemaId(3)).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(resolver.cached_count(), 1);
    }

    #[test]
    fn unknown_id_is_an_error() {
        let resolver = LayoutResolverNamespace::new(namespace());
        assert!(resolver.resolve(SchemaId(42)).is_err());
    }

    #[test]
    fn delegates_unknown_ids_to_parent() {
        let parent: Arc<dyn LayoutResolver> = Arc::new(LayoutResolverNamespace::new(namespace()));
        let child_ns = Namespace::new("child")
            .with_schema(Schema::new("Row", SchemaId(10)))
            .unwrap();
        let child = LayoutResolverNamespace::with_parent(child_ns, parent);

        assert_eq!(child.resolve(SchemaId(10)).unwrap().name(), "Row");
        assert_eq!(child.resolve(SchemaId(3)).unwrap().schema_id(), SchemaId(3));
        assert_eq!(child.cached_count(), 1);
    }
}
