//! # Schema Model
//!
//! The in-memory description of record shapes that the layout compiler
//! consumes. Hosts normally produce it from a textual schema document; this
//! crate only defines the model plus builder helpers so schemas can be
//! assembled directly in code.
//!
//! ## Hierarchy
//!
//! ```text
//! Namespace
//! ├── Schema "Person" (id 1)
//! │   ├── Property "name"     Primitive(utf8, variable)
//! │   ├── Property "age"      Primitive(int32, fixed, nullable)
//! │   └── Property "address"  SchemaRef("Address")
//! ├── Schema "Address" (id 2)
//! │   └── ...
//! └── Schema "Address" (id 3)   <- same name, newer version
//! ```
//!
//! ## Schema Identifiers
//!
//! - Ids are unique within a namespace; names need not be
//! - `SchemaId::INVALID` (0) means "no schema" and is never assigned
//! - A `SchemaRef` with an explicit id binds to exactly that schema; without an
//!   id it binds by name and the name must be unambiguous
//!
//! ## Usage Example
//!
//! ```
//! use hybridrow::schema::{Namespace, Property, PropertyType, Schema, SchemaId, TypeKind};
//!
//! let person = Schema::new("Person", SchemaId(1))
//!     .with_property(Property::new("age", PropertyType::primitive(TypeKind::Int32).fixed()))
//!     .with_property(Property::new("tags", PropertyType::array(PropertyType::primitive(TypeKind::Utf8).not_null())));
//!
//! let mut ns = Namespace::new("demo");
//! ns.add_schema(person).unwrap();
//! assert!(ns.schema_by_id(SchemaId(1)).is_some());
//! ```

mod property;

pub use property::{Property, PropertyType, StorageKind, TypeKind};

use std::fmt;

use eyre::{bail, ensure, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct SchemaId(pub i32);

impl SchemaId {
    pub const INVALID: SchemaId = SchemaId(0);

    pub fn id(self) -> i32 {
        self.0
    }

    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }
}

impl fmt::Display for SchemaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for SchemaId {
    fn from(id: i32) -> Self {
        SchemaId(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SchemaOptions {
    /// Rejects writes to sparse paths the schema does not declare.
    pub disallow_unschematized: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub name: String,
    pub schema_id: SchemaId,
    pub properties: Vec<Property>,
    pub options: SchemaOptions,
}

impl Schema {
    pub fn new(name: impl Into<String>, schema_id: SchemaId) -> Self {
        Self {
            name: name.into(),
            schema_id,
            properties: Vec::new(),
            options: SchemaOptions::default(),
        }
    }

    pub fn with_property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    pub fn with_options(mut self, options: SchemaOptions) -> Self {
        self.options = options;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Namespace {
    pub name: String,
    schemas: Vec<Schema>,
}

impl Namespace {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schemas: Vec::new(),
        }
    }

    pub fn add_schema(&mut self, schema: Schema) -> Result<()> {
        ensure!(
            schema.schema_id.is_valid(),
            "schema '{}' has the invalid schema id",
            schema.name
        );
        ensure!(
            self.schema_by_id(schema.schema_id).is_none(),
            "schema id {} already exists in namespace '{}'",
            schema.schema_id,
            self.name
        );

        self.schemas.push(schema);
        Ok(())
    }

    pub fn with_schema(mut self, schema: Schema) -> Result<Self> {
        self.add_schema(schema)?;
        Ok(self)
    }

    pub fn schemas(&self) -> &[Schema] {
        &self.schemas
    }

    pub fn schema_by_id(&self, id: SchemaId) -> Option<&Schema> {
        self.schemas.iter().find(|s| s.schema_id == id)
    }

    pub fn schemas_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Schema> + 'a {
        self.schemas.iter().filter(move |s| s.name == name)
    }

    /// Resolves a schema reference to the id it binds to.
    pub fn resolve_ref(&self, name: &str, id: SchemaId) -> Result<SchemaId> {
        if id.is_valid() {
            let schema = self
                .schema_by_id(id)
                .ok_or_else(|| eyre::eyre!("schema '{}' with id {} not found", name, id))?;
            ensure!(
                name.is_empty() || schema.name == name,
                "schema id {} names '{}', not '{}'",
                id,
                schema.name,
                name
            );
            return Ok(id);
        }

        let mut matches = self.schemas_named(name);
        match (matches.next(), matches.next()) {
            (Some(schema), None) => Ok(schema.schema_id),
            (Some(_), Some(_)) => bail!(
                "schema reference '{}' is ambiguous in namespace '{}'; give an explicit id",
                name,
                self.name
            ),
            (None, _) => bail!("schema '{}' not found in namespace '{}'", name, self.name),
        }
    }
}
