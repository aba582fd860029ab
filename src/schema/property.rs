//! # Properties and Property Types
//!
//! A property is a named slot in a schema. Its `PropertyType` says what kind of
//! value lives there and, for primitives, which storage discipline the row uses
//! for it.
//!
//! ## Storage Kinds
//!
//! | Storage | Where | Legal types |
//! |---------|-------|-------------|
//! | Fixed | Static offset in the fixed region | Every primitive except VarInt/VarUInt |
//! | Variable | Length-prefixed in the variable region | Utf8, Binary, VarInt, VarUInt |
//! | Sparse | Path-addressed in the sparse region | Everything (default) |
//!
//! Non-primitive property types (object, collections, tuples, schema
//! references) are always sparse.
//!
//! ## Builders
//!
//! ```
//! use hybridrow::schema::{PropertyType, StorageKind, TypeKind};
//!
//! let t = PropertyType::primitive(TypeKind::Utf8).variable().with_length(32);
//! assert_eq!(t.storage(), StorageKind::Variable);
//! assert!(t.is_nullable());
//! ```

use crate::types::LayoutType;

use super::SchemaId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StorageKind {
    #[default]
    Sparse,
    Fixed,
    Variable,
}

/// Primitive type names as they appear in a schema document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Null,
    Boolean,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    VarInt,
    VarUInt,
    Float32,
    Float64,
    Float128,
    Decimal,
    DateTime,
    UnixDateTime,
    Guid,
    MongoDbObjectId,
    Utf8,
    Binary,
}

impl TypeKind {
    pub fn layout_type(self) -> LayoutType {
        match self {
            TypeKind::Null => LayoutType::Null,
            TypeKind::Boolean => LayoutType::Boolean,
            TypeKind::Int8 => LayoutType::Int8,
            TypeKind::Int16 => LayoutType::Int16,
            TypeKind::Int32 => LayoutType::Int32,
            TypeKind::Int64 => LayoutType::Int64,
            TypeKind::UInt8 => LayoutType::UInt8,
            TypeKind::UInt16 => LayoutType::UInt16,
            TypeKind::UInt32 => LayoutType::UInt32,
            TypeKind::UInt64 => LayoutType::UInt64,
            TypeKind::VarInt => LayoutType::VarInt,
            TypeKind::VarUInt => LayoutType::VarUInt,
            TypeKind::Float32 => LayoutType::Float32,
            TypeKind::Float64 => LayoutType::Float64,
            TypeKind::Float128 => LayoutType::Float128,
            TypeKind::Decimal => LayoutType::Decimal,
            TypeKind::DateTime => LayoutType::DateTime,
            TypeKind::UnixDateTime => LayoutType::UnixDateTime,
            TypeKind::Guid => LayoutType::Guid,
            TypeKind::MongoDbObjectId => LayoutType::MongoDbObjectId,
            TypeKind::Utf8 => LayoutType::Utf8,
            TypeKind::Binary => LayoutType::Binary,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub path: String,
    pub property_type: PropertyType,
}

impl Property {
    pub fn new(path: impl Into<String>, property_type: PropertyType) -> Self {
        Self {
            path: path.into(),
            property_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyType {
    Primitive {
        kind: TypeKind,
        storage: StorageKind,
        /// Exact byte length for fixed Utf8/Binary; max length for variable
        /// Utf8/Binary (0 = unbounded).
        length: u32,
        nullable: bool,
    },
    Object {
        properties: Vec<Property>,
        nullable: bool,
    },
    Array {
        items: Option<Box<PropertyType>>,
        nullable: bool,
    },
    Set {
        items: Option<Box<PropertyType>>,
        nullable: bool,
    },
    Map {
        keys: Option<Box<PropertyType>>,
        values: Option<Box<PropertyType>>,
        nullable: bool,
    },
    Tuple {
        items: Vec<PropertyType>,
        nullable: bool,
    },
    SchemaRef {
        name: String,
        schema_id: SchemaId,
        nullable: bool,
    },
}

impl PropertyType {
    pub fn primitive(kind: TypeKind) -> Self {
        PropertyType::Primitive {
            kind,
            storage: StorageKind::Sparse,
            length: 0,
            nullable: true,
        }
    }

    pub fn object(properties: Vec<Property>) -> Self {
        PropertyType::Object {
            properties,
            nullable: true,
        }
    }

    pub fn array(items: PropertyType) -> Self {
        PropertyType::Array {
            items: Some(Box::new(items)),
            nullable: true,
        }
    }

    pub fn array_any() -> Self {
        PropertyType::Array {
            items: None,
            nullable: true,
        }
    }

    pub fn set(items: PropertyType) -> Self {
        PropertyType::Set {
            items: Some(Box::new(items)),
            nullable: true,
        }
    }

    pub fn set_any() -> Self {
        PropertyType::Set {
            items: None,
            nullable: true,
        }
    }

    pub fn map(keys: PropertyType, values: PropertyType) -> Self {
        PropertyType::Map {
            keys: Some(Box::new(keys)),
            values: Some(Box::new(values)),
            nullable: true,
        }
    }

    pub fn map_any() -> Self {
        PropertyType::Map {
            keys: None,
            values: None,
            nullable: true,
        }
    }

    pub fn tuple(items: Vec<PropertyType>) -> Self {
        PropertyType::Tuple {
            items,
            nullable: true,
        }
    }

    pub fn schema_ref(name: impl Into<String>) -> Self {
        PropertyType::SchemaRef {
            name: name.into(),
            schema_id: SchemaId::INVALID,
            nullable: true,
        }
    }

    pub fn schema_ref_id(name: impl Into<String>, schema_id: SchemaId) -> Self {
        PropertyType::SchemaRef {
            name: name.into(),
            schema_id,
            nullable: true,
        }
    }

    pub fn fixed(self) -> Self {
        self.with_storage(StorageKind::Fixed)
    }

    pub fn variable(self) -> Self {
        self.with_storage(StorageKind::Variable)
    }

    /// Only primitives carry a storage kind; other types ignore it.
    pub fn with_storage(mut self, new_storage: StorageKind) -> Self {
        if let PropertyType::Primitive { storage, .. } = &mut self {
            *storage = new_storage;
        }
        self
    }

    pub fn with_length(mut self, new_length: u32) -> Self {
        if let PropertyType::Primitive { length, .. } = &mut self {
            *length = new_length;
        }
        self
    }

    pub fn not_null(self) -> Self {
        self.with_nullable(false)
    }

    pub fn with_nullable(mut self, value: bool) -> Self {
        match &mut self {
            PropertyType::Primitive { nullable, .. }
            | PropertyType::Object { nullable, .. }
            | PropertyType::Array { nullable, .. }
            | PropertyType::Set { nullable, .. }
            | PropertyType::Map { nullable, .. }
            | PropertyType::Tuple { nullable, .. }
            | PropertyType::SchemaRef { nullable, .. } => *nullable = value,
        }
        self
    }

    pub fn is_nullable(&self) -> bool {
        match self {
            PropertyType::Primitive { nullable, .. }
            | PropertyType::Object { nullable, .. }
            | PropertyType::Array { nullable, .. }
            | PropertyType::Set { nullable, .. }
            | PropertyType::Map { nullable, .. }
            | PropertyType::Tuple { nullable, .. }
            | PropertyType::SchemaRef { nullable, .. } => *nullable,
        }
    }

    pub fn storage(&self) -> StorageKind {
        match self {
            PropertyType::Primitive { storage, .. } => *storage,
            _ => StorageKind::Sparse,
        }
    }
}
