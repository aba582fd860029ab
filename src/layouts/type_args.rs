//! # Type Arguments
//!
//! Parametric layout types carry type arguments: the element type of a typed
//! array or set, the key and value types of a typed map, the slot types of a
//! tuple, and the schema id a UDT is bound to.
//!
//! ## Wire Encoding
//!
//! Type arguments follow the type code of every sparse value whose type takes
//! them. Each argument is itself `[code][its own arguments]`:
//!
//! ```text
//! TypedArray / TypedSet   [arg]
//! TypedMap                [key arg][value arg]
//! Tuple / TypedTuple      [varuint n][arg 1]..[arg n]
//! Udt                     [schema id: i32 LE]
//! everything else         (nothing)
//! ```
//!
//! Example: `array_t<tuple_t<utf8, int32>>` encodes as
//!
//! ```text
//! 0x22 | 0x2E 0x02 0x17 0x07
//!  |      |    |    |    +-- int32
//!  |      |    |    +------- utf8
//!  |      |    +------------ arity 2
//!  |      +----------------- tuple_t
//!  +------------------------ array_t (the value's own code)
//! ```

use std::fmt;

use eyre::{ensure, Result};
use smallvec::SmallVec;

use crate::config::{MAX_NESTING_DEPTH, SCHEMA_ID_SIZE};
use crate::encoding::varint::{decode_varuint, push_varuint};
use crate::schema::SchemaId;
use crate::types::LayoutType;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeArgument {
    layout_type: LayoutType,
    type_args: Box<TypeArgumentList>,
}

impl TypeArgument {
    pub fn new(layout_type: LayoutType, type_args: TypeArgumentList) -> Self {
        Self {
            layout_type,
            type_args: Box::new(type_args),
        }
    }

    pub fn leaf(layout_type: LayoutType) -> Self {
        Self::new(layout_type, TypeArgumentList::default())
    }

    pub fn layout_type(&self) -> LayoutType {
        self.layout_type
    }

    pub fn type_args(&self) -> &TypeArgumentList {
        &self.type_args
    }

    fn encode(&self, out: &mut Vec<u8>) {
        out.push(self.layout_type.code());
        self.type_args.encode(self.layout_type, out);
    }
}

impl fmt::Display for TypeArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.layout_type)?;
        if self.layout_type == LayoutType::Udt {
            return write!(f, "<{}>", self.type_args.schema_id);
        }
        if !self.type_args.is_empty() {
            write!(f, "{}", self.type_args)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct TypeArgumentList {
    args: SmallVec<[TypeArgument; 2]>,
    schema_id: SchemaId,
}

impl TypeArgumentList {
    pub fn new(args: impl IntoIterator<Item = TypeArgument>) -> Self {
        Self {
            args: args.into_iter().collect(),
            schema_id: SchemaId::INVALID,
        }
    }

    pub fn from_schema_id(schema_id: SchemaId) -> Self {
        Self {
            args: SmallVec::new(),
            schema_id,
        }
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TypeArgument> {
        self.args.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeArgument> {
        self.args.iter()
    }

    pub fn schema_id(&self) -> SchemaId {
        self.schema_id
    }

    /// Number of arguments a type's wire form carries, or None when the count
    /// is stored explicitly (tuples).
    pub fn arity_of(layout_type: LayoutType) -> Option<usize> {
        match layout_type {
            LayoutType::TypedArray | LayoutType::TypedSet => Some(1),
            LayoutType::TypedMap => Some(2),
            LayoutType::Tuple | LayoutType::TypedTuple => None,
            _ => Some(0),
        }
    }

    /// Checks that this list has the shape `layout_type` requires.
    pub fn is_valid_for(&self, layout_type: LayoutType) -> bool {
        match layout_type {
            LayoutType::Udt => self.schema_id.is_valid() && self.args.is_empty(),
            LayoutType::Tuple | LayoutType::TypedTuple => {
                !self.args.is_empty() && !self.schema_id.is_valid()
            }
            t => {
                Self::arity_of(t) == Some(self.args.len()) && !self.schema_id.is_valid()
            }
        }
    }

    pub fn encode(&self, layout_type: LayoutType, out: &mut Vec<u8>) {
        match layout_type {
            LayoutType::Udt => out.extend_from_slice(&self.schema_id.0.to_le_bytes()),
            LayoutType::Tuple | LayoutType::TypedTuple => {
                push_varuint(self.args.len() as u64, out);
                for arg in &self.args {
                    arg.encode(out);
                }
            }
            _ => {
                for arg in &self.args {
                    arg.encode(out);
                }
            }
        }
    }

    /// Decodes the arguments of `layout_type` from the front of `buf`,
    /// returning them with the number of bytes consumed.
    pub fn decode(buf: &[u8], layout_type: LayoutType) -> Result<(Self, usize)> {
        Self::decode_at_depth(buf, layout_type, 0)
    }

    fn decode_at_depth(buf: &[u8], layout_type: LayoutType, depth: usize) -> Result<(Self, usize)> {
        ensure!(
            depth <= MAX_NESTING_DEPTH,
            "type arguments nested deeper than {}",
            MAX_NESTING_DEPTH
        );

        match layout_type {
            LayoutType::Udt => {
                ensure!(
                    buf.len() >= SCHEMA_ID_SIZE,
                    "truncated udt schema id: {} < {}",
                    buf.len(),
                    SCHEMA_ID_SIZE
                );
                let mut id = [0u8; SCHEMA_ID_SIZE];
                id.copy_from_slice(&buf[..SCHEMA_ID_SIZE]);
                let schema_id = SchemaId(i32::from_le_bytes(id));
                ensure!(schema_id.is_valid(), "udt bound to the invalid schema id");
                Ok((Self::from_schema_id(schema_id), SCHEMA_ID_SIZE))
            }
            t => {
                let (count, mut pos) = match Self::arity_of(t) {
                    Some(n) => (n, 0),
                    None => {
                        let (n, read) = decode_varuint(buf)?;
                        ensure!(n > 0, "tuple with zero arity");
                        ensure!(
                            n <= buf.len() as u64,
                            "tuple arity {} exceeds remaining bytes",
                            n
                        );
                        (n as usize, read)
                    }
                };

                let mut args = SmallVec::with_capacity(count);
                for _ in 0..count {
                    ensure!(pos < buf.len(), "truncated type argument list");
                    let arg_type = LayoutType::try_from(buf[pos])?;
                    let (arg_args, read) =
                        Self::decode_at_depth(&buf[pos + 1..], arg_type, depth + 1)?;
                    args.push(TypeArgument::new(arg_type, arg_args));
                    pos += 1 + read;
                }
                Ok((
                    Self {
                        args,
                        schema_id: SchemaId::INVALID,
                    },
                    pos,
                ))
            }
        }
    }
}

impl fmt::Display for TypeArgumentList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.schema_id.is_valid() {
            return write!(f, "<{}>", self.schema_id);
        }
        f.write_str("<")?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", arg)?;
        }
        f.write_str(">")
    }
}

impl<'a> IntoIterator for &'a TypeArgumentList {
    type Item = &'a TypeArgument;
    type IntoIter = std::slice::Iter<'a, TypeArgument>;

    fn into_iter(self) -> Self::IntoIter {
        self.args.iter()
    }
}
