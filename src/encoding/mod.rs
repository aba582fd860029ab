//! # Encoding Module
//!
//! Low-level byte encodings shared by the row engine:
//!
//! - **Varint encoding**: LEB128 and zigzag integers for length prefixes, path
//!   tokens, tuple arities and the `VarInt`/`VarUInt` payloads
//! - **Key encoding**: Big-endian byte-comparable sort keys that fix the element
//!   order of sets and maps

pub mod key;
pub mod varint;

pub use key::type_prefix;
pub use varint::{
    decode_varint, decode_varuint, encode_varint, encode_varuint, push_varint, push_varuint,
    varint_len, varuint_len,
};
