//! # Type System for HybridRow
//!
//! The closed set of layout types and the runtime values they carry.
//!
//! ## Module Structure
//!
//! - `layout_type`: `LayoutType` codes and the `END_SCOPE` terminator
//! - `value`: Owned runtime `Value`, one variant per leaf type
//! - `decimal`: 96-bit fixed-point `Decimal`
//! - `primitives`: `Float128`, `DateTime`, `UnixDateTime`, `MongoDbObjectId`
//!
//! ## Key Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | `LayoutType` | Wire type code and scope classification |
//! | `Value` | Leaf value passed to and returned by codecs |
//! | `Decimal` | Exact base-10 number with byte-exact encoding |
//!
//! ## Usage
//!
//! ```
//! use hybridrow::types::{LayoutType, Value};
//!
//! let v = Value::from(42i8);
//! assert_eq!(v.layout_type(), LayoutType::Int8);
//! assert_eq!(Value::default_for(LayoutType::Int8), Some(Value::Int8(0)));
//! ```

mod decimal;
mod layout_type;
mod primitives;
mod value;

pub use decimal::Decimal;
pub use layout_type::{LayoutType, END_SCOPE};
pub use primitives::{
    DateTime, Float128, MongoDbObjectId, UnixDateTime, TICKS_PER_MILLISECOND, UNIX_EPOCH_TICKS,
};
pub use value::Value;
