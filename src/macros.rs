//! # Internal Macros
//!
//! This module provides internal macros for reducing boilerplate in hybridrow.
//!
//! ## zerocopy_accessors!
//!
//! Generates getter and setter methods for zerocopy struct fields that use
//! little-endian wrapper types (I32, U32).
//!
//! ### Usage
//!
//! ```ignore
//! use zerocopy::little_endian::I32;
//!
//! #[repr(C)]
//! struct RowHeader {
//!     version: u8,
//!     schema_id: I32,
//! }
//!
//! impl RowHeader {
//!     zerocopy_accessors! {
//!         schema_id: i32,
//!     }
//! }
//!
//! // Generates:
//! // pub fn schema_id(&self) -> i32 { self.schema_id.get() }
//! // pub fn set_schema_id(&mut self, val: i32) { self.schema_id = I32::new(val); }
//! ```

/// Generates getter and setter methods for zerocopy little-endian fields.
#[macro_export]
macro_rules! zerocopy_accessors {
    (@impl $field:ident, i32) => {
        ::paste::paste! {
            #[inline]
            pub fn $field(&self) -> i32 {
                self.$field.get()
            }

            #[inline]
            pub fn [<set_ $field>](&mut self, val: i32) {
                self.$field = ::zerocopy::little_endian::I32::new(val);
            }
        }
    };
    (@impl $field:ident, u32) => {
        ::paste::paste! {
            #[inline]
            pub fn $field(&self) -> u32 {
                self.$field.get()
            }

            #[inline]
            pub fn [<set_ $field>](&mut self, val: u32) {
                self.$field = ::zerocopy::little_endian::U32::new(val);
            }
        }
    };
    ($($field:ident : $ty:tt),* $(,)?) => {
        $(
            $crate::zerocopy_accessors!(@impl $field, $ty);
        )*
    };
}
