//! # Layouts
//!
//! Compiled row plans and the machinery that produces and caches them.
//!
//! ## Module Structure
//!
//! - `type_args`: `TypeArgument` / `TypeArgumentList` and their wire encoding
//! - `column`: `LayoutColumn` and `LayoutBit`
//! - `tokenizer`: `StringTokenizer` for sparse path tokens
//! - `layout`: the immutable `Layout`
//! - `builder`: `LayoutBuilder`, offset and bit assignment
//! - `compiler`: `LayoutCompiler`, schema to layout
//! - `resolver`: `LayoutResolver` trait and the caching namespace resolver
//!
//! ## Pipeline
//!
//! ```text
//! Namespace + Schema ──LayoutCompiler──> LayoutBuilder ──build──> Layout
//!                                                                   │
//!                         LayoutResolverNamespace (id -> Arc<Layout>)
//! ```

mod builder;
mod column;
mod compiler;
mod layout;
mod resolver;
mod tokenizer;
mod type_args;

pub use builder::LayoutBuilder;
pub use column::{LayoutBit, LayoutColumn};
pub use compiler::LayoutCompiler;
pub use layout::Layout;
pub use resolver::{LayoutResolver, LayoutResolverNamespace};
pub use tokenizer::StringTokenizer;
pub use type_args::{TypeArgument, TypeArgumentList};
