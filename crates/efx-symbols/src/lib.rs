//! # Notice-schema symbols
//!
//! Field, node and codelist metadata for one notice-schema version, loaded
//! from the schema's JSON description and served through
//! [`SymbolRepository`]. Every XPath is parsed once at load time; a
//! repository is read-only after construction and safe to share across
//! concurrently running translator instances.

pub mod error;
pub mod model;
pub mod repository;

pub use error::SymbolError;
pub use model::{CodelistMeta, FieldMeta, FieldType, NodeMeta, SdkMetadata};
pub use repository::{Codelist, FieldSymbol, NodeSymbol, SymbolRepository};
