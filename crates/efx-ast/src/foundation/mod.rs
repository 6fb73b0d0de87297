//! Foundation types shared across the translation engine.
//!
//! - [`path`] — structural XPath model and the contextualization algorithm
//! - [`types`] — data-type/shape lattice and the tagged [`TypedExpression`]

pub mod path;
pub mod types;

pub use path::{contextualize, PathStep, XPath};
pub use types::{ConversionError, DataType, Shape, TypedExpression};
