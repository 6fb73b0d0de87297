//! # EFX AST and foundation types
//!
//! Shared leaf types for the EFX translation engine:
//!
//! - [`foundation`] — the XPath-shaped path model with the
//!   contextualization algorithm, and the data-type/shape lattice behind
//!   [`TypedExpression`](foundation::TypedExpression)
//! - [`expr`] — the untyped expression tree the parser produces
//! - [`template`] — the untyped template-line structure the parser produces
//!
//! The crates above this one (`efx-parser`, `efx-translate`) depend only on
//! the types defined here; nothing in this crate performs symbol lookup or
//! target-language emission.

pub mod expr;
pub mod foundation;
pub mod template;

pub use expr::{AssetRef, BinaryOp, Expr, ExprKind, LiteralKind, QuantifierKind, RefExpr, UnaryOp};
pub use foundation::{contextualize, ConversionError, DataType, PathStep, Shape, TypedExpression, XPath};
pub use template::{ContentPart, ContextDecl, LabelRef, TemplateLine};
