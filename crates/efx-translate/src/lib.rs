//! # EFX translation engine
//!
//! Turns parsed EFX expressions and templates into target-language text,
//! parametric over notice-schema versions (via a symbol resolver) and
//! target back-ends (via script and markup composers).
//!
//! - [`traits`] — the collaborator contracts: [`SymbolResolver`],
//!   [`ScriptComposer`], [`MarkupComposer`]
//! - [`context`] — the context stack tracking the active evaluation frame
//! - [`expression`] — the recursive bottom-up expression translator
//! - [`label`] — label shorthand resolution
//! - [`blocks`] — the content-block tree built from template lines
//! - [`template`] — the template translator driving all of the above
//! - [`registry`] — explicit `(version, qualifier)` back-end selection
//! - [`error`] — the translation error taxonomy
//!
//! A translator instance owns its context stack and must not be shared
//! across threads mid-translation; independent translations on separate
//! instances may run concurrently, sharing read-only collaborators.

pub mod blocks;
pub mod context;
pub mod error;
pub mod expression;
pub mod label;
pub mod registry;
pub mod template;
pub mod traits;

#[cfg(test)]
mod testutil;

pub use blocks::{BlockTree, ContentBlock};
pub use context::{Context, ContextKind, ContextStack};
pub use error::{TranslateError, TranslateResult};
pub use expression::{translate_expression, ExpressionTranslator};
pub use label::{resolve_label, ResolvedLabel};
pub use registry::{BackendRegistry, ANY_VERSION};
pub use template::{translate_template, TemplateTranslator};
pub use traits::{MarkupComposer, ScriptComposer, SymbolResolver};
