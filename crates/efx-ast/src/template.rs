//! Untyped template-line structure produced by the template parser.
//!
//! A template is a sequence of indentation-structured lines. Each line
//! optionally declares an outline number and an evaluation context, then
//! carries content pieces: free text, label references, and value
//! references. The template translator (in `efx-translate`) validates the
//! indentation contract and assembles lines into the content-block tree;
//! this module only describes one parsed line.

use crate::expr::{Expr, RefExpr};

/// One parsed template line.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateLine {
    /// Leading whitespace, verbatim; the template translator derives the
    /// indentation level and enforces tab/space consistency from this
    pub leading: String,
    /// Explicit outline number, when the line starts with one
    pub number: Option<u32>,
    /// Declared context, when the line carries a `{...}` declaration
    pub context: Option<ContextDecl>,
    /// Content pieces in source order
    pub content: Vec<ContentPart>,
}

/// Context declaration at the start of a template line.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextDecl {
    /// The field or node the line's content is evaluated against
    pub reference: RefExpr,
    /// Variable bound to the context, `{BT-x as $name}`
    pub alias: Option<String>,
}

/// One piece of template-line content.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentPart {
    /// Free text, rendered verbatim by the markup back-end
    Text(String),
    /// Label reference `#{...}`
    Label(LabelRef),
    /// Value reference `${expr}`
    Value(Expr),
}

/// Label shorthand forms inside `#{...}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelRef {
    /// Explicit `assetType|labelType|assetId`
    Explicit {
        /// Asset type part
        asset_type: String,
        /// Label type part
        label_type: String,
        /// Asset identifier part
        asset_id: String,
    },
    /// Field shorthand `labelType|FieldId`; a `value` label type selects
    /// indirect, value-dependent resolution
    Field {
        /// Label type part
        label_type: String,
        /// Field identifier
        field_id: String,
    },
    /// Alias shorthand `labelType|$alias`, applying a label type to the
    /// field a context alias is bound to
    Alias {
        /// Label type part
        label_type: String,
        /// Alias name (without `$`)
        alias: String,
    },
}
