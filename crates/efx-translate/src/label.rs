//! Label shorthand resolution.
//!
//! `#{...}` label references resolve either to a literal label key or, for
//! the `value` label type, to an indirect key expression computed from the
//! field's value at render time. The decision table:
//!
//! - `assetType|labelType|assetId` — literal key, the three parts joined
//!   with `|`
//! - `labelType|FieldId` — literal key with the asset type implied as
//!   `field`, unless `labelType` is `value`
//! - `value|FieldId` — indirect resolution on the field's declared type:
//!   `indicator` builds `concat('indicator|when-', <value>)`,
//!   `code`/`internal-code` build `concat('code|<rootCodelist>.', <value>)`,
//!   anything else is [`TranslateError::UnsupportedLabelFieldType`]
//! - `labelType|$alias` — the alias's field substituted, then as above

use efx_ast::expr::{AssetRef, Expr, ExprKind, RefExpr};
use efx_ast::foundation::TypedExpression;
use efx_ast::template::LabelRef;

use crate::error::{TranslateError, TranslateResult};
use crate::expression::ExpressionTranslator;
use efx_symbols::FieldType;

/// Label type selecting indirect, value-dependent resolution.
const VALUE_LABEL: &str = "value";

/// A resolved label: either a literal key or a computed key expression.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedLabel {
    /// Literal label key, looked up as-is
    Key(String),
    /// Key expression evaluated against the rendered document
    Indirect(TypedExpression),
}

/// Resolve one label reference under the translator's current context.
///
/// `alias_field` maps a context alias name to the field it is bound to;
/// the template translator maintains it while walking blocks.
pub fn resolve_label(
    translator: &mut ExpressionTranslator<'_>,
    label: &LabelRef,
    alias_field: &dyn Fn(&str) -> Option<String>,
) -> TranslateResult<ResolvedLabel> {
    match label {
        LabelRef::Explicit {
            asset_type,
            label_type,
            asset_id,
        } => Ok(ResolvedLabel::Key(format!(
            "{}|{}|{}",
            asset_type, label_type, asset_id
        ))),
        LabelRef::Field {
            label_type,
            field_id,
        } => resolve_field_label(translator, label_type, field_id),
        LabelRef::Alias { label_type, alias } => {
            let field_id = alias_field(alias)
                .ok_or_else(|| TranslateError::UnknownVariable(alias.clone()))?;
            resolve_field_label(translator, label_type, &field_id)
        }
    }
}

fn resolve_field_label(
    translator: &mut ExpressionTranslator<'_>,
    label_type: &str,
    field_id: &str,
) -> TranslateResult<ResolvedLabel> {
    if label_type != VALUE_LABEL {
        return Ok(ResolvedLabel::Key(format!(
            "field|{}|{}",
            label_type, field_id
        )));
    }
    let field_type = translator.symbols().field_type_of_field(field_id)?;
    let prefix = match field_type {
        FieldType::Indicator => "indicator|when-".to_string(),
        FieldType::Code | FieldType::InternalCode => {
            let root = translator.symbols().root_codelist_of_field(field_id)?;
            format!("code|{}.", root)
        }
        other => {
            return Err(TranslateError::UnsupportedLabelFieldType {
                field_id: field_id.to_string(),
                field_type: other.name().to_string(),
            })
        }
    };
    let reference = Expr::new(ExprKind::Ref(RefExpr::plain(AssetRef::Field(
        field_id.to_string(),
    ))));
    let value = translator.translate(&reference)?;
    let parts = vec![translator.script().compose_string_literal(&prefix), value];
    Ok(ResolvedLabel::Indirect(
        translator.script().compose_string_concatenation(parts),
    ))
}
