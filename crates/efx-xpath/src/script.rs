//! XPath script composer.
//!
//! Emits an XPath 2.0 dialect in which value equality is spelled `==`
//! (and `!=` keeps its spelling), so translated assertions read like the
//! source rules. Everything else follows XPath conventions: `true()` and
//! `false()` literals, `div`/`mod` arithmetic, `some`/`every` quantifiers
//! and `if (...) then ... else ...` conditionals.
//!
//! Composition never inspects operand scripts; it only embeds them. The
//! grouping present in the source survives through the parenthesization
//! composition, so no re-derivation of precedence happens here.

use efx_ast::expr::BinaryOp;
use efx_ast::foundation::{DataType, Shape, TypedExpression, XPath};
use efx_translate::ScriptComposer;

/// Quote a string literal, doubling embedded quotes.
fn quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

fn operator(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Eq => "==",
        BinaryOp::Ne => "!=",
        BinaryOp::Lt => "<",
        BinaryOp::Le => "<=",
        BinaryOp::Gt => ">",
        BinaryOp::Ge => ">=",
        BinaryOp::Add => "+",
        BinaryOp::Sub => "-",
        BinaryOp::Mul => "*",
        BinaryOp::Div => "div",
        BinaryOp::Mod => "mod",
        BinaryOp::And => "and",
        BinaryOp::Or => "or",
    }
}

fn scripts(items: &[TypedExpression]) -> Vec<&str> {
    items.iter().map(TypedExpression::script).collect()
}

/// The shipped XPath back-end, valid for any schema version.
#[derive(Debug, Default)]
pub struct XPathScriptComposer;

impl XPathScriptComposer {
    pub fn new() -> Self {
        Self
    }
}

impl ScriptComposer for XPathScriptComposer {
    fn compose_number_literal(&self, text: &str) -> TypedExpression {
        TypedExpression::literal(text, Shape::Scalar, DataType::Number)
    }

    fn compose_string_literal(&self, text: &str) -> TypedExpression {
        TypedExpression::literal(quote(text), Shape::Scalar, DataType::String)
    }

    fn compose_boolean_literal(&self, value: bool) -> TypedExpression {
        let script = if value { "true()" } else { "false()" };
        TypedExpression::literal(script, Shape::Scalar, DataType::Boolean)
    }

    fn compose_path_reference(&self, path: &XPath) -> TypedExpression {
        TypedExpression::new(path.to_string(), Shape::Path, DataType::Node)
    }

    fn compose_field_value_reference(&self, path: &XPath, data_type: DataType) -> TypedExpression {
        TypedExpression::new(path.to_string(), Shape::Path, data_type)
    }

    fn compose_attribute_reference(&self, path: &XPath, attribute: &str) -> TypedExpression {
        let script = if path.is_self() {
            format!("@{}", attribute)
        } else {
            format!("{}/@{}", path, attribute)
        };
        TypedExpression::new(script, Shape::Path, DataType::String)
    }

    fn compose_symbol_reference(&self, field_id: &str, data_type: DataType) -> TypedExpression {
        TypedExpression::new(format!("/{}", field_id), Shape::Path, data_type)
    }

    fn compose_predicated_path(
        &self,
        path: TypedExpression,
        predicate: TypedExpression,
    ) -> TypedExpression {
        TypedExpression::new(
            format!("{}[{}]", path.script(), predicate.script()),
            Shape::Path,
            path.data_type(),
        )
    }

    fn join_paths(&self, prefix: TypedExpression, sub: TypedExpression) -> TypedExpression {
        let script = if sub.script() == "." {
            prefix.script().to_string()
        } else if sub.script().starts_with('/') {
            // The sub-expression is already rooted; the prefix adds nothing.
            sub.script().to_string()
        } else {
            format!("{}/{}", prefix.script(), sub.script())
        };
        TypedExpression::new(script, sub.shape(), sub.data_type())
    }

    fn compose_comparison(
        &self,
        op: BinaryOp,
        left: TypedExpression,
        right: TypedExpression,
    ) -> TypedExpression {
        TypedExpression::new(
            format!("{} {} {}", left.script(), operator(op), right.script()),
            Shape::Scalar,
            DataType::Boolean,
        )
    }

    fn compose_logical(
        &self,
        op: BinaryOp,
        left: TypedExpression,
        right: TypedExpression,
    ) -> TypedExpression {
        TypedExpression::new(
            format!("{} {} {}", left.script(), operator(op), right.script()),
            Shape::Scalar,
            DataType::Boolean,
        )
    }

    fn compose_arithmetic(
        &self,
        op: BinaryOp,
        left: TypedExpression,
        right: TypedExpression,
        result: DataType,
    ) -> TypedExpression {
        TypedExpression::new(
            format!("{} {} {}", left.script(), operator(op), right.script()),
            Shape::Scalar,
            result,
        )
    }

    fn compose_negation(&self, operand: TypedExpression) -> TypedExpression {
        TypedExpression::new(
            format!("not({})", operand.script()),
            Shape::Scalar,
            DataType::Boolean,
        )
    }

    fn compose_arithmetic_negation(&self, operand: TypedExpression) -> TypedExpression {
        TypedExpression::new(
            format!("-{}", operand.script()),
            Shape::Scalar,
            DataType::Number,
        )
    }

    fn compose_parenthesized(&self, operand: TypedExpression) -> TypedExpression {
        TypedExpression::new(
            format!("({})", operand.script()),
            operand.shape(),
            operand.data_type(),
        )
    }

    fn compose_list(&self, items: Vec<TypedExpression>, item_type: DataType) -> TypedExpression {
        TypedExpression::new(
            format!("({})", scripts(&items).join(", ")),
            Shape::Sequence,
            item_type,
        )
    }

    fn compose_containment(
        &self,
        item: TypedExpression,
        list: TypedExpression,
    ) -> TypedExpression {
        // Equality against a sequence is existential.
        TypedExpression::new(
            format!("{} == {}", item.script(), list.script()),
            Shape::Scalar,
            DataType::Boolean,
        )
    }

    fn compose_any_satisfies(
        &self,
        variable: &str,
        list: TypedExpression,
        body: TypedExpression,
    ) -> TypedExpression {
        TypedExpression::new(
            format!("some ${} in {} satisfies {}", variable, list.script(), body.script()),
            Shape::Scalar,
            DataType::Boolean,
        )
    }

    fn compose_every_satisfies(
        &self,
        variable: &str,
        list: TypedExpression,
        body: TypedExpression,
    ) -> TypedExpression {
        TypedExpression::new(
            format!("every ${} in {} satisfies {}", variable, list.script(), body.script()),
            Shape::Scalar,
            DataType::Boolean,
        )
    }

    fn compose_iteration(
        &self,
        variable: &str,
        list: TypedExpression,
        body: TypedExpression,
    ) -> TypedExpression {
        TypedExpression::new(
            format!("for ${} in {} return {}", variable, list.script(), body.script()),
            Shape::Sequence,
            body.data_type(),
        )
    }

    fn compose_variable_reference(
        &self,
        name: &str,
        shape: Shape,
        data_type: DataType,
    ) -> TypedExpression {
        TypedExpression::new(format!("${}", name), shape, data_type)
    }

    fn compose_conditional(
        &self,
        condition: TypedExpression,
        when_true: TypedExpression,
        when_false: TypedExpression,
    ) -> TypedExpression {
        let result = if when_true.data_type().accepts(when_false.data_type()) {
            when_true.data_type()
        } else {
            when_false.data_type()
        };
        TypedExpression::new(
            format!(
                "if ({}) then {} else {}",
                condition.script(),
                when_true.script(),
                when_false.script()
            ),
            Shape::Scalar,
            result,
        )
    }

    fn compose_function_call(
        &self,
        name: &str,
        args: Vec<TypedExpression>,
        shape: Shape,
        result: DataType,
    ) -> TypedExpression {
        // EFX date/time construction lowers to the XSD constructors.
        let target = match name {
            "date" => "xs:date",
            "time" => "xs:time",
            other => other,
        };
        TypedExpression::new(
            format!("{}({})", target, scripts(&args).join(", ")),
            shape,
            result,
        )
    }

    fn compose_string_concatenation(&self, parts: Vec<TypedExpression>) -> TypedExpression {
        TypedExpression::new(
            format!("concat({})", scripts(&parts).join(", ")),
            Shape::Scalar,
            DataType::String,
        )
    }

    fn compose_external_field_reference(
        &self,
        notice: TypedExpression,
        field_path: &XPath,
        data_type: DataType,
    ) -> TypedExpression {
        TypedExpression::new(
            format!("doc({}){}", notice.script(), field_path),
            Shape::Path,
            data_type,
        )
    }

    fn compose_notice_reference(&self, notice: TypedExpression) -> TypedExpression {
        TypedExpression::new(
            format!("doc({})", notice.script()),
            Shape::Path,
            DataType::Node,
        )
    }
}
