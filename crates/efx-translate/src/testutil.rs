//! Test doubles shared by the unit tests in this crate.
//!
//! `FakeScript` and `FakeMarkup` emit a terse XPath-flavoured text form,
//! enough to assert composition order and context handling without
//! depending on a real back-end crate.

use efx_ast::expr::BinaryOp;
use efx_ast::foundation::{DataType, Shape, TypedExpression, XPath};
use efx_symbols::{SdkMetadata, SymbolRepository};

use crate::traits::{MarkupComposer, ScriptComposer};

pub fn sample_metadata_json() -> &'static str {
    r#"{
        "sdkVersion": "1.0",
        "fields": [
            {
                "id": "BT-00-Code",
                "parentNodeId": "ND-Business",
                "xpathAbsolute": "/*/PathNode/CodeField/normalize-space(text())",
                "type": "code",
                "codeList": { "value": { "id": "currencies-tailored" } }
            },
            {
                "id": "BT-00-Indicator",
                "parentNodeId": "ND-Root",
                "xpathAbsolute": "/*/IndicatorField",
                "type": "indicator"
            },
            {
                "id": "BT-00-Attribute",
                "parentNodeId": "ND-Business",
                "xpathAbsolute": "/*/PathNode/CodeField/@listName",
                "type": "text"
            },
            {
                "id": "BT-00-Text",
                "parentNodeId": "ND-Root",
                "xpathAbsolute": "/*/TextField",
                "type": "text"
            }
        ],
        "xmlStructure": [
            { "id": "ND-Root", "xpathAbsolute": "/*" },
            { "id": "ND-Business", "parentId": "ND-Root", "xpathAbsolute": "/*/PathNode" }
        ],
        "codelists": [
            { "id": "currencies-tailored", "parentId": "currencies", "values": ["EUR"] },
            { "id": "currencies", "values": ["EUR", "SEK", "GBP"] }
        ]
    }"#
}

pub fn repo() -> SymbolRepository {
    let metadata: SdkMetadata = serde_json::from_str(sample_metadata_json()).unwrap();
    SymbolRepository::from_metadata(metadata).unwrap()
}

fn op_text(op: BinaryOp) -> &'static str {
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
        BinaryOp::Div => "/",
        BinaryOp::Mod => "%",
        BinaryOp::And => "and",
        BinaryOp::Or => "or",
    }
}

fn scripts(items: &[TypedExpression]) -> Vec<&str> {
    items.iter().map(TypedExpression::script).collect()
}

pub struct FakeScript;

impl ScriptComposer for FakeScript {
    fn compose_number_literal(&self, text: &str) -> TypedExpression {
        TypedExpression::literal(text, Shape::Scalar, DataType::Number)
    }

    fn compose_string_literal(&self, text: &str) -> TypedExpression {
        TypedExpression::literal(format!("'{}'", text), Shape::Scalar, DataType::String)
    }

    fn compose_boolean_literal(&self, value: bool) -> TypedExpression {
        let text = if value { "true" } else { "false" };
        TypedExpression::literal(text, Shape::Scalar, DataType::Boolean)
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
            format!("{} {} {}", left.script(), op_text(op), right.script()),
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
            format!("{} {} {}", left.script(), op_text(op), right.script()),
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
            format!("{} {} {}", left.script(), op_text(op), right.script()),
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
        TypedExpression::new(format!("-{}", operand.script()), Shape::Scalar, DataType::Number)
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
        TypedExpression::new(
            format!("{} in {}", item.script(), list.script()),
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
            format!("any ${} in {} satisfies {}", variable, list.script(), body.script()),
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
        TypedExpression::new(
            format!("{}({})", name, scripts(&args).join(", ")),
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
            format!("document({}){}", notice.script(), field_path),
            Shape::Path,
            data_type,
        )
    }

    fn compose_notice_reference(&self, notice: TypedExpression) -> TypedExpression {
        TypedExpression::new(
            format!("document({})", notice.script()),
            Shape::Path,
            DataType::Node,
        )
    }
}

pub struct FakeMarkup;

impl MarkupComposer for FakeMarkup {
    fn render_free_text(&self, text: &str) -> String {
        format!("text('{}')", text)
    }

    fn render_label_from_key(&self, key: &str) -> String {
        format!("label('{}')", key)
    }

    fn render_label_from_expression(&self, expression: &TypedExpression) -> String {
        format!("label({})", expression.script())
    }

    fn render_value_reference(&self, value: &TypedExpression) -> String {
        format!("value({})", value.script())
    }

    fn compose_fragment_definition(
        &self,
        name: &str,
        outline_number: &str,
        body: &str,
        parameters: &[String],
    ) -> String {
        format!(
            "fragment {}({}) number='{}' {{ {} }}",
            name,
            parameters.join(", "),
            outline_number,
            body
        )
    }

    fn render_fragment_invocation(
        &self,
        name: &str,
        context_path: &XPath,
        parameters: &[String],
    ) -> String {
        format!("call {}({}) at {}", name, parameters.join(", "), context_path)
    }

    fn compose_output_file(&self, call_sites: &[String], fragments: &[String]) -> String {
        let mut out = String::new();
        for site in call_sites {
            out.push_str(site);
            out.push('\n');
        }
        out.push_str("---\n");
        for fragment in fragments {
            out.push_str(fragment);
            out.push('\n');
        }
        out
    }
}
