//! Bottom-up expression translation.
//!
//! [`ExpressionTranslator`] walks the untyped AST recursively; each node
//! translates its children first and composes the results through the
//! script composer. Context frames are pushed around predicates and
//! context overrides and popped on the way out, so a completed
//! translation leaves the context stack exactly where it started.
//!
//! Type checking happens here, not in the composer: operands are checked
//! against each production's declared shapes and data types before the
//! composer sees them.

use efx_ast::expr::{AssetRef, BinaryOp, Expr, ExprKind, LiteralKind, QuantifierKind, RefExpr, UnaryOp};
use efx_ast::foundation::{contextualize, DataType, Shape, TypedExpression};
use efx_parser::parse_expression;

use crate::context::ContextStack;
use crate::error::{TranslateError, TranslateResult};
use crate::traits::{ScriptComposer, SymbolResolver};

/// Recursive expression translator for one schema version and one target.
pub struct ExpressionTranslator<'a> {
    symbols: &'a dyn SymbolResolver,
    script: &'a dyn ScriptComposer,
    context: ContextStack,
    variables: Vec<(String, Shape, DataType)>,
}

impl<'a> ExpressionTranslator<'a> {
    /// Translator with an empty context stack; push a root context before
    /// translating.
    pub fn new(symbols: &'a dyn SymbolResolver, script: &'a dyn ScriptComposer) -> Self {
        Self {
            symbols,
            script,
            context: ContextStack::new(),
            variables: Vec::new(),
        }
    }

    /// The symbol resolver this translator consults.
    pub fn symbols(&self) -> &dyn SymbolResolver {
        self.symbols
    }

    /// The script composer this translator emits through.
    pub fn script(&self) -> &dyn ScriptComposer {
        self.script
    }

    /// Current context stack.
    pub fn context(&self) -> &ContextStack {
        &self.context
    }

    /// Push a context frame for a field or node identifier. Identifiers
    /// with the `ND-` prefix denote nodes by schema convention.
    pub fn push_context(&mut self, symbol_id: &str) -> TranslateResult<()> {
        if symbol_id.starts_with("ND-") {
            self.context.push_node(self.symbols, symbol_id)?;
        } else {
            self.context.push_field(self.symbols, symbol_id)?;
        }
        Ok(())
    }

    /// Pop the top context frame.
    pub fn pop_context(&mut self) {
        self.context.pop();
    }

    /// Bind a variable for the extent of a block or bound-variable scope.
    pub fn bind_variable(&mut self, name: &str, shape: Shape, data_type: DataType) {
        self.variables.push((name.to_string(), shape, data_type));
    }

    /// Drop the most recent `count` bindings.
    pub fn unbind_variables(&mut self, count: usize) {
        let keep = self.variables.len().saturating_sub(count);
        self.variables.truncate(keep);
    }

    /// Translate one expression under the current context.
    pub fn translate(&mut self, expr: &Expr) -> TranslateResult<TypedExpression> {
        match &expr.kind {
            ExprKind::Literal(lit) => Ok(self.translate_literal(lit)),
            ExprKind::List(items) => self.translate_list(items),
            ExprKind::Ref(reference) => self.translate_ref(reference),
            ExprKind::AbsolutePath(path) => {
                let field_id = self.symbols.field_id_for_absolute_path(path)?;
                let data_type = self.symbols.type_of_field(&field_id)?;
                Ok(self.script.compose_symbol_reference(&field_id, data_type))
            }
            ExprKind::Variable(name) => {
                let (shape, data_type) = self.lookup_variable(name)?;
                Ok(self.script.compose_variable_reference(name, shape, data_type))
            }
            ExprKind::Codelist(id) => {
                let items = self
                    .symbols
                    .expand_codelist(id)?
                    .iter()
                    .map(|code| self.script.compose_string_literal(code))
                    .collect();
                Ok(self.script.compose_list(items, DataType::String))
            }
            ExprKind::Parenthesized(inner) => {
                let operand = self.translate(inner)?;
                Ok(self.script.compose_parenthesized(operand))
            }
            ExprKind::Unary { op, operand } => self.translate_unary(*op, operand),
            ExprKind::Binary { op, left, right } => self.translate_binary(*op, left, right),
            ExprKind::Call { name, args } => self.translate_call(name, args),
            ExprKind::In { item, list } => self.translate_containment(item, list),
            ExprKind::Quantified {
                kind,
                variable,
                list,
                body,
            } => self.translate_quantified(*kind, variable, list, body),
            ExprKind::Iteration {
                variable,
                list,
                body,
            } => self.translate_iteration(variable, list, body),
            ExprKind::If {
                condition,
                then_branch,
                else_branch,
            } => self.translate_conditional(condition, then_branch, else_branch),
            ExprKind::NoticeRef { notice, field } => self.translate_notice_ref(notice, field),
            ExprKind::ContextOverride { target, body } => {
                self.translate_context_override(target, body)
            }
        }
    }

    fn translate_literal(&self, lit: &LiteralKind) -> TypedExpression {
        match lit {
            LiteralKind::Number(text) => self.script.compose_number_literal(text),
            LiteralKind::String(text) => self.script.compose_string_literal(text),
            LiteralKind::Boolean(value) => self.script.compose_boolean_literal(*value),
        }
    }

    fn translate_list(&mut self, items: &[Expr]) -> TranslateResult<TypedExpression> {
        let translated = items
            .iter()
            .map(|item| self.translate(item))
            .collect::<TranslateResult<Vec<_>>>()?;
        let mut item_type = translated
            .first()
            .map(TypedExpression::data_type)
            .unwrap_or(DataType::String);
        for item in translated.iter().skip(1) {
            if !item.data_type().comparable_with(item_type) {
                return Err(mismatch("list", item_type, item.data_type()));
            }
            // A mixed multilingual/plain list widens to plain strings.
            if item_type == DataType::MultilingualString && item.data_type() == DataType::String {
                item_type = DataType::String;
            }
        }
        Ok(self.script.compose_list(translated, item_type))
    }

    fn translate_ref(&mut self, reference: &RefExpr) -> TranslateResult<TypedExpression> {
        let context = self
            .context
            .absolute_path()
            .ok_or(TranslateError::MissingContext)?
            .clone();
        let base = match &reference.asset {
            AssetRef::Node(id) => {
                let relative = self.symbols.relative_path_of_node(id, &context)?;
                self.script.compose_path_reference(&relative)
            }
            AssetRef::Field(id) => match self.symbols.attribute_name_of_field(id)? {
                Some(attribute) => {
                    let element = self.symbols.path_of_field_without_attribute(id)?;
                    let relative = contextualize(&context, &element);
                    self.script.compose_attribute_reference(&relative, &attribute)
                }
                None => {
                    let relative = self.symbols.relative_path_of_field(id, &context)?;
                    let data_type = self.symbols.type_of_field(id)?;
                    self.script.compose_field_value_reference(&relative, data_type)
                }
            },
        };
        self.apply_predicates(&reference.asset, base, &reference.predicates)
    }

    /// Like [`translate_ref`](Self::translate_ref) but the field case
    /// yields a plain path reference instead of a typed value reference.
    /// Used for the prefix of a context-override join.
    fn translate_ref_as_path(&mut self, reference: &RefExpr) -> TranslateResult<TypedExpression> {
        let context = self
            .context
            .absolute_path()
            .ok_or(TranslateError::MissingContext)?
            .clone();
        let relative = match &reference.asset {
            AssetRef::Node(id) => self.symbols.relative_path_of_node(id, &context)?,
            AssetRef::Field(id) => self.symbols.relative_path_of_field(id, &context)?,
        };
        let base = self.script.compose_path_reference(&relative);
        self.apply_predicates(&reference.asset, base, &reference.predicates)
    }

    /// Predicates are translated under the referenced symbol's own
    /// context, pushed and popped per predicate.
    fn apply_predicates(
        &mut self,
        asset: &AssetRef,
        mut base: TypedExpression,
        predicates: &[Expr],
    ) -> TranslateResult<TypedExpression> {
        for predicate in predicates {
            self.push_context(asset.id())?;
            let translated = self.translate(predicate);
            self.context.pop();
            let translated = translated?;
            require(
                "predicate",
                &translated,
                Shape::Scalar,
                DataType::Boolean,
            )?;
            base = self.script.compose_predicated_path(base, translated);
        }
        Ok(base)
    }

    fn translate_unary(&mut self, op: UnaryOp, operand: &Expr) -> TranslateResult<TypedExpression> {
        // `not(e)` is the keyword applied to a parenthesized group; the
        // negation composition supplies its own parentheses, so the group
        // is unwrapped rather than doubled.
        let operand = match (&op, &operand.kind) {
            (UnaryOp::Not, ExprKind::Parenthesized(inner)) => self.translate(inner)?,
            _ => self.translate(operand)?,
        };
        match op {
            UnaryOp::Not => {
                require("not", &operand, Shape::Scalar, DataType::Boolean)?;
                Ok(self.script.compose_negation(operand))
            }
            UnaryOp::Minus => {
                require("negation", &operand, Shape::Scalar, DataType::Number)?;
                Ok(self.script.compose_arithmetic_negation(operand))
            }
        }
    }

    fn translate_binary(
        &mut self,
        op: BinaryOp,
        left: &Expr,
        right: &Expr,
    ) -> TranslateResult<TypedExpression> {
        let left = self.translate(left)?;
        let right = self.translate(right)?;
        if op.is_comparison() {
            if !left.data_type().comparable_with(right.data_type()) {
                return Err(mismatch(op_name(op), left.data_type(), right.data_type()));
            }
            Ok(self.script.compose_comparison(op, left, right))
        } else if op.is_logical() {
            require(op_name(op), &left, Shape::Scalar, DataType::Boolean)?;
            require(op_name(op), &right, Shape::Scalar, DataType::Boolean)?;
            Ok(self.script.compose_logical(op, left, right))
        } else {
            match arithmetic_result(op, left.data_type(), right.data_type()) {
                Some(result) => Ok(self.script.compose_arithmetic(op, left, right, result)),
                None => Err(mismatch(op_name(op), left.data_type(), right.data_type())),
            }
        }
    }

    fn translate_call(&mut self, name: &str, args: &[Expr]) -> TranslateResult<TypedExpression> {
        let args = args
            .iter()
            .map(|arg| self.translate(arg))
            .collect::<TranslateResult<Vec<_>>>()?;
        let result = match name {
            "count" => {
                arity(name, &args, 1)?;
                require_shape(name, &args[0], Shape::Sequence)?;
                DataType::Number
            }
            "not" => {
                arity(name, &args, 1)?;
                require(name, &args[0], Shape::Scalar, DataType::Boolean)?;
                DataType::Boolean
            }
            "number" => {
                arity(name, &args, 1)?;
                require(name, &args[0], Shape::Scalar, DataType::String)?;
                DataType::Number
            }
            "string" => {
                arity(name, &args, 1)?;
                require_shape(name, &args[0], Shape::Scalar)?;
                DataType::String
            }
            "sum" => {
                arity(name, &args, 1)?;
                require(name, &args[0], Shape::Sequence, DataType::Number)?;
                DataType::Number
            }
            "concat" => {
                if args.is_empty() {
                    return Err(TranslateError::WrongArgumentCount {
                        function: name.to_string(),
                        expected: "at least 1".to_string(),
                        found: 0,
                    });
                }
                for arg in &args {
                    require(name, arg, Shape::Scalar, DataType::String)?;
                }
                DataType::String
            }
            "contains" | "starts-with" | "ends-with" => {
                arity(name, &args, 2)?;
                require(name, &args[0], Shape::Scalar, DataType::String)?;
                require(name, &args[1], Shape::Scalar, DataType::String)?;
                DataType::Boolean
            }
            "string-length" => {
                arity(name, &args, 1)?;
                require(name, &args[0], Shape::Scalar, DataType::String)?;
                DataType::Number
            }
            "substring" => {
                if args.len() != 2 && args.len() != 3 {
                    return Err(TranslateError::WrongArgumentCount {
                        function: name.to_string(),
                        expected: "2 or 3".to_string(),
                        found: args.len(),
                    });
                }
                require(name, &args[0], Shape::Scalar, DataType::String)?;
                for arg in &args[1..] {
                    require(name, arg, Shape::Scalar, DataType::Number)?;
                }
                DataType::String
            }
            "date" => {
                arity(name, &args, 1)?;
                require(name, &args[0], Shape::Scalar, DataType::String)?;
                DataType::Date
            }
            "time" => {
                arity(name, &args, 1)?;
                require(name, &args[0], Shape::Scalar, DataType::String)?;
                DataType::Time
            }
            "string-join" => {
                arity(name, &args, 2)?;
                require(name, &args[0], Shape::Sequence, DataType::String)?;
                require(name, &args[1], Shape::Scalar, DataType::String)?;
                DataType::String
            }
            _ => return Err(TranslateError::UnknownFunction(name.to_string())),
        };
        Ok(self
            .script
            .compose_function_call(name, args, Shape::Scalar, result))
    }

    fn translate_containment(&mut self, item: &Expr, list: &Expr) -> TranslateResult<TypedExpression> {
        let item = self.translate(item)?;
        let list = self.translate(list)?;
        require_shape("in", &list, Shape::Sequence)?;
        if !item.data_type().comparable_with(list.data_type()) {
            return Err(mismatch("in", item.data_type(), list.data_type()));
        }
        Ok(self.script.compose_containment(item, list))
    }

    fn translate_quantified(
        &mut self,
        kind: QuantifierKind,
        variable: &str,
        list: &Expr,
        body: &Expr,
    ) -> TranslateResult<TypedExpression> {
        let list = self.translate(list)?;
        require_shape("quantified list", &list, Shape::Sequence)?;
        self.bind_variable(variable, Shape::Scalar, list.data_type());
        let body = self.translate(body);
        self.unbind_variables(1);
        let body = body?;
        require("satisfies", &body, Shape::Scalar, DataType::Boolean)?;
        Ok(match kind {
            QuantifierKind::Any => self.script.compose_any_satisfies(variable, list, body),
            QuantifierKind::Every => self.script.compose_every_satisfies(variable, list, body),
        })
    }

    fn translate_iteration(
        &mut self,
        variable: &str,
        list: &Expr,
        body: &Expr,
    ) -> TranslateResult<TypedExpression> {
        let list = self.translate(list)?;
        require_shape("iterated list", &list, Shape::Sequence)?;
        self.bind_variable(variable, Shape::Scalar, list.data_type());
        let body = self.translate(body);
        self.unbind_variables(1);
        let body = body?;
        Ok(self.script.compose_iteration(variable, list, body))
    }

    fn translate_conditional(
        &mut self,
        condition: &Expr,
        then_branch: &Expr,
        else_branch: &Expr,
    ) -> TranslateResult<TypedExpression> {
        let condition = self.translate(condition)?;
        require("if", &condition, Shape::Scalar, DataType::Boolean)?;
        let when_true = self.translate(then_branch)?;
        let when_false = self.translate(else_branch)?;
        if !when_true.data_type().comparable_with(when_false.data_type()) {
            return Err(mismatch(
                "if branches",
                when_true.data_type(),
                when_false.data_type(),
            ));
        }
        Ok(self
            .script
            .compose_conditional(condition, when_true, when_false))
    }

    fn translate_notice_ref(
        &mut self,
        notice: &Expr,
        field: &Option<RefExpr>,
    ) -> TranslateResult<TypedExpression> {
        let notice = self.translate(notice)?;
        require("notice", &notice, Shape::Scalar, DataType::String)?;
        match field {
            Some(reference) => {
                let id = reference.asset.id();
                let path = self.symbols.absolute_path_of_field(id)?;
                let data_type = self.symbols.type_of_field(id)?;
                Ok(self
                    .script
                    .compose_external_field_reference(notice, &path, data_type))
            }
            None => Ok(self.script.compose_notice_reference(notice)),
        }
    }

    fn translate_context_override(
        &mut self,
        target: &RefExpr,
        body: &Expr,
    ) -> TranslateResult<TypedExpression> {
        let prefix = self.translate_ref_as_path(target)?;
        self.push_context(target.asset.id())?;
        let sub = self.translate(body);
        self.context.pop();
        Ok(self.script.join_paths(prefix, sub?))
    }

    fn lookup_variable(&self, name: &str) -> TranslateResult<(Shape, DataType)> {
        self.variables
            .iter()
            .rev()
            .find(|(bound, _, _)| bound == name)
            .map(|(_, shape, data_type)| (*shape, *data_type))
            .ok_or_else(|| TranslateError::UnknownVariable(name.to_string()))
    }
}

/// Parse and translate one expression under a root context symbol.
pub fn translate_expression(
    symbols: &dyn SymbolResolver,
    script: &dyn ScriptComposer,
    context_id: &str,
    source: &str,
) -> TranslateResult<TypedExpression> {
    let expr = parse_expression(source)?;
    let mut translator = ExpressionTranslator::new(symbols, script);
    translator.push_context(context_id)?;
    let result = translator.translate(&expr)?;
    debug_assert_eq!(translator.context().depth(), 1);
    Ok(result)
}

fn op_name(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Eq => "=",
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

/// Result type of an arithmetic production, or `None` when the operand
/// types do not combine.
fn arithmetic_result(op: BinaryOp, left: DataType, right: DataType) -> Option<DataType> {
    use DataType::*;
    match (op, left, right) {
        (_, Number, Number) => Some(Number),
        (BinaryOp::Add | BinaryOp::Sub, Duration, Duration) => Some(Duration),
        (BinaryOp::Add | BinaryOp::Sub, Date, Duration) => Some(Date),
        (BinaryOp::Add | BinaryOp::Sub, Time, Duration) => Some(Time),
        (BinaryOp::Sub, Date, Date) => Some(Duration),
        (BinaryOp::Mul, Duration, Number) | (BinaryOp::Mul, Number, Duration) => Some(Duration),
        _ => None,
    }
}

fn arity(function: &str, args: &[TypedExpression], expected: usize) -> TranslateResult<()> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(TranslateError::WrongArgumentCount {
            function: function.to_string(),
            expected: expected.to_string(),
            found: args.len(),
        })
    }
}

fn mismatch(operation: &str, left: DataType, right: DataType) -> TranslateError {
    TranslateError::TypeMismatch {
        operation: operation.to_string(),
        left: left.to_string(),
        right: right.to_string(),
    }
}

fn require(
    operation: &str,
    operand: &TypedExpression,
    shape: Shape,
    data_type: DataType,
) -> TranslateResult<()> {
    if operand.satisfies(shape, data_type) {
        Ok(())
    } else {
        Err(TranslateError::TypeMismatch {
            operation: operation.to_string(),
            left: format!("{} {}", operand.shape(), operand.data_type()),
            right: format!("{} {}", shape, data_type),
        })
    }
}

fn require_shape(operation: &str, operand: &TypedExpression, shape: Shape) -> TranslateResult<()> {
    if shape.accepts(operand.shape()) {
        Ok(())
    } else {
        Err(TranslateError::TypeMismatch {
            operation: operation.to_string(),
            left: operand.shape().to_string(),
            right: shape.to_string(),
        })
    }
}
