//! Collaborator contracts consumed by the translators.
//!
//! Three seams, all synchronous:
//!
//! - [`SymbolResolver`] — schema lookups; implemented by
//!   [`SymbolRepository`](efx_symbols::SymbolRepository)
//! - [`ScriptComposer`] — one method per expression composition; returns
//!   target-language [`TypedExpression`]s and must be deterministic and
//!   free of side effects on its inputs
//! - [`MarkupComposer`] — template output: free text, labels, value
//!   references, fragment definitions and invocations
//!
//! Implementations are expected to be read-only after construction so a
//! single instance can serve concurrently running translator instances.

use efx_ast::expr::BinaryOp;
use efx_ast::foundation::{contextualize, DataType, Shape, TypedExpression, XPath};
use efx_symbols::{FieldType, SymbolError, SymbolRepository};

/// Schema symbol lookups.
pub trait SymbolResolver {
    /// Absolute location of a field's value.
    fn absolute_path_of_field(&self, id: &str) -> Result<XPath, SymbolError>;
    /// Absolute location of a node.
    fn absolute_path_of_node(&self, id: &str) -> Result<XPath, SymbolError>;
    /// Data type of a field's value.
    fn type_of_field(&self, id: &str) -> Result<DataType, SymbolError>;
    /// Declared metadata-level type of a field.
    fn field_type_of_field(&self, id: &str) -> Result<FieldType, SymbolError>;
    /// Identifier of the node a field belongs to.
    fn parent_node_of_field(&self, id: &str) -> Result<String, SymbolError>;
    /// Root of the codelist chain attached to a field.
    fn root_codelist_of_field(&self, id: &str) -> Result<String, SymbolError>;
    /// Codes of a codelist, in declared order.
    fn expand_codelist(&self, id: &str) -> Result<Vec<String>, SymbolError>;
    /// Whether a field's location ends in an attribute step.
    fn is_attribute_field(&self, id: &str) -> Result<bool, SymbolError>;
    /// Name of a field's trailing attribute, when it has one.
    fn attribute_name_of_field(&self, id: &str) -> Result<Option<String>, SymbolError>;
    /// A field's location with its trailing attribute step removed.
    fn path_of_field_without_attribute(&self, id: &str) -> Result<XPath, SymbolError>;
    /// The field declared at an absolute location, if any.
    fn field_id_for_absolute_path(&self, path: &XPath) -> Result<String, SymbolError>;

    /// A field's location relative to a context path.
    fn relative_path_of_field(&self, id: &str, context: &XPath) -> Result<XPath, SymbolError> {
        Ok(contextualize(context, &self.absolute_path_of_field(id)?))
    }

    /// A node's location relative to a context path.
    fn relative_path_of_node(&self, id: &str, context: &XPath) -> Result<XPath, SymbolError> {
        Ok(contextualize(context, &self.absolute_path_of_node(id)?))
    }

    /// An arbitrary absolute path relative to a context path.
    fn relative_path(&self, absolute: &XPath, context: &XPath) -> XPath {
        contextualize(context, absolute)
    }
}

impl SymbolResolver for SymbolRepository {
    fn absolute_path_of_field(&self, id: &str) -> Result<XPath, SymbolError> {
        SymbolRepository::absolute_path_of_field(self, id)
    }

    fn absolute_path_of_node(&self, id: &str) -> Result<XPath, SymbolError> {
        SymbolRepository::absolute_path_of_node(self, id)
    }

    fn type_of_field(&self, id: &str) -> Result<DataType, SymbolError> {
        SymbolRepository::type_of_field(self, id)
    }

    fn field_type_of_field(&self, id: &str) -> Result<FieldType, SymbolError> {
        SymbolRepository::field_type_of_field(self, id)
    }

    fn parent_node_of_field(&self, id: &str) -> Result<String, SymbolError> {
        SymbolRepository::parent_node_of_field(self, id).map(str::to_string)
    }

    fn root_codelist_of_field(&self, id: &str) -> Result<String, SymbolError> {
        SymbolRepository::root_codelist_of_field(self, id).map(str::to_string)
    }

    fn expand_codelist(&self, id: &str) -> Result<Vec<String>, SymbolError> {
        SymbolRepository::expand_codelist(self, id).map(<[String]>::to_vec)
    }

    fn is_attribute_field(&self, id: &str) -> Result<bool, SymbolError> {
        SymbolRepository::is_attribute_field(self, id)
    }

    fn attribute_name_of_field(&self, id: &str) -> Result<Option<String>, SymbolError> {
        SymbolRepository::attribute_name_of_field(self, id).map(|n| n.map(str::to_string))
    }

    fn path_of_field_without_attribute(&self, id: &str) -> Result<XPath, SymbolError> {
        SymbolRepository::path_of_field_without_attribute(self, id)
    }

    fn field_id_for_absolute_path(&self, path: &XPath) -> Result<String, SymbolError> {
        SymbolRepository::field_id_for_absolute_path(self, path).map(str::to_string)
    }
}

/// Target-language code emission, one method per composition.
///
/// Operands arrive already typed; the composer builds new script text
/// around them and tags the result. It never inspects operand scripts
/// beyond embedding them.
pub trait ScriptComposer {
    /// Numeric literal, source spelling preserved.
    fn compose_number_literal(&self, text: &str) -> TypedExpression;
    /// String literal from unquoted text.
    fn compose_string_literal(&self, text: &str) -> TypedExpression;
    /// Boolean literal.
    fn compose_boolean_literal(&self, value: bool) -> TypedExpression;

    /// Plain path reference, used for node references and for the prefix
    /// of a context-override join.
    fn compose_path_reference(&self, path: &XPath) -> TypedExpression;
    /// Typed reference to a field's value.
    fn compose_field_value_reference(&self, path: &XPath, data_type: DataType) -> TypedExpression;
    /// Reference to a field attribute.
    fn compose_attribute_reference(&self, path: &XPath, attribute: &str) -> TypedExpression;
    /// Rooted symbolic reference to a field, for absolute-path atoms.
    fn compose_symbol_reference(&self, field_id: &str, data_type: DataType) -> TypedExpression;
    /// A path expression with a boolean predicate applied.
    fn compose_predicated_path(
        &self,
        path: TypedExpression,
        predicate: TypedExpression,
    ) -> TypedExpression;
    /// Re-join a sub-expression translated under an overridden context
    /// onto the override target's path as seen from the restored context.
    /// The prefix is a path expression, possibly predicated.
    fn join_paths(&self, prefix: TypedExpression, sub: TypedExpression) -> TypedExpression;

    /// Comparison; result is boolean.
    fn compose_comparison(
        &self,
        op: BinaryOp,
        left: TypedExpression,
        right: TypedExpression,
    ) -> TypedExpression;
    /// Logical `and`/`or`.
    fn compose_logical(
        &self,
        op: BinaryOp,
        left: TypedExpression,
        right: TypedExpression,
    ) -> TypedExpression;
    /// Numeric or duration arithmetic; the translator supplies the result type.
    fn compose_arithmetic(
        &self,
        op: BinaryOp,
        left: TypedExpression,
        right: TypedExpression,
        result: DataType,
    ) -> TypedExpression;
    /// Logical negation.
    fn compose_negation(&self, operand: TypedExpression) -> TypedExpression;
    /// Arithmetic negation.
    fn compose_arithmetic_negation(&self, operand: TypedExpression) -> TypedExpression;
    /// Explicit grouping.
    fn compose_parenthesized(&self, operand: TypedExpression) -> TypedExpression;

    /// Sequence from explicit items, in declared order.
    fn compose_list(&self, items: Vec<TypedExpression>, item_type: DataType) -> TypedExpression;
    /// Containment of an item in a list.
    fn compose_containment(&self, item: TypedExpression, list: TypedExpression)
        -> TypedExpression;
    /// Existential quantification; the bound variable's surface text is
    /// carried verbatim.
    fn compose_any_satisfies(
        &self,
        variable: &str,
        list: TypedExpression,
        body: TypedExpression,
    ) -> TypedExpression;
    /// Universal quantification.
    fn compose_every_satisfies(
        &self,
        variable: &str,
        list: TypedExpression,
        body: TypedExpression,
    ) -> TypedExpression;
    /// Mapped sequence `for $x in L return E`.
    fn compose_iteration(
        &self,
        variable: &str,
        list: TypedExpression,
        body: TypedExpression,
    ) -> TypedExpression;
    /// Reference to a bound variable.
    fn compose_variable_reference(
        &self,
        name: &str,
        shape: Shape,
        data_type: DataType,
    ) -> TypedExpression;
    /// Conditional; the result type follows the branches.
    fn compose_conditional(
        &self,
        condition: TypedExpression,
        when_true: TypedExpression,
        when_false: TypedExpression,
    ) -> TypedExpression;
    /// Built-in function call; the translator supplies the result tags.
    fn compose_function_call(
        &self,
        name: &str,
        args: Vec<TypedExpression>,
        shape: Shape,
        result: DataType,
    ) -> TypedExpression;
    /// String concatenation, used for indirect label expressions.
    fn compose_string_concatenation(&self, parts: Vec<TypedExpression>) -> TypedExpression;
    /// Reference to a field in another notice.
    fn compose_external_field_reference(
        &self,
        notice: TypedExpression,
        field_path: &XPath,
        data_type: DataType,
    ) -> TypedExpression;
    /// Reference to another notice as a whole.
    fn compose_notice_reference(&self, notice: TypedExpression) -> TypedExpression;
}

/// Template markup emission.
pub trait MarkupComposer {
    /// Free template text, escaped as the target requires.
    fn render_free_text(&self, text: &str) -> String;
    /// Label looked up by a literal key.
    fn render_label_from_key(&self, key: &str) -> String;
    /// Label looked up by a computed key expression.
    fn render_label_from_expression(&self, expression: &TypedExpression) -> String;
    /// Inlined field value.
    fn render_value_reference(&self, value: &TypedExpression) -> String;
    /// One named, parameterized fragment.
    fn compose_fragment_definition(
        &self,
        name: &str,
        outline_number: &str,
        body: &str,
        parameters: &[String],
    ) -> String;
    /// Call-site for a fragment, switching to its context path.
    fn render_fragment_invocation(
        &self,
        name: &str,
        context_path: &XPath,
        parameters: &[String],
    ) -> String;
    /// The final output file from top-level call-sites and all fragments.
    fn compose_output_file(&self, call_sites: &[String], fragments: &[String]) -> String;
}
