//! Template translation.
//!
//! Drives the expression translator over parsed template lines, enforcing
//! the indentation contract, maintaining the block stack in step with the
//! context stack, and assembling the content-block tree that the markup
//! composer renders into the output file.
//!
//! Indentation contract: the first indented line fixes tab or space style
//! and, for spaces, the unit width. A line may go at most one level deeper
//! than the previous one; going shallower pops blocks (and their context
//! frames and aliases) back to the matching level.

use efx_ast::expr::AssetRef;
use efx_ast::foundation::{contextualize, DataType, Shape, XPath};
use efx_ast::template::{ContentPart, TemplateLine};
use efx_parser::parse_template;
use indexmap::IndexMap;
use tracing::debug;

use crate::blocks::BlockTree;
use crate::context::ContextStack;
use crate::error::{TranslateError, TranslateResult};
use crate::expression::ExpressionTranslator;
use crate::label::{resolve_label, ResolvedLabel};
use crate::traits::{MarkupComposer, ScriptComposer, SymbolResolver};

#[derive(Debug, Clone, Copy)]
enum IndentStyle {
    Tabs,
    Spaces { unit: usize },
}

struct OpenBlock {
    block: usize,
    pushed_context: bool,
    /// Alias declared on this block, with the binding it shadowed.
    alias: Option<(String, Option<String>)>,
}

/// Translates a template into one rendered output file.
pub struct TemplateTranslator<'a> {
    expressions: ExpressionTranslator<'a>,
    markup: &'a dyn MarkupComposer,
    tree: BlockTree,
    stack: Vec<OpenBlock>,
    indent: Option<IndentStyle>,
    aliases: IndexMap<String, String>,
}

impl<'a> TemplateTranslator<'a> {
    pub fn new(
        symbols: &'a dyn SymbolResolver,
        script: &'a dyn ScriptComposer,
        markup: &'a dyn MarkupComposer,
    ) -> Self {
        Self {
            expressions: ExpressionTranslator::new(symbols, script),
            markup,
            tree: BlockTree::new(),
            stack: Vec::new(),
            indent: None,
            aliases: IndexMap::new(),
        }
    }

    /// Translate parsed template lines into the rendered output file.
    pub fn translate(mut self, lines: &[TemplateLine]) -> TranslateResult<String> {
        for line in lines {
            self.add_line(line)?;
        }
        while !self.stack.is_empty() {
            self.pop_block();
        }
        debug_assert!(self.expressions.context().is_empty());
        debug!(blocks = self.tree.children(BlockTree::ROOT).len(), "template reduced");
        Ok(self.tree.render(self.markup))
    }

    fn add_line(&mut self, line: &TemplateLine) -> TranslateResult<()> {
        let level = self.measure_indent(&line.leading)?;
        let current = self.stack.len() as i32 - 1;
        let diff = level as i32 - current;
        if diff > 1 {
            if current < 0 {
                return Err(TranslateError::StartIndentNonzero);
            }
            return Err(TranslateError::SkippedIndentationLevel {
                from: current as usize,
                to: level,
            });
        }
        while self.stack.len() > level {
            self.pop_block();
        }
        let parent = self
            .stack
            .last()
            .map(|open| open.block)
            .unwrap_or(BlockTree::ROOT);

        let (context_path, pushed_context, alias, own_variables) = self.enter_context(line)?;
        let content = self.translate_content(&line.content)?;

        let block = self
            .tree
            .add_child(parent, content, context_path, own_variables, line.number);
        self.stack.push(OpenBlock {
            block,
            pushed_context,
            alias,
        });
        Ok(())
    }

    /// Push the line's declared context, if any, and bind its alias.
    ///
    /// Returns the context path relative to the enclosing block's context,
    /// whether a frame was pushed, the alias record for later restoration,
    /// and the block's own parameter names.
    #[allow(clippy::type_complexity)]
    fn enter_context(
        &mut self,
        line: &TemplateLine,
    ) -> TranslateResult<(XPath, bool, Option<(String, Option<String>)>, Vec<String>)> {
        let Some(declaration) = &line.context else {
            return Ok((XPath::self_path(), false, None, Vec::new()));
        };
        let symbol_id = declaration.reference.asset.id();
        let absolute = match &declaration.reference.asset {
            AssetRef::Field(id) => self.expressions.symbols().absolute_path_of_field(id)?,
            AssetRef::Node(id) => self.expressions.symbols().absolute_path_of_node(id)?,
        };
        let relative = match self.expressions.context().absolute_path() {
            Some(enclosing) => contextualize(enclosing, &absolute),
            None => absolute,
        };
        self.expressions.push_context(symbol_id)?;

        let mut alias = None;
        let mut own_variables = Vec::new();
        if let Some(name) = &declaration.alias {
            let data_type = match &declaration.reference.asset {
                AssetRef::Field(id) => self.expressions.symbols().type_of_field(id)?,
                AssetRef::Node(_) => DataType::Node,
            };
            self.expressions.bind_variable(name, Shape::Path, data_type);
            let shadowed = self.aliases.insert(name.clone(), symbol_id.to_string());
            alias = Some((name.clone(), shadowed));
            own_variables.push(name.clone());
        }
        Ok((relative, true, alias, own_variables))
    }

    fn translate_content(&mut self, parts: &[ContentPart]) -> TranslateResult<String> {
        let mut rendered = String::new();
        for part in parts {
            match part {
                ContentPart::Text(text) => rendered.push_str(&self.markup.render_free_text(text)),
                ContentPart::Label(label) => {
                    let aliases = &self.aliases;
                    let resolved = resolve_label(&mut self.expressions, label, &|name| {
                        aliases.get(name).cloned()
                    })?;
                    rendered.push_str(&match resolved {
                        ResolvedLabel::Key(key) => self.markup.render_label_from_key(&key),
                        ResolvedLabel::Indirect(expr) => {
                            self.markup.render_label_from_expression(&expr)
                        }
                    });
                }
                ContentPart::Value(expr) => {
                    let value = self.expressions.translate(expr)?;
                    rendered.push_str(&self.markup.render_value_reference(&value));
                }
            }
        }
        Ok(rendered)
    }

    fn pop_block(&mut self) {
        let open = self
            .stack
            .pop()
            .expect("block stack underflow: unbalanced push/pop");
        if let Some((name, shadowed)) = open.alias {
            self.expressions.unbind_variables(1);
            match shadowed {
                Some(previous) => {
                    self.aliases.insert(name, previous);
                }
                None => {
                    self.aliases.shift_remove(&name);
                }
            }
        }
        if open.pushed_context {
            self.expressions.pop_context();
        }
    }

    fn measure_indent(&mut self, leading: &str) -> TranslateResult<usize> {
        if leading.is_empty() {
            return Ok(0);
        }
        let has_tab = leading.contains('\t');
        let has_space = leading.contains(' ');
        if has_tab && has_space {
            return Err(TranslateError::MixedIndentation);
        }
        match (self.indent, has_tab) {
            (None, true) => {
                self.indent = Some(IndentStyle::Tabs);
                Ok(leading.len())
            }
            (None, false) => {
                self.indent = Some(IndentStyle::Spaces {
                    unit: leading.len(),
                });
                Ok(1)
            }
            (Some(IndentStyle::Tabs), true) => Ok(leading.len()),
            (Some(IndentStyle::Spaces { unit }), false) => {
                if leading.len() % unit != 0 {
                    Err(TranslateError::InconsistentIndentationSpacing {
                        unit,
                        found: leading.len(),
                    })
                } else {
                    Ok(leading.len() / unit)
                }
            }
            _ => Err(TranslateError::MixedIndentation),
        }
    }

    /// Current context stack, exposed for assertions.
    pub fn context(&self) -> &ContextStack {
        self.expressions.context()
    }
}

/// Parse and translate a whole template document.
pub fn translate_template(
    symbols: &dyn SymbolResolver,
    script: &dyn ScriptComposer,
    markup: &dyn MarkupComposer,
    source: &str,
) -> TranslateResult<String> {
    let lines = parse_template(source)?;
    TemplateTranslator::new(symbols, script, markup).translate(&lines)
}
