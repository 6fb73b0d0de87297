//! Translation context stack.
//!
//! Every path reference is rendered relative to the current context. The
//! stack starts empty; the caller pushes a root frame before translating
//! and the translator pushes and pops frames around predicates and
//! context overrides. A balanced translation leaves the stack exactly as
//! it found it.

use efx_ast::foundation::{contextualize, XPath};
use efx_symbols::SymbolError;

use crate::traits::SymbolResolver;

/// What kind of symbol a context frame is anchored on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextKind {
    /// Anchored on a field; predicates inside field references use this
    Field,
    /// Anchored on a node
    Node,
}

/// One context frame.
#[derive(Debug, Clone)]
pub struct Context {
    kind: ContextKind,
    symbol_id: String,
    absolute: XPath,
    relative: XPath,
}

impl Context {
    /// The symbol this frame is anchored on.
    pub fn symbol_id(&self) -> &str {
        &self.symbol_id
    }

    /// Frame kind.
    pub fn kind(&self) -> ContextKind {
        self.kind
    }

    /// Absolute location of the frame.
    pub fn absolute(&self) -> &XPath {
        &self.absolute
    }

    /// Location relative to the frame below, or the absolute location for
    /// the bottom frame.
    pub fn relative(&self) -> &XPath {
        &self.relative
    }
}

/// Stack of context frames.
///
/// Pops on an empty stack panic: the translator's push/pop pairing is an
/// internal invariant, not a user-facing error condition.
#[derive(Debug, Default)]
pub struct ContextStack {
    frames: Vec<Context>,
}

impl ContextStack {
    /// Empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a frame anchored on a field.
    pub fn push_field(
        &mut self,
        symbols: &dyn SymbolResolver,
        field_id: &str,
    ) -> Result<(), SymbolError> {
        let absolute = symbols.absolute_path_of_field(field_id)?;
        self.push_frame(ContextKind::Field, field_id, absolute);
        Ok(())
    }

    /// Push a frame anchored on a node.
    pub fn push_node(
        &mut self,
        symbols: &dyn SymbolResolver,
        node_id: &str,
    ) -> Result<(), SymbolError> {
        let absolute = symbols.absolute_path_of_node(node_id)?;
        self.push_frame(ContextKind::Node, node_id, absolute);
        Ok(())
    }

    fn push_frame(&mut self, kind: ContextKind, symbol_id: &str, absolute: XPath) {
        let relative = match self.frames.last() {
            Some(top) => contextualize(&top.absolute, &absolute),
            None => absolute.clone(),
        };
        self.frames.push(Context {
            kind,
            symbol_id: symbol_id.to_string(),
            absolute,
            relative,
        });
    }

    /// Pop the top frame.
    ///
    /// # Panics
    ///
    /// Panics when the stack is empty; push/pop pairing is an invariant of
    /// the translator.
    pub fn pop(&mut self) -> Context {
        self.frames
            .pop()
            .expect("context stack underflow: unbalanced push/pop")
    }

    /// The current frame, if any.
    pub fn top(&self) -> Option<&Context> {
        self.frames.last()
    }

    /// Absolute path of the current frame.
    pub fn absolute_path(&self) -> Option<&XPath> {
        self.top().map(Context::absolute)
    }

    /// Whether the current frame is anchored on a field.
    pub fn is_field_context(&self) -> bool {
        self.top().is_some_and(|c| c.kind == ContextKind::Field)
    }

    /// Number of frames.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Whether the stack holds no frames.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use efx_symbols::{SdkMetadata, SymbolRepository};

    fn repo() -> SymbolRepository {
        let metadata: SdkMetadata = serde_json::from_str(
            r#"{
                "sdkVersion": "1.0",
                "fields": [
                    {
                        "id": "BT-00-Code",
                        "parentNodeId": "ND-Business",
                        "xpathAbsolute": "/*/PathNode/CodeField",
                        "type": "code",
                        "codeList": { "value": { "id": "currencies" } }
                    }
                ],
                "xmlStructure": [
                    { "id": "ND-Root", "xpathAbsolute": "/*" },
                    { "id": "ND-Business", "parentId": "ND-Root", "xpathAbsolute": "/*/PathNode" }
                ],
                "codelists": [
                    { "id": "currencies", "values": ["EUR"] }
                ]
            }"#,
        )
        .unwrap();
        SymbolRepository::from_metadata(metadata).unwrap()
    }

    #[test]
    fn test_first_frame_is_absolute() {
        let repo = repo();
        let mut stack = ContextStack::new();
        stack.push_node(&repo, "ND-Business").unwrap();
        let top = stack.top().unwrap();
        assert_eq!(top.absolute().to_string(), "/*/PathNode");
        assert_eq!(top.relative().to_string(), "/*/PathNode");
    }

    #[test]
    fn test_nested_frame_is_relative_to_previous_top() {
        let repo = repo();
        let mut stack = ContextStack::new();
        stack.push_node(&repo, "ND-Business").unwrap();
        stack.push_field(&repo, "BT-00-Code").unwrap();
        let top = stack.top().unwrap();
        assert_eq!(top.relative().to_string(), "CodeField");
        assert!(stack.is_field_context());

        stack.pop();
        assert!(!stack.is_field_context());
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_unknown_symbol_is_an_error_not_a_frame() {
        let repo = repo();
        let mut stack = ContextStack::new();
        assert!(stack.push_node(&repo, "ND-Missing").is_err());
        assert!(stack.is_empty());
    }

    #[test]
    #[should_panic(expected = "context stack underflow")]
    fn test_pop_on_empty_stack_panics() {
        ContextStack::new().pop();
    }
}
