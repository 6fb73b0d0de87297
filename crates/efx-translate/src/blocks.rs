//! Content-block tree.
//!
//! Template lines reduce to a tree of blocks mirroring their indentation.
//! The tree is an index arena: block 0 is a sentinel root at indentation
//! level -1 with no content, and every real block hangs off it. Blocks are
//! immutable once attached.
//!
//! Rendering is two-pass: first each block's fragment body (its own
//! rendered content followed by a call-site per child), then one named,
//! parameterized fragment definition per block plus the root-level
//! call-sites, assembled by the markup composer into the output file.

use efx_ast::foundation::XPath;

use crate::traits::MarkupComposer;

/// One node of the template fragment tree.
#[derive(Debug, Clone)]
pub struct ContentBlock {
    parent: Option<usize>,
    indent: i32,
    /// Rendered markup of the block's own line
    pub content: String,
    /// The block's context path, relative to its parent block's context
    pub context_path: XPath,
    /// Variables declared on the block's line (context aliases)
    pub own_variables: Vec<String>,
    /// Explicit outline number, when the line carried one
    pub explicit_number: Option<u32>,
    children: Vec<usize>,
}

/// Index arena of content blocks with a sentinel root.
#[derive(Debug)]
pub struct BlockTree {
    blocks: Vec<ContentBlock>,
}

impl BlockTree {
    /// Index of the sentinel root.
    pub const ROOT: usize = 0;

    /// Tree holding only the sentinel root.
    pub fn new() -> Self {
        Self {
            blocks: vec![ContentBlock {
                parent: None,
                indent: -1,
                content: String::new(),
                context_path: XPath::self_path(),
                own_variables: Vec::new(),
                explicit_number: None,
                children: Vec::new(),
            }],
        }
    }

    /// Attach a new block under `parent` and return its index.
    pub fn add_child(
        &mut self,
        parent: usize,
        content: String,
        context_path: XPath,
        own_variables: Vec<String>,
        explicit_number: Option<u32>,
    ) -> usize {
        let indent = self.blocks[parent].indent + 1;
        let id = self.blocks.len();
        self.blocks.push(ContentBlock {
            parent: Some(parent),
            indent,
            content,
            context_path,
            own_variables,
            explicit_number,
            children: Vec::new(),
        });
        self.blocks[parent].children.push(id);
        id
    }

    /// Parent of a block; `None` for the root.
    pub fn parent(&self, id: usize) -> Option<usize> {
        self.blocks[id].parent
    }

    /// Indentation level of a block; -1 for the root.
    pub fn indent(&self, id: usize) -> i32 {
        self.blocks[id].indent
    }

    /// Children of a block, in attachment order.
    pub fn children(&self, id: usize) -> &[usize] {
        &self.blocks[id].children
    }

    /// Fragment name derived from 1-based sibling positions along the
    /// path from the root, two digits per level (`block01`, `block0102`).
    pub fn fragment_name(&self, mut id: usize) -> String {
        let mut positions = Vec::new();
        while let Some(parent) = self.blocks[id].parent {
            let position = self.blocks[parent]
                .children
                .iter()
                .position(|&child| child == id)
                .expect("block is linked from its parent")
                + 1;
            positions.push(position);
            id = parent;
        }
        positions.reverse();
        let mut name = String::from("block");
        for position in positions {
            name.push_str(&format!("{:02}", position));
        }
        name
    }

    /// Fragment parameters: the ordered union of all ancestor-declared
    /// and own-declared variable names, outermost first.
    pub fn parameters(&self, id: usize) -> Vec<String> {
        let mut chain = Vec::new();
        let mut current = Some(id);
        while let Some(block) = current {
            chain.push(block);
            current = self.blocks[block].parent;
        }
        chain.reverse();
        chain
            .into_iter()
            .flat_map(|block| self.blocks[block].own_variables.iter().cloned())
            .collect()
    }

    /// Hierarchical outline numbers, one string per block.
    ///
    /// Sibling numbers auto-increment from the previous sibling's number;
    /// an explicit number resets the counter. An explicit 0 suppresses the
    /// block's own number string when none of its children carries one.
    pub fn outline_numbers(&self) -> Vec<String> {
        let mut outlines = vec![String::new(); self.blocks.len()];
        self.assign_outlines(Self::ROOT, "", &mut outlines);
        outlines
    }

    fn assign_outlines(&self, id: usize, prefix: &str, outlines: &mut Vec<String>) {
        let mut counter = 0u32;
        for &child in &self.blocks[id].children {
            let number = match self.blocks[child].explicit_number {
                Some(explicit) => {
                    counter = explicit;
                    explicit
                }
                None => {
                    counter += 1;
                    counter
                }
            };
            let own = if prefix.is_empty() {
                number.to_string()
            } else {
                format!("{}.{}", prefix, number)
            };
            self.assign_outlines(child, &own, outlines);
            let suppressed = self.blocks[child].explicit_number == Some(0)
                && self.blocks[child]
                    .children
                    .iter()
                    .all(|&grandchild| outlines[grandchild].is_empty());
            outlines[child] = if suppressed { String::new() } else { own };
        }
    }

    /// Render the whole tree into one output file.
    pub fn render(&self, markup: &dyn MarkupComposer) -> String {
        let outlines = self.outline_numbers();
        let mut fragments = Vec::new();
        self.collect_fragments(Self::ROOT, &outlines, markup, &mut fragments);
        let call_sites: Vec<String> = self.blocks[Self::ROOT]
            .children
            .iter()
            .map(|&child| self.invocation(child, markup))
            .collect();
        markup.compose_output_file(&call_sites, &fragments)
    }

    fn invocation(&self, id: usize, markup: &dyn MarkupComposer) -> String {
        markup.render_fragment_invocation(
            &self.fragment_name(id),
            &self.blocks[id].context_path,
            &self.parameters(id),
        )
    }

    fn collect_fragments(
        &self,
        id: usize,
        outlines: &[String],
        markup: &dyn MarkupComposer,
        fragments: &mut Vec<String>,
    ) {
        for &child in &self.blocks[id].children {
            let mut body = self.blocks[child].content.clone();
            for &grandchild in &self.blocks[child].children {
                body.push_str(&self.invocation(grandchild, markup));
            }
            fragments.push(markup.compose_fragment_definition(
                &self.fragment_name(child),
                &outlines[child],
                &body,
                &self.parameters(child),
            ));
            self.collect_fragments(child, outlines, markup, fragments);
        }
    }
}

impl Default for BlockTree {
    fn default() -> Self {
        Self::new()
    }
}
