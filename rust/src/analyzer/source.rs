//! One parsed Java compilation unit.
//!
//! The decoded text and its tree-sitter tree travel together so that both the
//! token classifier and the method extractor can slice exact byte spans out of
//! the same string the parser saw.

use tree_sitter::{Language, Node, Parser, Tree};

use crate::error::{CorpusError, Result};

pub fn java_language() -> Language {
    tree_sitter_java::LANGUAGE.into()
}

/// Build a parser configured for Java.
pub fn new_parser() -> Result<Parser> {
    let mut parser = Parser::new();
    parser
        .set_language(&java_language())
        .map_err(|e| CorpusError::Grammar(e.to_string()))?;
    Ok(parser)
}

/// Decode raw file bytes, replacing invalid UTF-8 sequences instead of failing.
pub fn decode_lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

pub struct SourceUnit {
    label: String,
    text: String,
    tree: Tree,
}

impl SourceUnit {
    /// Parse `text`; `label` names the file in errors and logs.
    pub fn parse(label: impl Into<String>, text: impl Into<String>) -> Result<Self> {
        let label = label.into();
        let text = text.into();
        let mut parser = new_parser()?;
        let tree = parser
            .parse(&text, None)
            .ok_or_else(|| CorpusError::Parse { path: label.clone() })?;
        Ok(Self { label, text, tree })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// True when the error-recovering parser had to insert ERROR or MISSING nodes.
    pub fn has_syntax_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }

    /// Exact source slice covered by `node`.
    pub fn span_text(&self, node: Node<'_>) -> &str {
        self.text.get(node.byte_range()).unwrap_or_default()
    }
}

/// Depth-first, left-to-right walk over the leaves under `node`.
///
/// Nodes for which `atomic` returns true are reported as leaves without
/// descending into them. Uses the tree cursor instead of recursion, so deep
/// nesting cannot exhaust the call stack.
pub fn visit_leaves<'t>(
    node: Node<'t>,
    atomic: impl Fn(&Node<'t>) -> bool,
    mut visit: impl FnMut(Node<'t>),
) {
    let mut cursor = node.walk();
    'walk: loop {
        let current = cursor.node();
        let is_leaf = current.child_count() == 0 || atomic(&current);
        if is_leaf {
            visit(current);
        } else if cursor.goto_first_child() {
            continue;
        }
        while !cursor.goto_next_sibling() {
            if !cursor.goto_parent() {
                break 'walk;
            }
        }
    }
}

/// Pre-order walk over every node under `node`, including `node` itself.
pub fn visit_nodes<'t>(node: Node<'t>, mut visit: impl FnMut(Node<'t>)) {
    let mut cursor = node.walk();
    'walk: loop {
        visit(cursor.node());
        if cursor.goto_first_child() {
            continue;
        }
        while !cursor.goto_next_sibling() {
            if !cursor.goto_parent() {
                break 'walk;
            }
        }
    }
}
