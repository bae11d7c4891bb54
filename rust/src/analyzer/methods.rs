use tree_sitter::Node;

use crate::analyzer::model::MethodRecord;
use crate::analyzer::source::{visit_leaves, visit_nodes, SourceUnit};

pub const DEFAULT_METHOD_KINDS: &[&str] = &["method_declaration"];

/// Nodes whose children split one lexical token into pieces.
const ATOMIC_KINDS: &[&str] = &["string_literal", "character_literal"];

fn is_comment(node: &Node<'_>) -> bool {
    node.kind().ends_with("comment")
}

/// Leaf token texts under `node`, in source order.
///
/// Comments are skipped since they never reach the parser's token stream, and
/// string literals stay whole instead of splitting into quote/fragment leaves.
pub fn flatten_tokens(unit: &SourceUnit, node: Node<'_>) -> Vec<String> {
    let mut tokens = Vec::new();
    visit_leaves(
        node,
        |n| ATOMIC_KINDS.contains(&n.kind()),
        |leaf| {
            if is_comment(&leaf) || leaf.start_byte() == leaf.end_byte() {
                return;
            }
            tokens.push(unit.span_text(leaf).to_string());
        },
    );
    tokens
}

fn method_record(unit: &SourceUnit, node: Node<'_>) -> MethodRecord {
    MethodRecord {
        text: unit.span_text(node).to_string(),
        tokens: flatten_tokens(unit, node),
        start_line: node.start_position().row + 1,
    }
}

fn is_interface_member(node: &Node<'_>) -> bool {
    node.parent().is_some_and(|p| p.kind() == "interface_body")
}

/// One record per declaration node whose kind is in `kinds`, in pre-order.
/// Declarations nested in anonymous or local classes are included; interface
/// members only when `interface_methods` is set.
pub fn extract_methods<S: AsRef<str>>(
    unit: &SourceUnit,
    kinds: &[S],
    interface_methods: bool,
) -> Vec<MethodRecord> {
    let mut methods = Vec::new();
    visit_nodes(unit.root(), |node| {
        if !kinds.iter().any(|k| k.as_ref() == node.kind()) {
            return;
        }
        if !interface_methods && is_interface_member(&node) {
            return;
        }
        methods.push(method_record(unit, node));
    });
    methods
}
