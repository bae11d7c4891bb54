use tree_sitter::Node;

use crate::analyzer::model::{Token, TokenKind};
use crate::analyzer::source::{visit_leaves, SourceUnit};

/// tree-sitter-java names its comment leaves `line_comment` / `block_comment`;
/// older grammars used a single `comment` kind, so classification goes by text.
fn classify(node: &Node<'_>, text: &str) -> TokenKind {
    if !node.kind().ends_with("comment") {
        return TokenKind::Other;
    }
    if text.starts_with("//") {
        TokenKind::LineComment
    } else if text.starts_with("/*") {
        TokenKind::BlockComment
    } else {
        TokenKind::Other
    }
}

/// Flatten the parsed unit into its lexical token stream, terminated by a
/// single `EndOfStream` token.
pub fn tokenize(unit: &SourceUnit) -> Vec<Token> {
    let mut tokens = Vec::new();
    visit_leaves(
        unit.root(),
        |_| false,
        |node| {
            // Zero-width leaves are parser-inserted MISSING nodes, not source text.
            if node.start_byte() == node.end_byte() {
                return;
            }
            let text = unit.span_text(node);
            let kind = classify(&node, text);
            tokens.push(Token::new(kind, text, node.start_position().row + 1));
        },
    );
    let last_line = unit.text().matches('\n').count() + 1;
    tokens.push(Token::new(TokenKind::EndOfStream, "", last_line));
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
        tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_empty_source_yields_only_end_of_stream() {
        let unit = SourceUnit::parse("Empty.java", "").unwrap();
        let tokens = tokenize(&unit);
        assert_eq!(kinds(&tokens), vec![TokenKind::EndOfStream]);
    }

    #[test]
    fn test_comment_tokens_are_classified_with_lines() {
        let src = "// header\nclass A {\n  /* block\n     body */\n  int x;\n}\n";
        let unit = SourceUnit::parse("A.java", src).unwrap();
        let tokens = tokenize(&unit);

        let comments: Vec<&Token> = tokens.iter().filter(|t| t.kind.is_comment()).collect();
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].kind, TokenKind::LineComment);
        assert_eq!(comments[0].text, "// header");
        assert_eq!(comments[0].line, 1);
        assert_eq!(comments[1].kind, TokenKind::BlockComment);
        assert_eq!(comments[1].text, "/* block\n     body */");
        assert_eq!(comments[1].line, 3);
    }

    #[test]
    fn test_stream_ends_with_single_end_marker() {
        let unit = SourceUnit::parse("A.java", "class A { }").unwrap();
        let tokens = tokenize(&unit);
        assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::EndOfStream));
        assert_eq!(
            tokens.iter().filter(|t| t.kind == TokenKind::EndOfStream).count(),
            1
        );
        assert!(tokens[..tokens.len() - 1].iter().all(|t| t.kind == TokenKind::Other));
    }

    #[test]
    fn test_comment_markers_inside_strings_are_not_comments() {
        let src = "class A {\n  String s = \"// not a comment\";\n}\n";
        let unit = SourceUnit::parse("A.java", src).unwrap();
        let tokens = tokenize(&unit);
        assert!(tokens.iter().all(|t| !t.kind.is_comment()));
    }
}
