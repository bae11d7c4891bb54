use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    BlockComment,
    LineComment,
    Other,
    EndOfStream,
}

impl TokenKind {
    pub fn is_comment(self) -> bool {
        matches!(self, TokenKind::BlockComment | TokenKind::LineComment)
    }
}

/// One classified lexical unit. `line` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize) -> Self {
        Self { kind, text: text.into(), line }
    }
}

/// Contiguous comment lines merged into one logical comment.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CommentBlock {
    pub text: String,
    pub start_line: usize,
    pub stop_line: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MethodRecord {
    /// Exact source span of the declaration, modifiers through closing brace.
    pub text: String,
    pub tokens: Vec<String>,
    pub start_line: usize,
}

/// A (method, comment) pair that passed the adjacency test.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DatasetRow {
    pub method_text: String,
    pub method_tokens: Vec<String>,
    pub comment_text: String,
    pub comment_tokens: Vec<String>,
}
