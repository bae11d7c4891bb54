//! Comment aggregation.
//!
//! Comment tokens are folded into [`CommentBlock`]s in a single forward scan.
//! A comment that starts on the line right after the previous comment ended
//! extends the pending block; any line gap closes it. Adjacency is decided by
//! line numbers alone: `previous.stop_line + 1 == next.start_line`.

use crate::analyzer::model::{CommentBlock, Token, TokenKind};
use crate::analyzer::util::count_newlines;
use crate::error::{CorpusError, Result};

/// Turn one comment token into a single-comment block, stripping its markers.
///
/// Returns `None` for non-comment tokens.
pub fn candidate_from_token(token: &Token) -> Option<CommentBlock> {
    let (body, stop_line) = match token.kind {
        TokenKind::BlockComment => {
            let body = token
                .text
                .strip_prefix("/*")
                .and_then(|t| t.strip_suffix("*/"))
                .unwrap_or(&token.text);
            (body, token.line + count_newlines(&token.text))
        }
        TokenKind::LineComment => {
            let body = token.text.strip_prefix("//").unwrap_or(&token.text);
            (body, token.line)
        }
        TokenKind::Other | TokenKind::EndOfStream => return None,
    };
    Some(CommentBlock {
        text: body.trim().to_string(),
        start_line: token.line,
        stop_line,
    })
}

#[derive(Debug, Default)]
enum AggregatorState {
    #[default]
    NoPendingBlock,
    PendingBlock(CommentBlock),
}

/// Two-state machine that merges line-adjacent comments.
///
/// The pending block's `stop_line` is always the stop line of the last comment
/// fed in, so it doubles as the "previous comment" span for the adjacency test.
#[derive(Debug, Default)]
pub struct CommentAggregator {
    state: AggregatorState,
    blocks: Vec<CommentBlock>,
}

impl CommentAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one candidate block, in source order.
    pub fn push(&mut self, candidate: CommentBlock) -> Result<()> {
        if candidate.stop_line < candidate.start_line {
            return Err(CorpusError::Invariant {
                start_line: candidate.start_line,
                stop_line: candidate.stop_line,
            });
        }
        self.state = match std::mem::take(&mut self.state) {
            AggregatorState::NoPendingBlock => AggregatorState::PendingBlock(candidate),
            AggregatorState::PendingBlock(mut pending) => {
                if pending.stop_line + 1 == candidate.start_line {
                    pending.text.push('\n');
                    pending.text.push_str(&candidate.text);
                    pending.stop_line = candidate.stop_line;
                    AggregatorState::PendingBlock(pending)
                } else {
                    self.blocks.push(pending);
                    AggregatorState::PendingBlock(candidate)
                }
            }
        };
        Ok(())
    }

    /// Feed any token; non-comment tokens leave the state untouched.
    pub fn feed(&mut self, token: &Token) -> Result<()> {
        match candidate_from_token(token) {
            Some(candidate) => self.push(candidate),
            None => Ok(()),
        }
    }

    /// Flush the pending block, if any, and return every block in order.
    pub fn finish(mut self) -> Vec<CommentBlock> {
        if let AggregatorState::PendingBlock(pending) = self.state {
            self.blocks.push(pending);
        }
        self.blocks
    }
}

/// Aggregate the comments of one file's token stream. Scanning stops at the
/// first `EndOfStream` token.
pub fn aggregate_comments(tokens: &[Token]) -> Result<Vec<CommentBlock>> {
    let mut aggregator = CommentAggregator::new();
    for token in tokens.iter().take_while(|t| t.kind != TokenKind::EndOfStream) {
        aggregator.feed(token)?;
    }
    Ok(aggregator.finish())
}
