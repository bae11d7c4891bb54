//! Pairing of comment blocks with the methods they document.
//!
//! Both inputs must be sorted by line. A comment documents a method only when
//! it ends on the line directly above the method's first line. Anything else
//! is dropped without error.

use std::cmp::Ordering;

use crate::analyzer::model::{CommentBlock, DatasetRow, MethodRecord};
use crate::analyzer::nlp::CommentTokenizer;

/// Index pairs `(comment, method)` chosen by the merge, plus the number of
/// loop iterations it took.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Alignment {
    pub pairs: Vec<(usize, usize)>,
    pub steps: usize,
}

/// Two-pointer merge on `comment.stop_line + 1` against `method.start_line`.
///
/// Every iteration advances at least one pointer, so `steps` never exceeds
/// `comments.len() + methods.len()`.
pub fn pair_by_adjacency(comments: &[CommentBlock], methods: &[MethodRecord]) -> Alignment {
    debug_assert!(comments.windows(2).all(|w| w[0].start_line <= w[1].start_line));
    debug_assert!(methods.windows(2).all(|w| w[0].start_line <= w[1].start_line));

    let mut alignment = Alignment::default();
    let (mut c, mut m) = (0, 0);
    while c < comments.len() && m < methods.len() {
        alignment.steps += 1;
        match (comments[c].stop_line + 1).cmp(&methods[m].start_line) {
            Ordering::Less => c += 1,
            Ordering::Greater => m += 1,
            Ordering::Equal => {
                alignment.pairs.push((c, m));
                c += 1;
                m += 1;
            }
        }
    }
    alignment
}

/// Build dataset rows for every adjacent (comment, method) pair.
pub fn align(
    comments: &[CommentBlock],
    methods: &[MethodRecord],
    tokenizer: &dyn CommentTokenizer,
) -> Vec<DatasetRow> {
    pair_by_adjacency(comments, methods)
        .pairs
        .into_iter()
        .map(|(c, m)| {
            let comment = &comments[c];
            let method = &methods[m];
            DatasetRow {
                method_text: method.text.clone(),
                method_tokens: method.tokens.clone(),
                comment_text: comment.text.clone(),
                comment_tokens: tokenizer.tokenize(&comment.text),
            }
        })
        .collect()
}
