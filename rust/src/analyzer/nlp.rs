//! Natural-language tokenization of comment text.

use unicode_segmentation::UnicodeSegmentation;

/// Sentence-then-word tokenizer applied to comment text.
pub trait CommentTokenizer: Sync {
    fn sentences<'a>(&self, text: &'a str) -> Vec<&'a str>;

    fn words<'a>(&self, sentence: &'a str) -> Vec<&'a str>;

    /// Words of every sentence, flattened in order.
    fn tokenize(&self, text: &str) -> Vec<String> {
        self.sentences(text)
            .into_iter()
            .flat_map(|s| self.words(s))
            .map(str::to_string)
            .collect()
    }
}

/// UAX #29 sentence and word boundaries. Punctuation is kept as its own token;
/// whitespace segments are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeTokenizer;

impl CommentTokenizer for UnicodeTokenizer {
    fn sentences<'a>(&self, text: &'a str) -> Vec<&'a str> {
        text.split_sentence_bounds()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }

    fn words<'a>(&self, sentence: &'a str) -> Vec<&'a str> {
        sentence
            .split_word_bounds()
            .filter(|w| !w.trim().is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splits_sentences() {
        let s = UnicodeTokenizer.sentences("Returns the sum. Never null.");
        assert_eq!(s, vec!["Returns the sum.", "Never null."]);
    }

    #[test]
    fn test_tokenize_keeps_punctuation() {
        let tokens = UnicodeTokenizer.tokenize("Returns the sum. Never null.");
        assert_eq!(tokens, vec!["Returns", "the", "sum", ".", "Never", "null", "."]);
    }

    #[test]
    fn test_multiline_comment_drops_whitespace() {
        let tokens = UnicodeTokenizer.tokenize("part one\npart two");
        assert_eq!(tokens, vec!["part", "one", "part", "two"]);
    }

    #[test]
    fn test_empty_text_has_no_tokens() {
        assert!(UnicodeTokenizer.tokenize("").is_empty());
        assert!(UnicodeTokenizer.tokenize("   \n ").is_empty());
    }
}
