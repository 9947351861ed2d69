use crate::engine::align::{WordToken, segment_words, token_start};

/// The text being practised. Immutable; replaced wholesale.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TargetText {
    text: String,
    chars: Vec<char>,
}

impl TargetText {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let chars = text.chars().collect();
        Self { text, chars }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn tokens(&self) -> Vec<WordToken<'_>> {
        segment_words(&self.text)
    }

    /// Char offset where word token `index` starts. `None` for whitespace
    /// tokens and out-of-range indices.
    pub fn word_start(&self, index: usize) -> Option<usize> {
        let tokens = self.tokens();
        let token = tokens.get(index)?;
        if token.is_whitespace {
            return None;
        }
        Some(token_start(&tokens, index))
    }

    /// The first `end` chars.
    pub fn prefix(&self, end: usize) -> String {
        self.chars[..end.min(self.chars.len())].iter().collect()
    }
}
