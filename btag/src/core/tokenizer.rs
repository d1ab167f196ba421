// src/core/tokenizer.rs

/// Splits a question into its words on runs of whitespace.
///
/// A word's index in the returned vector is its position in the tag store.
/// No case or punctuation normalisation is applied.
#[inline]
#[must_use]
pub fn tokenize(question: &str) -> Vec<&str> {
    question.split_whitespace().collect()
}
