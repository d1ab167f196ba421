// src/models/span.rs
use crate::models::Tag;
use serde::Serialize;

/// A maximal run of words tagged `B` then `I*` for one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start: usize,
    pub entity: String,
    pub words: Vec<String>,
}

impl Span {
    #[inline]
    #[must_use]
    pub fn new(start: usize, entity: &str, word: &str) -> Self {
        Self {
            start,
            entity: entity.to_owned(),
            words: vec![word.to_owned()],
        }
    }

    /// One past the last word position covered by the span.
    #[inline]
    #[must_use]
    pub const fn end(&self) -> usize {
        self.start.saturating_add(self.words.len())
    }

    /// The per-word tags this span stands for: `B` at `start`, `I` after it.
    pub fn cells(&self) -> impl Iterator<Item = (usize, Tag)> + '_ {
        (self.start..self.end()).map(|position| {
            let tag = if position == self.start { Tag::B } else { Tag::I };
            (position, tag)
        })
    }
}
