// src/core/store.rs
use crate::models::Tag;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub mod legacy;

pub type EntityTags = BTreeMap<String, Tag>;
pub type QuestionTags = BTreeMap<usize, EntityTags>;
pub type FileTags = BTreeMap<String, QuestionTags>;

/// Current on-disk layout of the tag store document.
pub const DOCUMENT_VERSION: u32 = 2;

/// Per-cell BIO state: `file -> question -> word position -> entity -> tag`.
///
/// Any cell without a record reads as [`Tag::O`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagStore {
    files: BTreeMap<String, FileTags>,
}

/// Serialized form, tagged with a version so word-keyed documents can be told apart.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TagDocument {
    pub version: u32,
    pub files: TagStore,
}

/// Borrowed [`TagDocument`] for saving without a copy.
#[derive(Debug, Serialize)]
pub struct TagDocumentRef<'a> {
    pub version: u32,
    pub files: &'a TagStore,
}

impl TagStore {
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            files: BTreeMap::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn get(&self, file: &str, question: &str, position: usize, entity: &str) -> Tag {
        self.files
            .get(file)
            .and_then(|questions| questions.get(question))
            .and_then(|words| words.get(&position))
            .and_then(|entities| entities.get(entity))
            .copied()
            .unwrap_or_default()
    }

    /// Records `tag` for one cell, creating the intermediate maps as needed.
    #[inline]
    pub fn set(&mut self, file: &str, question: &str, position: usize, entity: &str, tag: Tag) {
        self.files
            .entry(file.to_owned())
            .or_default()
            .entry(question.to_owned())
            .or_default()
            .entry(position)
            .or_default()
            .insert(entity.to_owned(), tag);
    }

    /// Deletes `entity` from every word recorded under `(file, question)`.
    ///
    /// Returns how many cells were removed; a second call returns 0.
    #[inline]
    pub fn remove_entity(&mut self, file: &str, question: &str, entity: &str) -> usize {
        let Some(words) = self.question_mut(file, question) else {
            return 0;
        };
        words
            .values_mut()
            .filter_map(|entities| entities.remove(entity))
            .count()
    }

    /// Moves every `old` cell of a question to `new`, keeping its tag.
    ///
    /// Returns how many cells were moved.
    #[inline]
    pub fn rename_entity(&mut self, file: &str, question: &str, old: &str, new: &str) -> usize {
        if old == new {
            return 0;
        }
        let Some(words) = self.question_mut(file, question) else {
            return 0;
        };

        let mut moved: usize = 0;
        for entities in words.values_mut() {
            if let Some(tag) = entities.remove(old) {
                entities.insert(new.to_owned(), tag);
                moved = moved.saturating_add(1);
            }
        }
        moved
    }

    /// Drops every entity of a question that is not in `keep`.
    #[inline]
    pub fn retain_entities(&mut self, file: &str, question: &str, keep: &[String]) -> usize {
        let Some(words) = self.question_mut(file, question) else {
            return 0;
        };

        let mut removed: usize = 0;
        for entities in words.values_mut() {
            let before = entities.len();
            entities.retain(|entity, _| keep.iter().any(|k| k == entity));
            removed = removed.saturating_add(before.saturating_sub(entities.len()));
        }
        removed
    }

    /// A read-only lookup over one question's cells.
    #[inline]
    #[must_use]
    pub fn question(&self, file: &str, question: &str) -> QuestionView<'_> {
        QuestionView {
            words: self
                .files
                .get(file)
                .and_then(|questions| questions.get(question)),
        }
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    #[inline]
    #[must_use]
    pub const fn as_document(&self) -> TagDocumentRef<'_> {
        TagDocumentRef {
            version: DOCUMENT_VERSION,
            files: self,
        }
    }

    fn question_mut(&mut self, file: &str, question: &str) -> Option<&mut QuestionTags> {
        self.files
            .get_mut(file)
            .and_then(|questions| questions.get_mut(question))
    }

    pub(crate) fn insert_question(&mut self, file: &str, question: &str, words: QuestionTags) {
        self.files
            .entry(file.to_owned())
            .or_default()
            .insert(question.to_owned(), words);
    }
}

/// Borrowed cells of a single question.
#[derive(Debug, Clone, Copy)]
pub struct QuestionView<'a> {
    words: Option<&'a QuestionTags>,
}

impl QuestionView<'_> {
    #[inline]
    #[must_use]
    pub fn get(&self, position: usize, entity: &str) -> Tag {
        self.words
            .and_then(|words| words.get(&position))
            .and_then(|entities| entities.get(entity))
            .copied()
            .unwrap_or_default()
    }

    /// Every entity name recorded for this question, in sorted order.
    #[inline]
    #[must_use]
    pub fn recorded_entities(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .words
            .into_iter()
            .flat_map(BTreeMap::values)
            .flat_map(BTreeMap::keys)
            .map(String::as_str)
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }
}
