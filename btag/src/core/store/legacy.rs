// src/core/store/legacy.rs
use crate::core::store::{DOCUMENT_VERSION, QuestionTags, TagDocument, TagStore};
use crate::core::tokenizer::tokenize;
use crate::models::Tag;
use anyhow::{Result, bail};
use serde_json::Value;
use std::collections::BTreeMap;

/// Tag store layout written by earlier versions: words are keyed by their text.
pub type LegacyDocument =
    BTreeMap<String, BTreeMap<String, BTreeMap<String, BTreeMap<String, String>>>>;

/// Which layout a tag store document was decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Versioned,
    WordKeyed,
}

/// Decodes a tag store document in either layout.
///
/// # Errors
///
/// Returns an error if the text is not JSON, does not match either layout,
/// or carries an unsupported version number.
pub fn decode(content: &str) -> Result<(TagStore, DocumentFormat)> {
    let value: Value = serde_json::from_str(content)?;

    if value.get("version").is_some_and(Value::is_number) {
        let document: TagDocument = serde_json::from_value(value)?;
        if document.version != DOCUMENT_VERSION {
            bail!("unsupported tag store version {}", document.version);
        }
        return Ok((document.files, DocumentFormat::Versioned));
    }

    let legacy: LegacyDocument = serde_json::from_value(value)?;
    Ok((from_word_keyed(legacy), DocumentFormat::WordKeyed))
}

/// Converts a word-keyed document to the position-keyed store.
///
/// Each question is re-tokenized and every occurrence of a word receives
/// that word's recorded tags. Words that no longer occur in the question
/// are dropped. Unrecognised tag values read as `O`.
#[must_use]
pub fn from_word_keyed(legacy: LegacyDocument) -> TagStore {
    let mut store = TagStore::new();

    for (file, questions) in legacy {
        for (question, words) in questions {
            let mut positions = QuestionTags::new();
            for (position, word) in tokenize(&question).into_iter().enumerate() {
                if let Some(entities) = words.get(word) {
                    let tags = entities
                        .iter()
                        .map(|(entity, tag)| (entity.clone(), Tag::parse_lenient(tag)))
                        .collect();
                    positions.insert(position, tags);
                }
            }
            store.insert_question(&file, &question, positions);
        }
    }

    store
}
