// src/core/records.rs
use crate::error::{Result, TagError};
use crate::models::Record;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Non-standard JSON literals written by some encoders for empty cells.
const NON_FINITE: [&str; 3] = ["-Infinity", "Infinity", "NaN"];

/// Uploaded rows per file: `file_name -> ordered records`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordStore {
    files: BTreeMap<String, Vec<Record>>,
}

impl RecordStore {
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            files: BTreeMap::new(),
        }
    }

    /// Replaces every record of `file`.
    #[inline]
    pub fn insert(&mut self, file: &str, records: Vec<Record>) {
        self.files.insert(file.to_owned(), records);
    }

    #[inline]
    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, file: &str) -> bool {
        self.files.contains_key(file)
    }

    /// # Errors
    ///
    /// Returns [`TagError::UnknownFile`] if no file of that name was imported.
    #[inline]
    pub fn records(&self, file: &str) -> Result<&[Record]> {
        self.files
            .get(file)
            .map(Vec::as_slice)
            .ok_or_else(|| TagError::UnknownFile(file.to_owned()))
    }

    /// # Errors
    ///
    /// Returns [`TagError::UnknownFile`] or [`TagError::QuestionOutOfRange`].
    #[inline]
    pub fn record(&self, file: &str, index: usize) -> Result<&Record> {
        let records = self.records(file)?;
        records.get(index).ok_or_else(|| TagError::QuestionOutOfRange {
            file: file.to_owned(),
            index,
            len: records.len(),
        })
    }

    /// # Errors
    ///
    /// Returns [`TagError::UnknownFile`] or [`TagError::QuestionOutOfRange`].
    #[inline]
    pub fn record_mut(&mut self, file: &str, index: usize) -> Result<&mut Record> {
        let records = self
            .files
            .get_mut(file)
            .ok_or_else(|| TagError::UnknownFile(file.to_owned()))?;
        let len = records.len();
        records
            .get_mut(index)
            .ok_or_else(|| TagError::QuestionOutOfRange {
                file: file.to_owned(),
                index,
                len,
            })
    }
}

/// Decodes a stored records document.
///
/// Bare `NaN` and `Infinity` literals outside strings are read as `null`.
/// The flag is true when such literals were found, so the caller can write
/// the document back in standard JSON.
///
/// # Errors
///
/// Returns an error if the text is not a records document even after the
/// literals are replaced.
pub fn decode_document(content: &str) -> anyhow::Result<(RecordStore, bool)> {
    let repaired = replace_non_finite(content);
    let store = serde_json::from_str(&repaired)?;
    Ok((store, matches!(repaired, Cow::Owned(_))))
}

fn replace_non_finite(content: &str) -> Cow<'_, str> {
    if !NON_FINITE.iter().any(|literal| content.contains(literal)) {
        return Cow::Borrowed(content);
    }

    let mut out = String::with_capacity(content.len());
    let mut rest = content;
    let mut in_string = false;
    let mut escaped = false;
    let mut replaced = false;

    while !rest.is_empty() {
        if !in_string {
            if let Some(after) = NON_FINITE.iter().find_map(|literal| rest.strip_prefix(literal)) {
                out.push_str("null");
                rest = after;
                replaced = true;
                continue;
            }
        }

        let mut chars = rest.chars();
        let Some(c) = chars.next() else { break };
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
        } else if c == '"' {
            in_string = true;
        }
        out.push(c);
        rest = chars.as_str();
    }

    if replaced {
        Cow::Owned(out)
    } else {
        Cow::Borrowed(content)
    }
}
