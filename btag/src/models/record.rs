// src/models/record.rs
use serde::{Deserialize, Deserializer, Serialize};

/// One row of an input or output CSV file.
///
/// Stored rows written by older versions may hold `null` or numbers where
/// an empty cell was; those read as empty text.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Record {
    #[serde(default, deserialize_with = "lenient_text")]
    pub question: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub entities: String,
    #[serde(default, deserialize_with = "lenient_tags")]
    pub tags: Option<String>,
}

/// A stored cell value of any JSON scalar type.
#[derive(Deserialize)]
#[serde(untagged)]
enum Cell {
    Text(String),
    Number(f64),
    Flag(bool),
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Option::<Cell>::deserialize(deserializer)? {
        Some(Cell::Text(text)) => text,
        Some(Cell::Number(number)) => number.to_string(),
        Some(Cell::Flag(flag)) => flag.to_string(),
        None => String::new(),
    })
}

fn lenient_tags<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Option::<Cell>::deserialize(deserializer)? {
        Some(Cell::Text(text)) if !text.trim().is_empty() => Some(text),
        Some(_) | None => None,
    })
}

impl Record {
    #[inline]
    #[must_use]
    pub fn new(question: impl Into<String>, entities: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            entities: entities.into(),
            tags: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = Some(tags.into());
        self
    }
}
