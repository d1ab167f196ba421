// src/models/tag.rs
use crate::error::TagError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A BIO tag for one (word, entity) cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Tag {
    #[default]
    O,
    B,
    I,
}

impl Tag {
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::O => "O",
            Self::B => "B",
            Self::I => "I",
        }
    }

    /// `B` or `I`.
    #[inline]
    #[must_use]
    pub const fn is_entity(self) -> bool {
        matches!(self, Self::B | Self::I)
    }

    /// The exported form of this tag for `entity`: `O`, `B-ENTITY` or `I-ENTITY`.
    #[inline]
    #[must_use]
    pub fn label(self, entity: &str) -> String {
        match self {
            Self::O => String::from("O"),
            Self::B | Self::I => format!("{}-{entity}", self.as_str()),
        }
    }

    /// Reads a tag leniently, mapping anything unrecognised to `O`.
    ///
    /// Used for data coming from files where a bad value must not block loading.
    #[inline]
    #[must_use]
    pub fn parse_lenient(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tag {
    type Err = TagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "O" | "o" => Ok(Self::O),
            "B" | "b" => Ok(Self::B),
            "I" | "i" => Ok(Self::I),
            other => Err(TagError::InvalidTag(other.to_owned())),
        }
    }
}

/// Splits one token of an exported `tags` column.
///
/// `B-X` and `I-X` yield the tag and entity `X`. Everything else,
/// including plain `O`, a bare `B` or an unknown prefix, reads as `O`
/// with no entity.
#[inline]
#[must_use]
pub fn parse_bio_token(token: &str) -> (Tag, Option<&str>) {
    let split = token
        .strip_prefix("B-")
        .map(|entity| (Tag::B, entity))
        .or_else(|| token.strip_prefix("I-").map(|entity| (Tag::I, entity)));

    match split {
        Some((tag, entity)) if !entity.is_empty() => (tag, Some(entity)),
        _ => (Tag::O, None),
    }
}
