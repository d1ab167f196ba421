// src/core/entities.rs
use std::borrow::Cow;

/// Splits a delimiter-separated entity string into trimmed, non-empty names.
///
/// Order is preserved and duplicates are kept.
#[inline]
#[must_use]
pub fn parse_entities(entities: &str, delimiter: char) -> Vec<String> {
    entities
        .split(delimiter)
        .map(str::trim)
        .filter(|entity| !entity.is_empty())
        .map(str::to_owned)
        .collect()
}

#[inline]
#[must_use]
pub fn join_entities(entities: &[String], delimiter: char) -> String {
    let mut separator = [0_u8; 4];
    entities.join(&*delimiter.encode_utf8(&mut separator))
}

/// Drops repeated names, keeping the first occurrence of each.
#[must_use]
pub fn dedup_entities(entities: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(entities.len());
    for entity in entities {
        if !unique.contains(&entity) {
            unique.push(entity);
        }
    }
    unique
}

/// Rewrites an entity string written with the legacy delimiter.
///
/// The string is only converted when it has no canonical delimiter at all
/// but does contain the legacy one.
#[inline]
#[must_use]
pub fn normalize_delimiter(entities: &str, delimiter: char, legacy: char) -> Cow<'_, str> {
    if !entities.contains(delimiter) && entities.contains(legacy) {
        let mut separator = [0_u8; 4];
        Cow::Owned(entities.replace(legacy, delimiter.encode_utf8(&mut separator)))
    } else {
        Cow::Borrowed(entities)
    }
}

/// Whether `name` can be used as an entity: non-empty, no whitespace, no delimiter.
///
/// Whitespace would split an exported `B-NAME` token in two.
#[inline]
#[must_use]
pub fn is_valid_entity_name(name: &str, delimiter: char) -> bool {
    !name.is_empty() && !name.contains(delimiter) && !name.chars().any(char::is_whitespace)
}
