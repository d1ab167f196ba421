// src/core/generator.rs
use crate::error::{Result, TagError};
use crate::models::Tag;
use serde::{Deserialize, Serialize};

/// What to do when one word is tagged under several entities at export time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverlapPolicy {
    /// The last entity in list order wins.
    #[default]
    LastWins,
    /// Refuse to export the question.
    Strict,
}

/// Serializes a question's tags into the exported `tags` column.
///
/// Every word yields one token, `O` or `{B|I}-{entity}`, joined by spaces.
/// A word can only carry one label; when several entities tag it,
/// `policy` decides.
///
/// # Errors
///
/// Returns [`TagError::OverlappingTags`] under [`OverlapPolicy::Strict`]
/// when a word is `B` or `I` for more than one entity.
pub fn generate_tags<F>(
    question: &str,
    tokens: &[&str],
    entities: &[String],
    lookup: F,
    policy: OverlapPolicy,
) -> Result<String>
where
    F: Fn(usize, &str) -> Tag,
{
    let mut labels = Vec::with_capacity(tokens.len());

    for position in 0..tokens.len() {
        let tagged: Vec<(&str, Tag)> = entities
            .iter()
            .map(|entity| (entity.as_str(), lookup(position, entity.as_str())))
            .filter(|(_, tag)| tag.is_entity())
            .collect();

        if policy == OverlapPolicy::Strict && tagged.len() > 1 {
            return Err(TagError::OverlappingTags {
                question: question.to_owned(),
                position,
                entities: tagged.iter().map(|(entity, _)| (*entity).to_owned()).collect(),
            });
        }

        let label = tagged
            .last()
            .map_or_else(|| String::from("O"), |(entity, tag)| tag.label(entity));
        labels.push(label);
    }

    Ok(labels.join(" "))
}
