// src/core/spans.rs
use crate::models::{Span, Tag};

/// Derives the tagged spans of a question for display.
///
/// Each entity is scanned on its own, so spans of different entities may
/// overlap. A `B` opens a span (closing any open one), an `I` extends the
/// open span, an `O` closes it. An `I` with no open span is dropped.
///
/// The result is ordered by start position; spans starting at the same
/// word keep the order of `entities`.
///
/// # Arguments
///
/// * `tokens` - The question's words
/// * `entities` - The question's entity list
/// * `lookup` - Returns the stored tag for a (position, entity) cell
#[must_use]
pub fn reconstruct_spans<F>(tokens: &[&str], entities: &[String], lookup: F) -> Vec<Span>
where
    F: Fn(usize, &str) -> Tag,
{
    let mut spans = Vec::new();

    for entity in entities {
        let mut open: Option<Span> = None;

        for (position, word) in tokens.iter().enumerate() {
            match lookup(position, entity.as_str()) {
                Tag::B => {
                    spans.extend(open.take());
                    open = Some(Span::new(position, entity, word));
                }
                Tag::I => {
                    if let Some(span) = open.as_mut() {
                        span.words.push((*word).to_owned());
                    }
                }
                Tag::O => spans.extend(open.take()),
            }
        }

        spans.extend(open);
    }

    spans.sort_by_key(|span| span.start);
    spans
}
