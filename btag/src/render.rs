// src/render.rs
use crate::models::{Span, Tag};
use std::fmt::Write as _;
use std::ops::Range;

/// Lays a question out on one line with each span underlined beneath it.
///
/// Overlapping spans each get their own line, in start order:
///
/// ```text
/// Bank of America branch
/// ^^^^^^^^^^^^^^^ ORG
///         ^^^^^^^ LOCATION
/// ```
#[must_use]
pub fn render_spans(tokens: &[&str], spans: &[Span]) -> String {
    let mut columns = Vec::with_capacity(tokens.len());
    let mut column: usize = 0;
    for token in tokens {
        columns.push(column);
        column = column.saturating_add(token.chars().count()).saturating_add(1);
    }

    let mut out = tokens.join(" ");
    for span in spans {
        let last = span.end().saturating_sub(1);
        let (Some(&from), Some(&to), Some(last_token)) =
            (columns.get(span.start), columns.get(last), tokens.get(last))
        else {
            continue;
        };
        let width = to
            .saturating_add(last_token.chars().count())
            .saturating_sub(from);
        let _ = write!(
            out,
            "\n{:from$}{} {}",
            "",
            "^".repeat(width),
            span.entity
        );
    }
    out
}

/// A word-by-entity grid of the current tags, one row per word.
#[must_use]
pub fn render_matrix<F>(tokens: &[&str], entities: &[String], lookup: F) -> String
where
    F: Fn(usize, &str) -> Tag,
{
    let word_width = tokens
        .iter()
        .map(|token| token.chars().count())
        .chain(std::iter::once(4))
        .max()
        .unwrap_or(4);
    let index_width = tokens.len().to_string().len().max(1);

    let mut out = format!("{:>index_width$}  {:<word_width$}", "#", "word");
    for entity in entities {
        let _ = write!(out, "  {entity}");
    }

    for (position, token) in tokens.iter().enumerate() {
        let _ = write!(out, "\n{position:>index_width$}  {token:<word_width$}");
        for entity in entities {
            let cell_width = entity.chars().count();
            let tag = lookup(position, entity.as_str());
            let _ = write!(out, "  {:<cell_width$}", tag.as_str());
        }
    }
    out
}

/// Which questions fall on a 1-based page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub number: usize,
    pub count: usize,
    pub range: Range<usize>,
}

impl Page {
    /// Clamps `number` into `1..=count`; an empty file has one empty page.
    #[must_use]
    pub fn new(total: usize, page_size: usize, number: usize) -> Self {
        let page_size = page_size.max(1);
        let count = total.div_ceil(page_size).max(1);
        let number = number.clamp(1, count);
        let start = number.saturating_sub(1).saturating_mul(page_size).min(total);
        let end = start.saturating_add(page_size).min(total);
        Self {
            number,
            count,
            range: start..end,
        }
    }

    /// `Questions 51-100`, as shown in the page list.
    #[must_use]
    pub fn label(&self) -> String {
        if self.range.is_empty() {
            return String::from("No questions");
        }
        format!("Questions {}-{}", self.range.start.saturating_add(1), self.range.end)
    }
}
