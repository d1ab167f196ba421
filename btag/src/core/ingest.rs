// src/core/ingest.rs
use crate::core::entities::{
    dedup_entities, is_valid_entity_name, join_entities, normalize_delimiter, parse_entities,
};
use crate::core::store::TagStore;
use crate::core::tokenizer::tokenize;
use crate::error::{Result, TagError};
use crate::models::{Record, Tag, parse_bio_token};
use std::io::Read;

/// The entity list delimiters used while reading a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delimiters {
    pub canonical: char,
    pub legacy: char,
}

impl Default for Delimiters {
    fn default() -> Self {
        Self {
            canonical: ',',
            legacy: '|',
        }
    }
}

/// Reads question rows from CSV.
///
/// The `question` and `entities` columns are required; `tags` is optional.
/// Header names are matched after trimming, and a leading byte order mark is
/// ignored. Entity lists written with the legacy delimiter are converted,
/// and a name listed twice is kept once.
///
/// # Errors
///
/// Returns [`TagError::MissingColumn`] if a required column is absent and
/// [`TagError::Csv`] if the data cannot be read as CSV.
pub fn read_records<R: Read>(reader: R, delimiters: Delimiters) -> Result<Vec<Record>> {
    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|header| header.trim_start_matches('\u{feff}').trim() == name)
    };
    let question_column = column("question").ok_or(TagError::MissingColumn {
        column: "question",
    })?;
    let entities_column = column("entities").ok_or(TagError::MissingColumn {
        column: "entities",
    })?;
    let tags_column = column("tags");

    let mut records = Vec::new();
    for row in csv_reader.records() {
        let row = row?;
        let field = |index: usize| row.get(index).unwrap_or_default();

        let mut entities = normalize_delimiter(
            field(entities_column),
            delimiters.canonical,
            delimiters.legacy,
        )
        .into_owned();
        let names = parse_entities(&entities, delimiters.canonical);
        let listed = names.len();
        let unique = dedup_entities(names);
        if unique.len() < listed {
            tracing::warn!(entities = %entities, "dropping repeated entity names");
            entities = join_entities(&unique, delimiters.canonical);
        }
        let tags = tags_column
            .map(field)
            .map(str::trim)
            .filter(|tags| !tags.is_empty())
            .map(str::to_owned);

        records.push(Record {
            question: field(question_column).to_owned(),
            entities,
            tags,
        });
    }

    tracing::debug!(rows = records.len(), "read question rows");
    Ok(records)
}

/// Seeds the tag store from a record's existing `tags` column.
///
/// `B-X` and `I-X` set that tag for entity `X` at the word's position. Any
/// other token, a token naming an unusable entity (whitespace or the
/// delimiter in `X`), and any word past the end of the tag list set `O` for
/// every listed entity. A tagged entity missing from the record's entity
/// list is appended to it so the tag survives export.
///
/// Returns the number of tag tokens that were read.
pub fn seed_tags(store: &mut TagStore, file: &str, record: &mut Record, delimiter: char) -> usize {
    let Some(tags) = record.tags.clone() else {
        return 0;
    };

    let question = record.question.clone();
    let words = tokenize(&question);
    let mut entities = parse_entities(&record.entities, delimiter);
    let tokens: Vec<&str> = tags.split_whitespace().collect();

    if tokens.len() > words.len() {
        tracing::warn!(
            file,
            question = %question,
            words = words.len(),
            tags = tokens.len(),
            "ignoring tags past the last word"
        );
    }

    let mut appended = false;
    for position in 0..words.len() {
        match tokens.get(position).map(|token| parse_bio_token(token)) {
            Some((tag, Some(entity))) if is_valid_entity_name(entity, delimiter) => {
                if !entities.iter().any(|known| known == entity) {
                    tracing::warn!(file, entity, "tag names an unlisted entity, adding it");
                    entities.push(entity.to_owned());
                    appended = true;
                }
                store.set(file, &question, position, entity, tag);
            }
            other => {
                if let Some((_, Some(entity))) = other {
                    tracing::warn!(
                        file,
                        entity,
                        position,
                        "invalid entity name in tag, reading as O"
                    );
                } else if let Some(token) = tokens.get(position).filter(|token| **token != "O") {
                    tracing::debug!(file, token, position, "treating unknown tag as O");
                }
                for entity in &entities {
                    store.set(file, &question, position, entity, Tag::O);
                }
            }
        }
    }

    if appended {
        record.entities = join_entities(&entities, delimiter);
    }
    tokens.len().min(words.len())
}
