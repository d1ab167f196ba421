// src/error.rs
use thiserror::Error;

/// Failures raised by the tagging core.
///
/// File system problems are reported through `anyhow` at the call site;
/// this enum only covers conditions the core itself can detect.
#[derive(Debug, Error)]
pub enum TagError {
    #[error("missing required column `{column}`")]
    MissingColumn { column: &'static str },

    #[error("unknown file `{0}`")]
    UnknownFile(String),

    #[error("file `{file}` has no question {index} (it has {len})")]
    QuestionOutOfRange {
        file: String,
        index: usize,
        len: usize,
    },

    #[error("word position {position} is out of range for a question of {len} words")]
    PositionOutOfRange { position: usize, len: usize },

    #[error("entity `{0}` is not in the question's entity list")]
    UnknownEntity(String),

    #[error("entity `{0}` already exists for this question")]
    DuplicateEntity(String),

    #[error("invalid entity name `{0}`: names must be non-empty without whitespace or delimiters")]
    InvalidEntityName(String),

    #[error("invalid tag `{0}`, expected one of O, B, I")]
    InvalidTag(String),

    #[error(
        "word {position} of \"{question}\" is tagged under several entities: {}",
        entities.join(", ")
    )]
    OverlappingTags {
        question: String,
        position: usize,
        entities: Vec<String>,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

pub type Result<T, E = TagError> = std::result::Result<T, E>;
