// src/models.rs
pub mod record;
pub mod span;
pub mod tag;
pub mod tagging_stats;

pub use record::Record;
pub use span::Span;
pub use tag::{Tag, parse_bio_token};
pub use tagging_stats::TaggingStats;
