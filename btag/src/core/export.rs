// src/core/export.rs
use crate::error::Result;
use crate::models::Record;

/// Writes export rows as CSV with a `question,entities,tags` header.
///
/// # Errors
///
/// Returns [`crate::error::TagError::Csv`] if a row cannot be written.
pub fn write_csv(rows: &[Record]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["question", "entities", "tags"])?;
    for row in rows {
        writer.write_record([
            row.question.as_str(),
            row.entities.as_str(),
            row.tags.as_deref().unwrap_or_default(),
        ])?;
    }
    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()).into())
}
