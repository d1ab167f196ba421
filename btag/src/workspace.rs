// src/workspace.rs
use crate::config::Config;
use crate::core::entities::parse_entities;
use crate::core::export::write_csv;
use crate::core::generator::{OverlapPolicy, generate_tags};
use crate::core::ingest::{Delimiters, read_records, seed_tags};
use crate::core::propagate::Propagator;
use crate::core::records::{self, RecordStore};
use crate::core::spans::reconstruct_spans;
use crate::core::store::{TagStore, legacy};
use crate::core::tokenizer::tokenize;
use crate::error::{self, TagError};
use crate::models::{Record, Span, Tag, TaggingStats};
use crate::persist::{self, LoadOutcome};
use anyhow::{Context as _, Result};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// What an import did to the workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub file: String,
    pub questions: usize,
    /// Rows that carried a `tags` column value
    pub pretagged: usize,
    /// True when an earlier import of the same file name was replaced
    pub replaced: bool,
}

/// The annotation session: every record, every tag cell and the settings
/// they were loaded with.
///
/// Each mutating call writes both documents back before returning, so a
/// following read (in this process or the next) sees the change.
#[derive(Debug)]
pub struct Workspace {
    config: Config,
    records: RecordStore,
    tags: TagStore,
    warnings: Vec<String>,
}

impl Workspace {
    /// Loads the records and tag documents from `config.data_dir`.
    ///
    /// Missing, blank or malformed documents load as empty; recoveries are
    /// listed in [`Workspace::warnings`]. A word-keyed tag document from an
    /// older version is converted and saved in the current layout, as is a
    /// records document holding `NaN` for empty cells.
    ///
    /// # Errors
    ///
    /// This function may return an error if a document exists but cannot be
    /// read, or if a converted tag document cannot be written back.
    pub fn open(config: Config) -> Result<Self> {
        let mut repaired = false;
        let (records, records_outcome) =
            persist::load_or_default(&config.records_path(), |content| {
                let (store, had_literals) = records::decode_document(content)?;
                repaired = had_literals;
                Ok(store)
            })?;

        let mut converted = false;
        let (tags, tags_outcome) = persist::load_or_default(&config.tags_path(), |content| {
            let (store, format) = legacy::decode(content)?;
            converted = format == legacy::DocumentFormat::WordKeyed;
            Ok(store)
        })?;

        let warnings = [records_outcome, tags_outcome]
            .iter()
            .filter_map(LoadOutcome::warning)
            .map(str::to_owned)
            .collect();

        let workspace = Self {
            config,
            records,
            tags,
            warnings,
        };

        if repaired {
            tracing::info!(
                path = %workspace.config.records_path().display(),
                "rewriting records document without NaN literals"
            );
            workspace.save_records()?;
        }
        if converted {
            tracing::info!(
                path = %workspace.config.tags_path().display(),
                "converting word-keyed tag document to position keys"
            );
            workspace.save_tags()?;
        }

        Ok(workspace)
    }

    #[inline]
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Problems found while loading, already recovered from.
    #[inline]
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Writes both documents.
    ///
    /// # Errors
    ///
    /// This function may return an error if either document cannot be written.
    pub fn save(&self) -> Result<()> {
        self.save_records()?;
        self.save_tags()
    }

    fn save_records(&self) -> Result<()> {
        persist::save_json(&self.config.records_path(), &self.records)
            .context("Failed to save uploaded records")
    }

    fn save_tags(&self) -> Result<()> {
        persist::save_json(&self.config.tags_path(), &self.tags.as_document())
            .context("Failed to save tagging data")
    }

    const fn delimiters(&self) -> Delimiters {
        Delimiters {
            canonical: self.config.delimiter,
            legacy: self.config.legacy_delimiter,
        }
    }

    /// Imports CSV rows under `file_name`, replacing any earlier import of it.
    ///
    /// Existing tag cells for the file are kept for entities the new rows
    /// still list; cells of entities a row no longer lists are dropped. A
    /// `tags` column overwrites the cells it covers.
    ///
    /// # Errors
    ///
    /// This function may return an error if:
    /// * The CSV lacks a `question` or `entities` column
    /// * The CSV cannot be parsed
    /// * The documents cannot be saved
    pub fn import_csv<R: Read>(&mut self, file_name: &str, reader: R) -> Result<ImportSummary> {
        let mut records = read_records(reader, self.delimiters())
            .with_context(|| format!("Failed to import {file_name}"))?;

        let mut pretagged: usize = 0;
        for record in &mut records {
            let listed = parse_entities(&record.entities, self.config.delimiter);
            self.tags.retain_entities(file_name, &record.question, &listed);
            if seed_tags(&mut self.tags, file_name, record, self.config.delimiter) > 0 {
                pretagged = pretagged.saturating_add(1);
            }
        }

        let summary = ImportSummary {
            file: file_name.to_owned(),
            questions: records.len(),
            pretagged,
            replaced: self.records.contains(file_name),
        };
        self.records.insert(file_name, records);
        self.save()?;

        tracing::info!(
            file = file_name,
            questions = summary.questions,
            pretagged,
            "imported file"
        );
        Ok(summary)
    }

    /// Imports a CSV file from disk under its file name.
    ///
    /// # Errors
    ///
    /// Fails like [`Workspace::import_csv`], or if the file cannot be opened.
    pub fn import_path(&mut self, path: &Path) -> Result<ImportSummary> {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .with_context(|| format!("Not a file name: {}", path.display()))?
            .to_owned();
        let file = File::open(path)
            .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;
        self.import_csv(&file_name, file)
    }

    #[inline]
    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.records.files()
    }

    /// # Errors
    ///
    /// Returns [`TagError::UnknownFile`] if the file was never imported.
    #[inline]
    pub fn records(&self, file: &str) -> error::Result<&[Record]> {
        self.records.records(file)
    }

    /// # Errors
    ///
    /// Returns [`TagError::UnknownFile`] or [`TagError::QuestionOutOfRange`].
    #[inline]
    pub fn record(&self, file: &str, index: usize) -> error::Result<&Record> {
        self.records.record(file, index)
    }

    /// The words of question `index` in `file`.
    ///
    /// # Errors
    ///
    /// Returns [`TagError::UnknownFile`] or [`TagError::QuestionOutOfRange`].
    pub fn tokens(&self, file: &str, index: usize) -> error::Result<Vec<&str>> {
        Ok(tokenize(&self.record(file, index)?.question))
    }

    /// # Errors
    ///
    /// Returns [`TagError::UnknownFile`] or [`TagError::QuestionOutOfRange`].
    pub fn entities(&self, file: &str, index: usize) -> error::Result<Vec<String>> {
        Ok(parse_entities(
            &self.record(file, index)?.entities,
            self.config.delimiter,
        ))
    }

    /// # Errors
    ///
    /// Returns [`TagError::UnknownFile`] or [`TagError::QuestionOutOfRange`].
    pub fn tag(
        &self,
        file: &str,
        index: usize,
        position: usize,
        entity: &str,
    ) -> error::Result<Tag> {
        let record = self.record(file, index)?;
        Ok(self.tags.get(file, &record.question, position, entity))
    }

    /// Sets one cell and persists the tag document.
    ///
    /// # Errors
    ///
    /// This function may return an error if:
    /// * The file, question or word position does not exist
    /// * The entity is not in the question's entity list
    /// * The tag document cannot be saved
    pub fn update_tag(
        &mut self,
        file: &str,
        index: usize,
        position: usize,
        entity: &str,
        tag: Tag,
    ) -> Result<()> {
        let record = self.records.record(file, index)?;
        let len = tokenize(&record.question).len();
        if position >= len {
            return Err(TagError::PositionOutOfRange { position, len }.into());
        }
        if !parse_entities(&record.entities, self.config.delimiter)
            .iter()
            .any(|known| known == entity)
        {
            return Err(TagError::UnknownEntity(entity.to_owned()).into());
        }

        self.tags.set(file, &record.question, position, entity, tag);
        tracing::debug!(file, index, position, entity, %tag, "updated tag");
        self.save_tags()
    }

    /// The tagged spans of a question, for display.
    ///
    /// # Errors
    ///
    /// Returns [`TagError::UnknownFile`] or [`TagError::QuestionOutOfRange`].
    pub fn spans(&self, file: &str, index: usize) -> error::Result<Vec<Span>> {
        let record = self.record(file, index)?;
        let tokens = tokenize(&record.question);
        let entities = parse_entities(&record.entities, self.config.delimiter);
        let view = self.tags.question(file, &record.question);
        Ok(reconstruct_spans(&tokens, &entities, |position, entity| {
            view.get(position, entity)
        }))
    }

    /// The `tags` column value for a question under the configured policy.
    ///
    /// # Errors
    ///
    /// Returns [`TagError::UnknownFile`], [`TagError::QuestionOutOfRange`],
    /// or [`TagError::OverlappingTags`] under the strict policy.
    pub fn generate_tags(&self, file: &str, index: usize) -> error::Result<String> {
        self.generate_with(self.record(file, index)?, file, self.config.overlap)
    }

    fn generate_with(
        &self,
        record: &Record,
        file: &str,
        policy: OverlapPolicy,
    ) -> error::Result<String> {
        let tokens = tokenize(&record.question);
        let entities = parse_entities(&record.entities, self.config.delimiter);
        let view = self.tags.question(file, &record.question);
        generate_tags(
            &record.question,
            &tokens,
            &entities,
            |position, entity| view.get(position, entity),
            policy,
        )
    }

    fn edit_entities<F>(&mut self, file: &str, index: usize, edit: F) -> Result<()>
    where
        F: FnOnce(&mut Propagator<'_>, &mut Record) -> error::Result<()>,
    {
        let delimiter = self.config.delimiter;
        let record = self.records.record_mut(file, index)?;
        let mut propagator = Propagator::new(&mut self.tags, file, delimiter);
        edit(&mut propagator, record)?;
        self.save()
    }

    /// # Errors
    ///
    /// Fails if the question does not exist, the name is invalid or already
    /// listed, or the documents cannot be saved.
    pub fn add_entity(&mut self, file: &str, index: usize, entity: &str) -> Result<()> {
        self.edit_entities(file, index, |propagator, record| propagator.add(record, entity))
    }

    /// # Errors
    ///
    /// Fails if the question does not exist, `old` is not listed, `new` is
    /// invalid or already listed, or the documents cannot be saved.
    pub fn rename_entity(&mut self, file: &str, index: usize, old: &str, new: &str) -> Result<()> {
        self.edit_entities(file, index, |propagator, record| {
            propagator.rename(record, old, new)
        })
    }

    /// # Errors
    ///
    /// Fails if the question does not exist, the entity is not listed, or
    /// the documents cannot be saved.
    pub fn delete_entity(&mut self, file: &str, index: usize, entity: &str) -> Result<()> {
        self.edit_entities(file, index, |propagator, record| {
            propagator.delete(record, entity)
        })
    }

    /// # Errors
    ///
    /// Fails if the question does not exist, the new list has an invalid or
    /// repeated name, or the documents cannot be saved.
    pub fn set_entities(&mut self, file: &str, index: usize, entities: &[String]) -> Result<()> {
        self.edit_entities(file, index, |propagator, record| {
            propagator.replace(record, entities)
        })
    }

    /// Every record of `file` with a regenerated `tags` column.
    ///
    /// # Errors
    ///
    /// Returns [`TagError::UnknownFile`], or [`TagError::OverlappingTags`]
    /// under the strict policy.
    pub fn export_rows(&self, file: &str) -> error::Result<Vec<Record>> {
        self.records(file)?
            .iter()
            .map(|record| -> error::Result<Record> {
                let tags = self.generate_with(record, file, self.config.overlap)?;
                Ok(Record::new(record.question.as_str(), record.entities.as_str()).with_tags(tags))
            })
            .collect()
    }

    /// Writes `<results_dir>/<file>_tagged.csv` and returns its path.
    ///
    /// # Errors
    ///
    /// Fails like [`Workspace::export_rows`], or if the file cannot be written.
    pub fn export_file(&self, file: &str) -> Result<PathBuf> {
        let rows = self.export_rows(file)?;
        let path = self.config.export_path(file);
        persist::write_atomic(&path, &write_csv(&rows)?)?;
        tracing::info!(file, rows = rows.len(), path = %path.display(), "exported file");
        Ok(path)
    }

    /// Annotation progress for `file`. Overlaps count once, as the last entity.
    ///
    /// # Errors
    ///
    /// Returns [`TagError::UnknownFile`] if the file was never imported.
    pub fn stats(&self, file: &str) -> error::Result<TaggingStats> {
        let mut stats = TaggingStats::new();
        for record in self.records(file)? {
            stats.add_question(&self.generate_with(record, file, OverlapPolicy::LastWins)?);
        }
        Ok(stats)
    }
}
