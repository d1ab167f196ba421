// src/core/propagate.rs
use crate::core::entities::{is_valid_entity_name, join_entities, parse_entities};
use crate::core::store::TagStore;
use crate::error::{Result, TagError};
use crate::models::Record;

/// Keeps a question's tag cells in step with edits to its entity list.
///
/// Every operation updates both the record's entity string and the tag
/// store, and validates before touching either. Persisting the result is
/// the caller's job.
#[derive(Debug)]
pub struct Propagator<'a> {
    store: &'a mut TagStore,
    file: &'a str,
    delimiter: char,
}

impl<'a> Propagator<'a> {
    #[inline]
    #[must_use]
    pub const fn new(store: &'a mut TagStore, file: &'a str, delimiter: char) -> Self {
        Self {
            store,
            file,
            delimiter,
        }
    }

    /// Appends a new entity to the record.
    ///
    /// # Errors
    ///
    /// Returns [`TagError::InvalidEntityName`] or [`TagError::DuplicateEntity`].
    pub fn add(&mut self, record: &mut Record, entity: &str) -> Result<()> {
        let entity = entity.trim();
        let mut entities = parse_entities(&record.entities, self.delimiter);
        self.check_new_name(&entities, entity)?;

        entities.push(entity.to_owned());
        record.entities = join_entities(&entities, self.delimiter);
        tracing::debug!(file = self.file, entity, "added entity");
        Ok(())
    }

    /// Renames `old` to `new` in the entity list and moves its tag cells.
    ///
    /// # Errors
    ///
    /// Returns [`TagError::UnknownEntity`] if `old` is not listed, and
    /// [`TagError::InvalidEntityName`] or [`TagError::DuplicateEntity`]
    /// if `new` cannot be used.
    pub fn rename(&mut self, record: &mut Record, old: &str, new: &str) -> Result<()> {
        let new = new.trim();
        let mut entities = parse_entities(&record.entities, self.delimiter);
        let index = entities
            .iter()
            .position(|entity| entity == old)
            .ok_or_else(|| TagError::UnknownEntity(old.to_owned()))?;
        if old == new {
            return Ok(());
        }
        self.check_new_name(&entities, new)?;

        if let Some(slot) = entities.get_mut(index) {
            new.clone_into(slot);
        }
        record.entities = join_entities(&entities, self.delimiter);
        let moved = self
            .store
            .rename_entity(self.file, &record.question, old, new);
        tracing::debug!(file = self.file, old, new, moved, "renamed entity");
        Ok(())
    }

    /// Removes `entity` from the list and drops all of its tag cells.
    ///
    /// # Errors
    ///
    /// Returns [`TagError::UnknownEntity`] if `entity` is not listed.
    pub fn delete(&mut self, record: &mut Record, entity: &str) -> Result<()> {
        let mut entities = parse_entities(&record.entities, self.delimiter);
        let before = entities.len();
        entities.retain(|known| known != entity);
        if entities.len() == before {
            return Err(TagError::UnknownEntity(entity.to_owned()));
        }

        record.entities = join_entities(&entities, self.delimiter);
        let removed = self
            .store
            .remove_entity(self.file, &record.question, entity);
        tracing::debug!(file = self.file, entity, removed, "deleted entity");
        Ok(())
    }

    /// Replaces the whole entity list, dropping cells of entities not in it.
    ///
    /// # Errors
    ///
    /// Returns [`TagError::InvalidEntityName`] or [`TagError::DuplicateEntity`]
    /// if the new list has an unusable or repeated name.
    pub fn replace(&mut self, record: &mut Record, entities: &[String]) -> Result<()> {
        let mut accepted: Vec<String> = Vec::with_capacity(entities.len());
        for entity in entities {
            self.check_new_name(&accepted, entity.trim())?;
            accepted.push(entity.trim().to_owned());
        }

        record.entities = join_entities(&accepted, self.delimiter);
        let removed = self
            .store
            .retain_entities(self.file, &record.question, &accepted);
        tracing::debug!(file = self.file, removed, "replaced entity list");
        Ok(())
    }

    fn check_new_name(&self, entities: &[String], name: &str) -> Result<()> {
        if !is_valid_entity_name(name, self.delimiter) {
            return Err(TagError::InvalidEntityName(name.to_owned()));
        }
        if entities.iter().any(|entity| entity == name) {
            return Err(TagError::DuplicateEntity(name.to_owned()));
        }
        Ok(())
    }
}
