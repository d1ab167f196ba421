// src/persist.rs
use anyhow::{Context as _, Result};
use std::fs;
use std::io::{ErrorKind, Write as _};
use std::path::Path;
use tempfile::NamedTempFile;

/// How a persisted document was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    Missing,
    Empty,
    /// The file could not be decoded and an empty document was used instead.
    Recovered(String),
}

impl LoadOutcome {
    /// A message worth showing to the user, if any.
    #[inline]
    #[must_use]
    pub fn warning(&self) -> Option<&str> {
        match self {
            Self::Recovered(reason) => Some(reason),
            Self::Loaded | Self::Missing | Self::Empty => None,
        }
    }
}

/// Reads a whole-file document, falling back to `T::default()`.
///
/// A missing or blank file yields the default silently. A file that cannot
/// be decoded yields the default with [`LoadOutcome::Recovered`], so a
/// damaged file never blocks the session.
///
/// # Errors
///
/// This function may return an error if the file exists but cannot be read.
pub fn load_or_default<T, F>(path: &Path, decode: F) -> Result<(T, LoadOutcome)>
where
    T: Default,
    F: FnOnce(&str) -> Result<T>,
{
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Ok((T::default(), LoadOutcome::Missing));
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read {}", path.display()));
        }
    };

    let decoded = String::from_utf8(bytes)
        .map_err(anyhow::Error::from)
        .and_then(|content| {
            if content.trim().is_empty() {
                Ok(None)
            } else {
                decode(content.trim()).map(Some)
            }
        });

    match decoded {
        Ok(Some(value)) => Ok((value, LoadOutcome::Loaded)),
        Ok(None) => Ok((T::default(), LoadOutcome::Empty)),
        Err(e) => {
            let reason = format!(
                "{} is unreadable and was replaced by an empty document: {e:#}",
                path.display()
            );
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "recovering from malformed document"
            );
            Ok((T::default(), LoadOutcome::Recovered(reason)))
        }
    }
}

/// Replaces `path` with `contents` in one step.
///
/// The data goes to a temporary file in the same directory, which is then
/// renamed over the target, so readers never see a half-written document.
/// An existing target keeps its permissions.
///
/// # Errors
///
/// This function may return an error if:
/// * The parent directory cannot be created
/// * The temporary file cannot be written or renamed into place
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    let mut file = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
    file.write_all(contents)?;
    if let Ok(existing) = fs::metadata(path) {
        file.as_file()
            .set_permissions(existing.permissions())
            .with_context(|| format!("Failed to copy permissions of {}", path.display()))?;
    }
    file.as_file().sync_all()?;
    file.persist(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Serializes `value` as JSON and writes it with [`write_atomic`].
///
/// # Errors
///
/// This function may return an error if serialization or the write fails.
pub fn save_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_vec(value)?;
    write_atomic(path, &json)?;
    tracing::debug!(path = %path.display(), bytes = json.len(), "saved document");
    Ok(())
}
