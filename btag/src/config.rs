// src/config.rs
use crate::core::generator::OverlapPolicy;
use anyhow::{Context as _, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "btag.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    /// Where `uploaded_files.json` and `tagging_data.json` live
    pub data_dir: PathBuf,
    /// Where `<file>_tagged.csv` exports are written
    pub results_dir: PathBuf,
    /// Canonical entity list delimiter
    pub delimiter: char,
    /// Delimiter converted to the canonical one on import
    pub legacy_delimiter: char,
    pub overlap: OverlapPolicy,
    /// Questions per page in `show`
    pub page_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            results_dir: PathBuf::from("results"),
            delimiter: ',',
            legacy_delimiter: '|',
            overlap: OverlapPolicy::LastWins,
            page_size: 50,
        }
    }
}

impl Config {
    /// Reads a config file, resolving relative directories against the file's location.
    ///
    /// # Errors
    ///
    /// This function may return an error if:
    /// * The file cannot be read
    /// * The file is not valid TOML or has unknown keys
    /// * The delimiters or page size are unusable
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let mut config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        if let Some(base) = path.parent() {
            config.data_dir = base.join(&config.data_dir);
            config.results_dir = base.join(&config.results_dir);
        }
        config.validate()?;
        Ok(config)
    }

    /// Checks that the delimiters can split an entity list unambiguously.
    ///
    /// # Errors
    ///
    /// Returns an error if a delimiter is whitespace, both delimiters are
    /// the same character, or the page size is zero.
    pub fn validate(&self) -> Result<()> {
        if self.delimiter.is_whitespace() || self.legacy_delimiter.is_whitespace() {
            bail!("Entity delimiters must not be whitespace");
        }
        if self.delimiter == self.legacy_delimiter {
            bail!(
                "The delimiter and legacy delimiter must differ (both are '{}')",
                self.delimiter
            );
        }
        if self.page_size == 0 {
            bail!("page-size must be at least 1");
        }
        Ok(())
    }

    #[inline]
    #[must_use]
    pub fn records_path(&self) -> PathBuf {
        self.data_dir.join("uploaded_files.json")
    }

    #[inline]
    #[must_use]
    pub fn tags_path(&self) -> PathBuf {
        self.data_dir.join("tagging_data.json")
    }

    #[inline]
    #[must_use]
    pub fn export_path(&self, file_name: &str) -> PathBuf {
        self.results_dir.join(format!("{file_name}_tagged.csv"))
    }
}

/// Finds the nearest `btag.toml`, starting at `dir` and walking up through
/// its parents.
#[must_use]
pub fn find_config_file(dir: &Path) -> Option<PathBuf> {
    let mut current_dir = dir.to_path_buf();
    let mut visited = HashSet::new();

    while visited.insert(current_dir.clone()) {
        let candidate = current_dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }

        match current_dir.parent() {
            Some(parent) => current_dir = parent.to_path_buf(),
            None => break,
        }
    }

    None
}

/// Loads the configuration that applies to `dir`.
///
/// Falls back to [`Config::default`] (relative to `dir`) when no config
/// file exists in `dir` or any parent.
///
/// # Errors
///
/// This function may return an error if a config file is found but cannot
/// be read or parsed.
pub fn load_config(dir: &Path) -> Result<Config> {
    if let Some(path) = find_config_file(dir) {
        tracing::debug!(path = %path.display(), "loading config");
        return Config::from_path(&path);
    }

    let mut config = Config::default();
    config.data_dir = dir.join(&config.data_dir);
    config.results_dir = dir.join(&config.results_dir);
    Ok(config)
}
