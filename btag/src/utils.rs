// src/utils.rs
use anyhow::{Context as _, Result};
use glob::Pattern;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub fn is_hidden(entry: &walkdir::DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|s| s.starts_with('.'))
}

/// Resolves import arguments to the CSV files they name.
///
/// Files are taken as given. Directories are walked recursively, skipping
/// hidden entries, and every file whose name matches `pattern` is kept.
///
/// # Arguments
///
/// * `paths` - Files or directories given on the command line
/// * `pattern` - Glob applied to file names inside directories (e.g. `*.csv`)
///
/// # Returns
///
/// * `Ok(Vec<PathBuf>)` - The matching files, directories expanded in sorted order
///
/// # Errors
///
/// This function may return an error if:
/// * The pattern contains invalid glob syntax
/// * A path does not exist
/// * A directory cannot be traversed
pub fn find_csv_files(paths: &[PathBuf], pattern: &str) -> Result<Vec<PathBuf>> {
    let pattern =
        Pattern::new(pattern).with_context(|| format!("Invalid file pattern: {pattern}"))?;
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            files.push(path.clone());
            continue;
        }
        if !path.is_dir() {
            anyhow::bail!("No such file or directory: {}", path.display());
        }
        files.extend(walk_matching(path, &pattern)?);
    }

    Ok(files)
}

fn walk_matching(dir: &Path, pattern: &Pattern) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();

    for entry in WalkDir::new(dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_hidden(e))
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        if entry
            .file_name()
            .to_str()
            .is_some_and(|name| pattern.matches(name))
        {
            found.push(entry.into_path());
        }
    }

    Ok(found)
}
