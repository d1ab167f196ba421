// tests/integration_tests/common.rs
use anyhow::Result;
use btag::{Config, Workspace};
use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const QUESTIONS_CSV: &str = "question,entities\n\
What is the capital of France,LOCATION\n\
Who wrote Hamlet,PERSON|WORK\n\
Bank of America branch,ORG|LOCATION\n";

pub fn create_test_file(dir: &Path, name: &str, content: &str) -> Result<PathBuf> {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = fs::File::create(&path)?;
    file.write_all(content.as_bytes())?;
    Ok(path)
}

pub fn test_config(dir: &Path) -> Config {
    Config {
        data_dir: dir.join("data"),
        results_dir: dir.join("results"),
        ..Config::default()
    }
}

pub fn open_workspace(dir: &TempDir) -> Result<Workspace> {
    Workspace::open(test_config(dir.path()))
}

/// A workspace with `questions.csv` already imported.
pub fn setup_workspace() -> Result<(TempDir, Workspace)> {
    let temp_dir = TempDir::new()?;
    let mut workspace = open_workspace(&temp_dir)?;
    workspace.import_csv("questions.csv", QUESTIONS_CSV.as_bytes())?;
    Ok((temp_dir, workspace))
}
