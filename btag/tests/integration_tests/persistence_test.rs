// tests/integration_tests/persistence_test.rs
use super::common::{create_test_file, open_workspace, setup_workspace};
use anyhow::Result;
use btag::Tag;
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

const RECORDS: &str = r#"{"trip.csv":[{"question":"New York to New Delhi","entities":"LOCATION","tags":null}]}"#;

#[test]
fn test_word_keyed_document_is_converted() -> Result<()> {
    let temp_dir = TempDir::new()?;
    create_test_file(temp_dir.path(), "data/uploaded_files.json", RECORDS)?;
    create_test_file(
        temp_dir.path(),
        "data/tagging_data.json",
        r#"{"trip.csv":{"New York to New Delhi":{"New":{"LOCATION":"B"},"York":{"LOCATION":"I"},"Gone":{"LOCATION":"B"}}}}"#,
    )?;

    let workspace = open_workspace(&temp_dir)?;
    assert!(workspace.warnings().is_empty());
    assert_eq!(workspace.tag("trip.csv", 0, 0, "LOCATION")?, Tag::B);
    assert_eq!(workspace.tag("trip.csv", 0, 1, "LOCATION")?, Tag::I);
    assert_eq!(workspace.tag("trip.csv", 0, 2, "LOCATION")?, Tag::O);
    assert_eq!(
        workspace.tag("trip.csv", 0, 3, "LOCATION")?,
        Tag::B,
        "Every occurrence of a word inherits its old tags"
    );
    assert_eq!(workspace.generate_tags("trip.csv", 0)?, "B-LOCATION I-LOCATION O B-LOCATION O");

    let saved = fs::read_to_string(temp_dir.path().join("data/tagging_data.json"))?;
    assert_eq!(
        saved,
        r#"{"version":2,"files":{"trip.csv":{"New York to New Delhi":{"0":{"LOCATION":"B"},"1":{"LOCATION":"I"},"3":{"LOCATION":"B"}}}}}"#
    );
    Ok(())
}

#[test]
fn test_unsupported_version_recovers_empty() -> Result<()> {
    let temp_dir = TempDir::new()?;
    create_test_file(temp_dir.path(), "data/uploaded_files.json", RECORDS)?;
    create_test_file(
        temp_dir.path(),
        "data/tagging_data.json",
        r#"{"version":7,"files":{}}"#,
    )?;

    let workspace = open_workspace(&temp_dir)?;
    assert_eq!(workspace.warnings().len(), 1);
    assert_eq!(workspace.files().collect::<Vec<_>>(), vec!["trip.csv"]);
    assert_eq!(workspace.generate_tags("trip.csv", 0)?, "O O O O O");
    Ok(())
}

#[test]
fn test_malformed_records_recover_empty() -> Result<()> {
    let temp_dir = TempDir::new()?;
    create_test_file(temp_dir.path(), "data/uploaded_files.json", "[not json")?;

    let workspace = open_workspace(&temp_dir)?;
    assert_eq!(workspace.files().count(), 0);
    assert_eq!(workspace.warnings().len(), 1);
    Ok(())
}

#[test]
fn test_every_mutation_is_written_through() -> Result<()> {
    let (temp_dir, mut workspace) = setup_workspace()?;

    workspace.update_tag("questions.csv", 1, 2, "WORK", Tag::B)?;
    assert_eq!(
        open_workspace(&temp_dir)?.generate_tags("questions.csv", 1)?,
        "O O B-WORK"
    );

    workspace.rename_entity("questions.csv", 1, "WORK", "TITLE")?;
    let reopened = open_workspace(&temp_dir)?;
    assert_eq!(reopened.record("questions.csv", 1)?.entities, "PERSON,TITLE");
    assert_eq!(reopened.generate_tags("questions.csv", 1)?, "O O B-TITLE");
    Ok(())
}

#[test]
fn test_no_temporary_files_left_behind() -> Result<()> {
    let (temp_dir, mut workspace) = setup_workspace()?;
    workspace.update_tag("questions.csv", 0, 5, "LOCATION", Tag::B)?;
    workspace.export_file("questions.csv")?;

    let mut names: Vec<String> = fs::read_dir(temp_dir.path().join("data"))?
        .chain(fs::read_dir(temp_dir.path().join("results"))?)
        .map(|entry| Ok(entry?.file_name().to_string_lossy().into_owned()))
        .collect::<Result<_>>()?;
    names.sort();

    assert_eq!(
        names,
        vec![
            "questions.csv_tagged.csv",
            "tagging_data.json",
            "uploaded_files.json"
        ]
    );
    Ok(())
}

#[test]
fn test_records_with_nan_cells_load() -> Result<()> {
    let temp_dir = TempDir::new()?;
    create_test_file(
        temp_dir.path(),
        "data/uploaded_files.json",
        r#"{"q.csv":[{"question":"Visit Paris","entities":"LOCATION","tags":NaN},{"question":"Who wrote Hamlet","entities":"PERSON,WORK","tags":"O O B-WORK"}]}"#,
    )?;

    let workspace = open_workspace(&temp_dir)?;
    assert!(workspace.warnings().is_empty(), "Nothing is discarded");
    assert_eq!(workspace.files().collect::<Vec<_>>(), vec!["q.csv"]);
    assert_eq!(workspace.records("q.csv")?.len(), 2);
    assert_eq!(workspace.record("q.csv", 0)?.tags, None);
    assert_eq!(workspace.entities("q.csv", 1)?, vec!["PERSON", "WORK"]);

    let saved = fs::read_to_string(temp_dir.path().join("data/uploaded_files.json"))?;
    assert!(!saved.contains("NaN"), "The document is rewritten as standard JSON");
    assert_eq!(open_workspace(&temp_dir)?.records("q.csv")?.len(), 2);
    Ok(())
}
