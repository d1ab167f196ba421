// tests/integration_tests/export_test.rs
use super::common::{open_workspace, setup_workspace, test_config};
use anyhow::Result;
use btag::{OverlapPolicy, Span, Tag, TagError, Workspace};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

const FILE: &str = "questions.csv";

#[test]
fn test_export_file_contents() -> Result<()> {
    let (temp_dir, mut workspace) = setup_workspace()?;
    workspace.update_tag(FILE, 0, 5, "LOCATION", Tag::B)?;
    workspace.update_tag(FILE, 1, 2, "WORK", Tag::B)?;

    let path = workspace.export_file(FILE)?;
    assert_eq!(path, temp_dir.path().join("results/questions.csv_tagged.csv"));

    let content = fs::read_to_string(&path)?;
    assert_eq!(
        content,
        "question,entities,tags\n\
What is the capital of France,LOCATION,O O O O O B-LOCATION\n\
Who wrote Hamlet,\"PERSON,WORK\",O O B-WORK\n\
Bank of America branch,\"ORG,LOCATION\",O O O O\n"
    );
    Ok(())
}

#[test]
fn test_export_can_be_reimported() -> Result<()> {
    let (_temp_dir, mut workspace) = setup_workspace()?;
    workspace.update_tag(FILE, 2, 0, "ORG", Tag::B)?;
    workspace.update_tag(FILE, 2, 1, "ORG", Tag::I)?;
    workspace.update_tag(FILE, 2, 2, "ORG", Tag::I)?;
    let path = workspace.export_file(FILE)?;

    let other_dir = TempDir::new()?;
    let mut fresh = open_workspace(&other_dir)?;
    fresh.import_path(&path)?;
    let name = "questions.csv_tagged.csv";

    assert_eq!(
        fresh.spans(name, 2)?,
        vec![Span {
            start: 0,
            entity: String::from("ORG"),
            words: vec![
                String::from("Bank"),
                String::from("of"),
                String::from("America")
            ],
        }]
    );
    assert_eq!(fresh.export_rows(name)?, workspace.export_rows(FILE)?);
    Ok(())
}

#[test]
fn test_overlap_last_entity_wins() -> Result<()> {
    let (_temp_dir, mut workspace) = setup_workspace()?;
    workspace.update_tag(FILE, 2, 0, "ORG", Tag::B)?;
    workspace.update_tag(FILE, 2, 1, "ORG", Tag::I)?;
    workspace.update_tag(FILE, 2, 2, "ORG", Tag::I)?;
    workspace.update_tag(FILE, 2, 2, "LOCATION", Tag::B)?;

    let spans = workspace.spans(FILE, 2)?;
    assert_eq!(spans.len(), 2, "Both overlapping spans are shown");
    assert_eq!(
        workspace.generate_tags(FILE, 2)?,
        "B-ORG I-ORG B-LOCATION O",
        "The later entity in the list takes the shared word"
    );
    Ok(())
}

#[test]
fn test_strict_overlap_refuses_export() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = btag::Config {
        overlap: OverlapPolicy::Strict,
        ..test_config(temp_dir.path())
    };
    let mut workspace = Workspace::open(config)?;
    workspace.import_csv(FILE, super::common::QUESTIONS_CSV.as_bytes())?;
    workspace.update_tag(FILE, 2, 2, "ORG", Tag::B)?;
    workspace.update_tag(FILE, 2, 2, "LOCATION", Tag::B)?;

    let err = workspace
        .export_file(FILE)
        .err()
        .ok_or_else(|| anyhow::anyhow!("export should fail"))?;
    match err.downcast_ref::<TagError>() {
        Some(TagError::OverlappingTags {
            position, entities, ..
        }) => {
            assert_eq!(*position, 2);
            assert_eq!(entities, &vec![String::from("ORG"), String::from("LOCATION")]);
        }
        other => anyhow::bail!("unexpected error: {other:?}"),
    }
    assert!(!temp_dir.path().join("results/questions.csv_tagged.csv").exists());
    Ok(())
}

#[test]
fn test_stats_follow_tags() -> Result<()> {
    let (_temp_dir, mut workspace) = setup_workspace()?;
    workspace.update_tag(FILE, 0, 5, "LOCATION", Tag::B)?;

    let stats = workspace.stats(FILE)?;
    assert_eq!(stats.total_questions, 3);
    assert_eq!(stats.tagged_questions, 1);
    assert_eq!(stats.total_words, 13);
    assert_eq!(stats.tagged_words, 1);
    Ok(())
}

#[test]
fn test_export_unknown_file() -> Result<()> {
    let (_temp_dir, workspace) = setup_workspace()?;
    assert!(workspace.export_file("missing.csv").is_err());
    Ok(())
}
