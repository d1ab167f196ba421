// tests/integration_tests/propagate_test.rs
use super::common::{open_workspace, setup_workspace};
use anyhow::Result;
use btag::{Span, Tag, TagError};
use pretty_assertions::assert_eq;

const FILE: &str = "questions.csv";

fn fails_with(result: Result<()>, check: impl Fn(&TagError) -> bool) -> bool {
    result
        .err()
        .is_some_and(|err| err.downcast_ref::<TagError>().is_some_and(check))
}

#[test]
fn test_rename_carries_tags() -> Result<()> {
    let (_temp_dir, mut workspace) = setup_workspace()?;
    workspace.update_tag(FILE, 0, 5, "LOCATION", Tag::B)?;

    workspace.rename_entity(FILE, 0, "LOCATION", "CITY")?;

    assert_eq!(workspace.entities(FILE, 0)?, vec!["CITY"]);
    assert_eq!(workspace.tag(FILE, 0, 5, "CITY")?, Tag::B);
    assert_eq!(workspace.tag(FILE, 0, 5, "LOCATION")?, Tag::O);
    assert_eq!(workspace.spans(FILE, 0)?, vec![Span::new(5, "CITY", "France")]);
    assert_eq!(workspace.generate_tags(FILE, 0)?, "O O O O O B-CITY");
    Ok(())
}

#[test]
fn test_rename_rejections() -> Result<()> {
    let (_temp_dir, mut workspace) = setup_workspace()?;

    assert!(fails_with(
        workspace.rename_entity(FILE, 1, "AUTHOR", "WRITER"),
        |e| matches!(e, TagError::UnknownEntity(name) if name == "AUTHOR")
    ));
    assert!(fails_with(
        workspace.rename_entity(FILE, 1, "PERSON", "WORK"),
        |e| matches!(e, TagError::DuplicateEntity(name) if name == "WORK")
    ));
    assert!(fails_with(
        workspace.rename_entity(FILE, 1, "PERSON", "  "),
        |e| matches!(e, TagError::InvalidEntityName(_))
    ));
    assert_eq!(workspace.entities(FILE, 1)?, vec!["PERSON", "WORK"]);

    workspace.rename_entity(FILE, 1, "PERSON", "PERSON")?;
    assert_eq!(workspace.entities(FILE, 1)?, vec!["PERSON", "WORK"]);
    Ok(())
}

#[test]
fn test_delete_leaves_no_orphans() -> Result<()> {
    let (temp_dir, mut workspace) = setup_workspace()?;
    workspace.update_tag(FILE, 2, 0, "ORG", Tag::B)?;
    workspace.update_tag(FILE, 2, 1, "ORG", Tag::I)?;
    workspace.update_tag(FILE, 2, 2, "LOCATION", Tag::B)?;

    workspace.delete_entity(FILE, 2, "ORG")?;
    assert_eq!(workspace.entities(FILE, 2)?, vec!["LOCATION"]);

    // Re-adding the name must not bring the old cells back.
    workspace.add_entity(FILE, 2, "ORG")?;
    assert_eq!(workspace.tag(FILE, 2, 0, "ORG")?, Tag::O);
    assert_eq!(workspace.generate_tags(FILE, 2)?, "O O B-LOCATION O");

    let reopened = open_workspace(&temp_dir)?;
    assert_eq!(reopened.tag(FILE, 2, 1, "ORG")?, Tag::O);
    assert_eq!(reopened.entities(FILE, 2)?, vec!["LOCATION", "ORG"]);
    Ok(())
}

#[test]
fn test_delete_unknown_entity() -> Result<()> {
    let (_temp_dir, mut workspace) = setup_workspace()?;
    assert!(fails_with(
        workspace.delete_entity(FILE, 0, "PERSON"),
        |e| matches!(e, TagError::UnknownEntity(_))
    ));
    Ok(())
}

#[test]
fn test_add_entity_validation() -> Result<()> {
    let (_temp_dir, mut workspace) = setup_workspace()?;

    workspace.add_entity(FILE, 0, " COUNTRY ")?;
    assert_eq!(workspace.entities(FILE, 0)?, vec!["LOCATION", "COUNTRY"]);

    assert!(fails_with(
        workspace.add_entity(FILE, 0, "COUNTRY"),
        |e| matches!(e, TagError::DuplicateEntity(_))
    ));
    assert!(fails_with(
        workspace.add_entity(FILE, 0, "A,B"),
        |e| matches!(e, TagError::InvalidEntityName(_))
    ));
    Ok(())
}

#[test]
fn test_set_entities_drops_removed_cells() -> Result<()> {
    let (_temp_dir, mut workspace) = setup_workspace()?;
    workspace.update_tag(FILE, 1, 0, "PERSON", Tag::B)?;
    workspace.update_tag(FILE, 1, 2, "WORK", Tag::B)?;

    workspace.set_entities(FILE, 1, &[String::from("WORK"), String::from("DATE")])?;

    assert_eq!(workspace.record(FILE, 1)?.entities, "WORK,DATE");
    assert_eq!(workspace.tag(FILE, 1, 2, "WORK")?, Tag::B);
    assert_eq!(workspace.tag(FILE, 1, 0, "PERSON")?, Tag::O);
    assert_eq!(workspace.generate_tags(FILE, 1)?, "O O B-WORK");

    assert!(
        workspace
            .set_entities(FILE, 1, &[String::from("A"), String::from("A")])
            .is_err()
    );
    assert_eq!(workspace.record(FILE, 1)?.entities, "WORK,DATE");
    Ok(())
}

#[test]
fn test_edits_only_touch_their_question() -> Result<()> {
    let (_temp_dir, mut workspace) = setup_workspace()?;
    workspace.update_tag(FILE, 0, 5, "LOCATION", Tag::B)?;
    workspace.update_tag(FILE, 2, 2, "LOCATION", Tag::B)?;

    workspace.delete_entity(FILE, 2, "LOCATION")?;

    assert_eq!(workspace.tag(FILE, 0, 5, "LOCATION")?, Tag::B);
    Ok(())
}
