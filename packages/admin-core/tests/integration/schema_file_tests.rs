//! Schema and dictionary files loaded from disk.

use std::fs;

use tempfile::tempdir;

use admin_core::display::Label;
use admin_core::error::AdminError;
use admin_core::i18n::Localizer;
use admin_core::schema::load_schema_from_path;
use admin_core::table::order_columns;

use super::helpers::TASK_SCHEMA;

#[test]
fn test_load_schema_file() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("schema.json");
    fs::write(&path, TASK_SCHEMA)?;

    let registry = load_schema_from_path(&path)?;
    assert_eq!(registry.table_names(), vec!["Project", "Task"]);

    let task = registry.get("Task")?;
    let order: Vec<_> = order_columns(task).iter().map(|f| f.name.as_str()).collect();
    assert_eq!(order, vec!["id", "title", "priority", "done", "state", "projectId"]);
    assert!(task.field("priority").unwrap().has_label(&Label::PriorityHml));
    Ok(())
}

#[test]
fn test_dangling_foreign_key_file() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("schema.json");
    fs::write(&path, TASK_SCHEMA.replace("\"otherTable\": \"Project\"", "\"otherTable\": \"Ghost\""))?;

    assert!(matches!(
        load_schema_from_path(&path),
        Err(AdminError::DanglingForeignKey { .. })
    ));
    Ok(())
}

#[test]
fn test_language_file() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("lang.json");
    fs::write(
        &path,
        r#"{"en": {"Tbl_Task_title": "Title"}, "de": {"Tbl_Task_title": "Titel"}}"#,
    )?;

    let localizer = Localizer::load("en", &path)?;
    assert_eq!(localizer.field_label("Task", "title"), "Title");
    assert_eq!(localizer.with_language("de").field_label("Task", "title"), "Titel");
    assert_eq!(localizer.field_label("Task", "done"), "Tbl_Task_done");
    Ok(())
}
