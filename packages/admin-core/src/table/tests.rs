use super::*;
use crate::display::{DisplaySettings, Label};
use crate::error::AdminError;
use crate::types::FieldType;

fn task_table() -> TableDefinition {
    TableDefinition::new("Task", "id", "title", DisplaySettings::default())
        .with_field(FieldDefinition::new("id", FieldType::Int).with_label("pk"))
        .unwrap()
        .with_field(FieldDefinition::new("title", FieldType::Varchar).with_label("NOT_NULL"))
        .unwrap()
        .with_field(FieldDefinition::new("priority", FieldType::Int).with_label("priority-hml"))
        .unwrap()
        .with_field(FieldDefinition::new("done", FieldType::Boolean))
        .unwrap()
}

fn names(fields: &[&FieldDefinition]) -> Vec<String> {
    fields.iter().map(|f| f.name.clone()).collect()
}

#[test]
fn test_order_without_entries_is_declaration_order() {
    let table = task_table();
    assert_eq!(
        names(&order_columns(&table)),
        vec!["id", "title", "priority", "done"]
    );
}

#[test]
fn test_explicit_entries_come_first() {
    let table = task_table()
        .with_render_order("done", 1)
        .with_render_order("priority", 0);
    assert_eq!(
        names(&order_columns(&table)),
        vec!["priority", "done", "id", "title"]
    );
}

#[test]
fn test_equal_indices_keep_declaration_order() {
    let table = task_table()
        .with_render_order("title", 5)
        .with_render_order("id", 5);
    assert_eq!(
        names(&order_columns(&table)),
        vec!["id", "title", "priority", "done"]
    );

    let table = task_table()
        .with_render_order("done", 1)
        .with_render_order("priority", 1)
        .with_render_order("title", 0);
    assert_eq!(
        names(&order_columns(&table)),
        vec!["title", "priority", "done", "id"]
    );
}

#[test]
fn test_absent_and_duplicate_entries() {
    let table = task_table()
        .with_render_order("ghost", 0)
        .with_render_order("done", 1)
        .with_render_order("done", 2);
    let ordered = order_columns(&table);
    assert_eq!(names(&ordered), vec!["done", "id", "title", "priority"]);
    assert_eq!(ordered.len(), table.fields.len());
}

#[test]
fn test_display_index_property_orders_field() {
    let mut table = task_table();
    table
        .fields
        .get_mut("done")
        .unwrap()
        .display_settings
        .add_property("displayIndex", 0);
    assert_eq!(names(&order_columns(&table))[0], "done");
}

#[test]
fn test_duplicate_field_rejected() {
    let mut table = task_table();
    let err = table
        .add_field(FieldDefinition::new("title", FieldType::Text))
        .unwrap_err();
    assert_eq!(
        err,
        AdminError::FieldAlreadyExists {
            table: "Task".to_string(),
            field: "title".to_string()
        }
    );
}

#[test]
fn test_key_field_lookup() {
    let table = task_table();
    assert_eq!(table.primary_key_field().unwrap().name, "id");
    assert_eq!(table.fk_display_field().unwrap().name, "title");
    assert!(table.field("title").unwrap().is_required());

    let broken = TableDefinition::new("Broken", "missing", "id", DisplaySettings::default());
    assert!(matches!(
        validation::validate_key_fields(&broken),
        Err(AdminError::FieldNotFound { .. })
    ));
}

#[test]
fn test_fields_with_label() {
    let table = task_table();
    let label = Label::PriorityHml;
    let found: Vec<_> = table.fields_with_label(&label).map(|f| &f.name).collect();
    assert_eq!(found, vec!["priority"]);
}

#[test]
fn test_foreign_key_validation() {
    let project = TableDefinition::new("Project", "id", "name", DisplaySettings::default())
        .with_field(FieldDefinition::new("id", FieldType::Int))
        .unwrap()
        .with_field(FieldDefinition::new("name", FieldType::Varchar))
        .unwrap();
    let good = task_table()
        .with_field(
            FieldDefinition::new("projectId", FieldType::Int)
                .with_foreign_key(ForeignKeyRef::many_to_one("Project", "id")),
        )
        .unwrap();
    let lookup = |name: &str| (name == "Project").then_some(&project);
    assert!(validation::validate_foreign_keys(&good, lookup).is_ok());

    let bad = task_table()
        .with_field(
            FieldDefinition::new("ownerId", FieldType::Int)
                .with_foreign_key(ForeignKeyRef::many_to_one("Project", "ownerKey")),
        )
        .unwrap();
    assert!(matches!(
        validation::validate_foreign_keys(&bad, lookup),
        Err(AdminError::DanglingForeignKey { .. })
    ));
}

#[test]
fn test_field_definition_serde() {
    let json = r#"{
        "name": "projectId",
        "type": "int",
        "notNull": true,
        "foreignKey": {"side": "many", "otherTable": "Project", "otherField": "id", "otherSide": "one"},
        "displaySettings": {"labels": ["NOT_NULL"], "properties": {"length": 11}}
    }"#;
    let field: FieldDefinition = serde_json::from_str(json).unwrap();
    assert_eq!(field.field_type, FieldType::Int);
    assert!(field.not_null);
    assert_eq!(field.foreign_key.as_ref().unwrap().side, FkSide::Many);
    assert!(field.is_required());
    assert_eq!(field.default_value, None);
}
