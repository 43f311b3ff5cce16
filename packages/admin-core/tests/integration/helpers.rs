//! Shared fixtures.

use admin_core::config::AdminConfig;
use admin_core::i18n::Localizer;
use admin_core::registry::TableRegistry;
use admin_core::render::{HookRegistry, RenderContext};
use admin_core::schema::load_schema_from_str;

pub const TASK_SCHEMA: &str = r#"{
    "version": 1,
    "tables": [
        {
            "name": "Project",
            "primaryKey": "id",
            "fkDisplayField": "name",
            "fields": [
                {"name": "id", "type": "int", "displaySettings": {"labels": ["hidden", "pk"]}},
                {"name": "name", "type": "varchar", "notNull": true,
                 "displaySettings": {"labels": ["NOT_NULL", "notnull"], "properties": {"length": 60}}}
            ]
        },
        {
            "name": "Task",
            "primaryKey": "id",
            "fkDisplayField": "title",
            "fields": [
                {"name": "id", "type": "int", "displaySettings": {"labels": ["hidden", "pk"]}},
                {"name": "title", "type": "varchar", "notNull": true,
                 "displaySettings": {"labels": ["NOT_NULL", "notnull"]}},
                {"name": "priority", "type": "int", "displaySettings": {"labels": ["priority-hml"]}},
                {"name": "done", "type": "boolean"},
                {"name": "state", "type": "enum", "displaySettings": {"properties": {"enumOptions": "A,B,C"}}},
                {"name": "projectId", "type": "int",
                 "foreignKey": {"side": "many", "otherTable": "Project", "otherField": "id", "otherSide": "one"}}
            ]
        }
    ]
}"#;

pub fn task_registry() -> TableRegistry {
    load_schema_from_str(TASK_SCHEMA).unwrap()
}

/// Owns the render collaborators for one test.
pub struct RenderFixture {
    pub config: AdminConfig,
    pub localizer: Localizer,
    pub hooks: HookRegistry,
}

impl RenderFixture {
    pub fn new() -> Self {
        Self {
            config: AdminConfig::default(),
            localizer: Localizer::default(),
            hooks: HookRegistry::new(),
        }
    }

    pub fn ctx(&self) -> RenderContext<'_> {
        RenderContext::new(&self.config, &self.localizer, &self.hooks)
    }
}
