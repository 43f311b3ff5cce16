//! Turning schema files into a validated [`TableRegistry`].

use std::fs;
use std::path::Path;

use super::validation::validate_schema;
use super::SchemaFile;
use crate::error::AdminError;
use crate::registry::TableRegistry;
use crate::table::TableDefinition;

/// Builds and validates a registry from a parsed schema file.
pub fn registry_from_schema(schema: SchemaFile) -> Result<TableRegistry, AdminError> {
    validate_schema(&schema)?;

    let mut registry = TableRegistry::new();
    for table_schema in schema.tables {
        let fk_display_field = table_schema
            .fk_display_field
            .unwrap_or_else(|| table_schema.primary_key.clone());
        let mut table = TableDefinition::new(
            table_schema.name,
            table_schema.primary_key,
            fk_display_field,
            table_schema.display_settings,
        );
        for field in table_schema.fields {
            table.add_field(field)?;
        }
        table.render_order = table_schema.render_order;
        registry.register(table)?;
    }

    registry.validate()?;
    Ok(registry)
}

/// Parses a JSON schema document into a validated registry.
pub fn load_schema_from_str(json: &str) -> Result<TableRegistry, AdminError> {
    let schema: SchemaFile = serde_json::from_str(json)?;
    registry_from_schema(schema)
}

/// Reads a JSON schema file into a validated registry.
///
/// # Arguments
/// * `path` - Path to the schema file
///
/// # Returns
/// `Result<TableRegistry, AdminError>` with I/O, parse and validation
/// failures reported as errors.
pub fn load_schema_from_path(path: impl AsRef<Path>) -> Result<TableRegistry, AdminError> {
    let path = path.as_ref();
    let json = fs::read_to_string(path)?;
    let registry = load_schema_from_str(&json)?;
    tracing::info!(
        "Loaded {} tables from schema {}",
        registry.len(),
        path.display()
    );
    Ok(registry)
}
