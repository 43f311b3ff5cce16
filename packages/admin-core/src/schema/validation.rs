//! Structural checks on a parsed schema file.

use std::collections::HashSet;

use super::{SchemaFile, TableSchema, SCHEMA_VERSION};
use crate::error::AdminError;

/// Validates a schema file before it is turned into a registry.
///
/// # Arguments
/// * `schema` - Parsed schema file
///
/// # Returns
/// `Result<(), AdminError>` indicating success or validation failure.
pub(crate) fn validate_schema(schema: &SchemaFile) -> Result<(), AdminError> {
    if schema.version > SCHEMA_VERSION {
        return Err(AdminError::Validation(format!(
            "Unsupported schema version {} (expected at most {})",
            schema.version, SCHEMA_VERSION
        )));
    }

    let mut seen_tables = HashSet::new();
    for table in &schema.tables {
        if !seen_tables.insert(table.name.as_str()) {
            return Err(AdminError::TableAlreadyExists(table.name.clone()));
        }
        validate_table_schema(table)?;
    }

    Ok(())
}

fn validate_table_schema(table: &TableSchema) -> Result<(), AdminError> {
    if table.name.trim().is_empty() {
        return Err(AdminError::Validation("Table with empty name".to_string()));
    }
    if table.fields.is_empty() {
        return Err(AdminError::Validation(format!(
            "Table '{}' declares no fields",
            table.name
        )));
    }
    for field in &table.fields {
        if field.name.trim().is_empty() {
            return Err(AdminError::Validation(format!(
                "Field with empty name in table '{}'",
                table.name
            )));
        }
    }
    Ok(())
}
