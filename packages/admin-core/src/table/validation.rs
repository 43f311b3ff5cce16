//! Validation of a table definition against the rest of the schema.

use super::table::TableDefinition;
use crate::error::AdminError;

/// Validates that the primary key and FK display field name real fields.
pub(crate) fn validate_key_fields(table: &TableDefinition) -> Result<(), AdminError> {
    table.primary_key_field()?;
    table.fk_display_field()?;
    Ok(())
}

/// Validates every foreign key against the set of known tables.
///
/// # Arguments
/// * `table` - Table whose foreign keys are checked
/// * `lookup` - Resolves a table name to its definition
pub(crate) fn validate_foreign_keys<'a, F>(
    table: &TableDefinition,
    lookup: F,
) -> Result<(), AdminError>
where
    F: Fn(&str) -> Option<&'a TableDefinition>,
{
    for field in table.fields.values() {
        let Some(fk) = &field.foreign_key else {
            continue;
        };
        let target_ok = lookup(&fk.other_table)
            .map(|other| other.fields.contains_key(&fk.other_field))
            .unwrap_or(false);
        if !target_ok {
            return Err(AdminError::DanglingForeignKey {
                table: table.name.clone(),
                field: field.name.clone(),
                other_table: fk.other_table.clone(),
                other_field: fk.other_field.clone(),
            });
        }
    }
    Ok(())
}
