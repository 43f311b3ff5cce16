//! Foreign key option lists and display values of referenced rows.

use admin_core::fk::FkOption;
use admin_core::record::{value_text, Record};
use admin_core::registry::TableRegistry;
use admin_core::table::TableDefinition;
use admin_core::template::DisplayTemplate;
use serde_json::Value;

use crate::dao::DaoRegistry;
use crate::Result;

/// Label of a row: the table's `fkDisplay` template when declared,
/// otherwise its FK display field.
pub(crate) fn display_label(
    registry: &TableRegistry,
    daos: &DaoRegistry,
    table: &TableDefinition,
    record: &Record,
) -> String {
    match table.display_settings.property_str("fkDisplay") {
        Some(template) => DisplayTemplate::parse(&template).render(record, |field, other_field| {
            let fk = table.field(field)?.foreign_key.as_ref()?;
            let id = record.get(field).filter(|v| !v.is_null())?;
            let other = registry.get(&fk.other_table).ok()?;
            let row = daos.get(&other.name).ok()?.get(&value_text(id)).ok()?;
            row.get(other_field).map(value_text)
        }),
        None => record
            .get(&table.fk_display_field)
            .map(value_text)
            .unwrap_or_default(),
    }
}

/// Every row of `table` as an `{id, val}` option, in storage order.
pub(crate) fn fk_options(
    registry: &TableRegistry,
    daos: &DaoRegistry,
    table: &str,
) -> Result<Vec<FkOption>> {
    let definition = registry.get(table)?;
    let rows = daos.get(table)?.get_all()?;
    Ok(rows
        .iter()
        .map(|row| {
            let id = row
                .get(&definition.primary_key)
                .map(value_text)
                .unwrap_or_default();
            FkOption::new(id, display_label(registry, daos, definition, row))
        })
        .collect())
}

/// Display value of the row a foreign key value points at. `None` when
/// the value is null or the row is gone.
pub(crate) fn linked_display(
    registry: &TableRegistry,
    daos: &DaoRegistry,
    other_table: &str,
    id: &Value,
) -> Option<String> {
    if id.is_null() {
        return None;
    }
    let definition = registry.get(other_table).ok()?;
    let row = daos.get(other_table).ok()?.get(&value_text(id)).ok()?;
    Some(display_label(registry, daos, definition, &row))
}
