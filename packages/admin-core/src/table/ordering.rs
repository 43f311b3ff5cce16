//! Render order resolution.

use std::collections::HashSet;

use super::field::FieldDefinition;
use super::table::TableDefinition;

/// Resolves the render order of a table's fields.
///
/// Explicit entries come from the table's `render_order` list followed by
/// any field carrying a `displayIndex` property. They are sorted ascending
/// by index; fields sharing an index keep their declaration order. Entries
/// naming absent fields are skipped and a field named twice keeps its first
/// resolved position. Every remaining field follows in declaration order.
///
/// # Returns
/// A permutation of the table's fields.
pub fn order_columns(table: &TableDefinition) -> Vec<&FieldDefinition> {
    let mut entries: Vec<(&str, i64)> = table
        .render_order
        .iter()
        .map(|entry| (entry.column.as_str(), entry.index))
        .collect();
    entries.extend(table.fields.values().filter_map(|field| {
        let index = field.display_settings.property("displayIndex")?;
        let index = index
            .as_i64()
            .or_else(|| index.as_str().and_then(|s| s.trim().parse().ok()))?;
        Some((field.name.as_str(), index))
    }));
    // Absent fields sort last within their index and are dropped below
    entries.sort_by_key(|(column, index)| {
        (*index, table.fields.get_index_of(*column).unwrap_or(usize::MAX))
    });

    let mut seen = HashSet::with_capacity(table.fields.len());
    let mut ordered = Vec::with_capacity(table.fields.len());

    for (column, _) in entries {
        match table.fields.get(column) {
            Some(field) if seen.insert(field.name.as_str()) => ordered.push(field),
            Some(_) => {}
            None => tracing::debug!(
                "Ignoring render order entry '{}' absent from table '{}'",
                column,
                table.name
            ),
        }
    }

    for field in table.fields.values() {
        if seen.insert(field.name.as_str()) {
            ordered.push(field);
        }
    }

    ordered
}
