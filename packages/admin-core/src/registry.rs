//! Table registry: the schema shared read-only by every request.

use indexmap::IndexMap;

use crate::display::Label;
use crate::error::AdminError;
use crate::table::{validation, TableDefinition};

/// Map of table name to table definition.
///
/// Built once at start, validated with [`TableRegistry::validate`], then
/// shared behind `Arc` without further mutation.
#[derive(Debug, Clone, Default)]
pub struct TableRegistry {
    /// Table definitions in registration order
    tables: IndexMap<String, TableDefinition>,
}

impl TableRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a table definition.
    ///
    /// # Arguments
    /// * `table` - Table definition
    ///
    /// # Returns
    /// `Result<(), AdminError>` failing when the name is already taken.
    pub fn register(&mut self, table: TableDefinition) -> Result<(), AdminError> {
        if self.tables.contains_key(&table.name) {
            return Err(AdminError::TableAlreadyExists(table.name));
        }
        tracing::debug!("Registered table '{}'", table.name);
        self.tables.insert(table.name.clone(), table);
        Ok(())
    }

    /// Gets a table definition by name.
    ///
    /// # Returns
    /// `Err(AdminError::TableNotFound)` for unknown names.
    pub fn get(&self, name: &str) -> Result<&TableDefinition, AdminError> {
        self.tables.get(name).ok_or_else(|| AdminError::TableNotFound {
            table: name.to_string(),
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Table names in registration order.
    pub fn table_names(&self) -> Vec<String> {
        self.tables.keys().cloned().collect()
    }

    pub fn tables(&self) -> impl Iterator<Item = &TableDefinition> {
        self.tables.values()
    }

    /// Tables carrying the given table-level label.
    pub fn tables_with_label<'a>(
        &'a self,
        label: &'a Label,
    ) -> impl Iterator<Item = &'a TableDefinition> + 'a {
        self.tables.values().filter(move |t| t.has_label(label))
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Validates the whole registry.
    ///
    /// Checks that every primary key and FK display field names a real
    /// field and that every foreign key points at an existing table field.
    pub fn validate(&self) -> Result<(), AdminError> {
        for table in self.tables.values() {
            validation::validate_key_fields(table)?;
            validation::validate_foreign_keys(table, |name| self.tables.get(name))?;
        }
        tracing::debug!("Validated {} tables", self.tables.len());
        Ok(())
    }
}
