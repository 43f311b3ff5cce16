//! Table definition: one entity of the schema.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::field::FieldDefinition;
use crate::display::{DisplaySettings, Label};
use crate::error::AdminError;

/// Explicit render position of one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderOrderEntry {
    /// Column name; entries naming absent fields are ignored
    pub column: String,
    /// Ascending sort key
    pub index: i64,
}

/// Schema of one entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableDefinition {
    /// Table name
    pub name: String,
    /// Name of the primary key field
    pub primary_key: String,
    /// Fields in declaration order
    pub fields: IndexMap<String, FieldDefinition>,
    /// Table-level labels and properties
    pub display_settings: DisplaySettings,
    /// Field shown when another table refers to this one
    pub fk_display_field: String,
    /// Explicit render order overriding declaration order
    pub render_order: Vec<RenderOrderEntry>,
}

impl TableDefinition {
    /// Creates an empty table definition.
    ///
    /// # Arguments
    /// * `name` - Table name
    /// * `primary_key` - Primary key field name
    /// * `fk_display_field` - Field shown by foreign key selects
    /// * `display_settings` - Table-level display settings
    pub fn new(
        name: impl Into<String>,
        primary_key: impl Into<String>,
        fk_display_field: impl Into<String>,
        display_settings: DisplaySettings,
    ) -> Self {
        Self {
            name: name.into(),
            primary_key: primary_key.into(),
            fields: IndexMap::new(),
            display_settings,
            fk_display_field: fk_display_field.into(),
            render_order: Vec::new(),
        }
    }

    /// Appends a field in declaration order.
    ///
    /// # Returns
    /// `Err(AdminError::FieldAlreadyExists)` when the name is taken.
    pub fn add_field(&mut self, field: FieldDefinition) -> Result<(), AdminError> {
        if self.fields.contains_key(&field.name) {
            return Err(AdminError::FieldAlreadyExists {
                table: self.name.clone(),
                field: field.name,
            });
        }
        self.fields.insert(field.name.clone(), field);
        Ok(())
    }

    /// Builder form of [`TableDefinition::add_field`].
    pub fn with_field(mut self, field: FieldDefinition) -> Result<Self, AdminError> {
        self.add_field(field)?;
        Ok(self)
    }

    /// Adds an explicit render order entry.
    pub fn with_render_order(mut self, column: impl Into<String>, index: i64) -> Self {
        self.render_order.push(RenderOrderEntry {
            column: column.into(),
            index,
        });
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.get(name)
    }

    /// Gets a field or reports it missing.
    pub fn get_field(&self, name: &str) -> Result<&FieldDefinition, AdminError> {
        self.fields.get(name).ok_or_else(|| AdminError::FieldNotFound {
            table: self.name.clone(),
            field: name.to_string(),
        })
    }

    /// Primary key field definition.
    pub fn primary_key_field(&self) -> Result<&FieldDefinition, AdminError> {
        self.get_field(&self.primary_key)
    }

    /// Foreign key display field definition.
    pub fn fk_display_field(&self) -> Result<&FieldDefinition, AdminError> {
        self.get_field(&self.fk_display_field)
    }

    pub fn has_label(&self, label: &Label) -> bool {
        self.display_settings.has_label(label)
    }

    /// Fields carrying the given label, in declaration order.
    pub fn fields_with_label<'a>(
        &'a self,
        label: &'a Label,
    ) -> impl Iterator<Item = &'a FieldDefinition> + 'a {
        self.fields.values().filter(move |f| f.has_label(label))
    }
}
