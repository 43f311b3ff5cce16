//! Field definition within a table.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::relation::ForeignKeyRef;
use crate::display::{DisplaySettings, Label};
use crate::types::FieldType;

/// One column of a table entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    /// Field name
    pub name: String,
    /// Column type tag
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Default value applied on create when none is submitted
    #[serde(default)]
    pub default_value: Option<Value>,
    /// Database-level NOT NULL flag
    #[serde(default)]
    pub not_null: bool,
    /// Relationship to another table's field
    #[serde(default)]
    pub foreign_key: Option<ForeignKeyRef>,
    /// Presentation labels and properties
    #[serde(default)]
    pub display_settings: DisplaySettings,
}

impl FieldDefinition {
    /// Creates a field with no default, no foreign key and empty settings.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            default_value: None,
            not_null: false,
            foreign_key: None,
            display_settings: DisplaySettings::default(),
        }
    }

    pub fn with_label(mut self, label: impl Into<Label>) -> Self {
        self.display_settings.add_label(label);
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.display_settings.add_property(key, value);
        self
    }

    pub fn with_foreign_key(mut self, fk: ForeignKeyRef) -> Self {
        self.foreign_key = Some(fk);
        self
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    pub fn has_label(&self, label: &Label) -> bool {
        self.display_settings.has_label(label)
    }

    /// Whether widgets for this field carry the `required` validation tag.
    pub fn is_required(&self) -> bool {
        self.has_label(&Label::NotNull)
    }
}
