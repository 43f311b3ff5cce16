//! Schema file format and loading.

mod loader;
mod validation;

pub use loader::{load_schema_from_path, load_schema_from_str, registry_from_schema};

use serde::{Deserialize, Serialize};

use crate::display::DisplaySettings;
use crate::table::{FieldDefinition, RenderOrderEntry};

/// Current schema file version.
pub const SCHEMA_VERSION: u32 = 1;

fn default_version() -> u32 {
    SCHEMA_VERSION
}

/// Schema file format.
#[derive(Debug, Serialize, Deserialize)]
pub struct SchemaFile {
    /// Schema version
    #[serde(default = "default_version")]
    pub version: u32,
    /// Table definitions in declaration order
    pub tables: Vec<TableSchema>,
}

/// Table entry of a schema file.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSchema {
    /// Table name
    pub name: String,
    /// Primary key field name
    pub primary_key: String,
    /// Field shown by foreign key selects; defaults to the primary key
    #[serde(default)]
    pub fk_display_field: Option<String>,
    /// Table-level display settings
    #[serde(default)]
    pub display_settings: DisplaySettings,
    /// Field definitions in declaration order
    pub fields: Vec<FieldDefinition>,
    /// Explicit render order
    #[serde(default)]
    pub render_order: Vec<RenderOrderEntry>,
}
