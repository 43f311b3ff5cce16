//! Foreign key endpoint description.

use serde::{Deserialize, Serialize};

/// Which side of a relationship an endpoint sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FkSide {
    One,
    Many,
}

/// One endpoint of a relationship from a field to another table's field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForeignKeyRef {
    /// The side this field represents
    pub side: FkSide,
    /// Name of the referenced table
    pub other_table: String,
    /// Field name in the referenced table
    pub other_field: String,
    /// The side the referenced field represents
    pub other_side: FkSide,
}

impl ForeignKeyRef {
    /// Many-to-one reference, the shape used by select widgets.
    pub fn many_to_one(other_table: impl Into<String>, other_field: impl Into<String>) -> Self {
        Self {
            side: FkSide::Many,
            other_table: other_table.into(),
            other_field: other_field.into(),
            other_side: FkSide::One,
        }
    }
}
