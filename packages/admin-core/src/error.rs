//! Admin panel error types.

use thiserror::Error;

/// Errors raised by schema loading, rendering and CRUD dispatch.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AdminError {
    /// Table not found in the registry
    #[error("Table '{table}' not found")]
    TableNotFound { table: String },

    /// Field not found in table
    #[error("Field '{field}' not found in table '{table}'")]
    FieldNotFound { table: String, field: String },

    /// Field already declared on table
    #[error("Field '{field}' already exists in table '{table}'")]
    FieldAlreadyExists { table: String, field: String },

    /// Table already registered
    #[error("Table '{0}' already exists")]
    TableAlreadyExists(String),

    /// Field type tag outside the closed set
    #[error("Unknown field type '{0}'")]
    UnknownFieldType(String),

    /// Foreign key pointing at a table or field that does not exist
    #[error("Foreign key {table}.{field} references missing {other_table}.{other_field}")]
    DanglingForeignKey {
        table: String,
        field: String,
        other_table: String,
        other_field: String,
    },

    /// Action name outside the dispatch table
    #[error("Unknown action '{0}'")]
    UnknownAction(String),

    /// Request did not name a target table
    #[error("Missing object for action '{0}'")]
    MissingObject(String),

    /// Page action with no declared handler and no generic fallback
    #[error("No '{action}' handler declared for table '{table}'")]
    HandlerNotDeclared { table: String, action: String },

    /// Record not found
    #[error("Record '{id}' not found in table '{table}'")]
    RecordNotFound { table: String, id: String },

    /// Request parameter missing or malformed
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// Record values rejected by field constraints
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Request without an authenticated user
    #[error("Not authenticated")]
    Unauthenticated,

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O error while reading schema or dictionary files
    #[error("I/O error: {0}")]
    Io(String),

    /// Operation timeout
    #[error("Operation timeout")]
    Timeout,
}

impl From<serde_json::Error> for AdminError {
    fn from(e: serde_json::Error) -> Self {
        AdminError::Serialization(e.to_string())
    }
}

impl From<std::io::Error> for AdminError {
    fn from(e: std::io::Error) -> Self {
        AdminError::Io(e.to_string())
    }
}
