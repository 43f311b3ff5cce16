//! Table metadata model and rendering dispatch for the admin panel.
//!
//! Provides field types, display settings, table definitions, column
//! ordering, edit/view/grid widget dispatch, foreign-key option caching,
//! quick-search condition building, and schema loading.

pub mod config;
pub mod display;
pub mod error;
pub mod fk;
pub mod i18n;
pub mod query;
pub mod record;
pub mod registry;
pub mod render;
pub mod schema;
pub mod submit;
pub mod table;
pub mod template;
pub mod types;

pub use error::AdminError;
pub use record::Record;
