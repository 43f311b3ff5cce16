//! Table schema, field definitions, foreign keys and column ordering.

mod field;
mod ordering;
mod relation;
#[allow(clippy::module_inception)]
mod table;
pub(crate) mod validation;

pub use field::FieldDefinition;
pub use ordering::order_columns;
pub use relation::{FkSide, ForeignKeyRef};
pub use table::{RenderOrderEntry, TableDefinition};
