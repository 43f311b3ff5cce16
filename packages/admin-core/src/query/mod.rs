//! Quick-search conditions and the fluent query used by grid listings.

mod condition;
mod select;

pub use condition::{build_condition, Comparison, Condition, QuickSearchOp};
pub use select::{Query, SortOrder};
