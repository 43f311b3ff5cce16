//! HTTP endpoint implementations.

mod ajax_handlers;
mod grid_handlers;
pub mod request_utils;
pub mod response;
mod schema_handlers;

pub use ajax_handlers::ajax;
pub use grid_handlers::{calendar, grid, rest};
pub use response::{error_response, success_response, ApiError, ApiResponse, ErrorResponse};
pub use schema_handlers::{get_table, list_tables};
