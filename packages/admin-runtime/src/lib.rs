//! CRUD dispatch runtime for the admin panel.
//!
//! HTTP handlers send [`ApiRequest`]s over a channel to a single
//! [`Runtime`] worker, which resolves the target table and action, calls the
//! table's DAO and answers through a oneshot channel.

use admin_core::error::AdminError;
use tokio::sync::oneshot;

mod api_handlers;
mod api_request;
mod calendar;
mod context;
mod crud;
mod dao;
mod grid;
mod options;
mod pages;
mod reply;
mod result;
mod runtime;

pub use api_handlers::ApiHandlers;
pub use api_request::{
    Action, AjaxRequest, ApiRequest, CalendarRequest, CrudAction, GlobalAction, GridRequest,
    PageAction, Params,
};
pub use calendar::{calendar_entries, CalendarEntry};
pub use context::RequestContext;
pub use dao::{DaoRegistry, MemoryDao, TableDao};
pub use grid::{list_grid, list_rest, GridCell, GridResponse, GridRow};
pub use pages::{Page, PageHandler, PageRegistry};
pub use reply::Reply;
pub use result::{OperationResult, RequestResult, ResultCode};
pub use runtime::Runtime;

/// Result type for runtime operations
pub type Result<T> = std::result::Result<T, AdminError>;

/// Response sender for API requests
pub type ResponseSender = oneshot::Sender<Result<Reply>>;
