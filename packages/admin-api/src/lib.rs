//! HTTP front end of the admin panel.
//!
//! Routes AJAX dispatch, grid listing, calendar and schema endpoints to the
//! runtime worker over its request channel.

pub mod handlers;
pub mod router;
pub mod server;
