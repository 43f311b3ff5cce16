//! Matchit routing configuration.

use std::sync::Arc;

use admin_core::config::AdminConfig;
use admin_runtime::ApiRequest;
use hyper::{body::Bytes, Method, Request, Response};
use matchit::Router as MatchitRouter;
use tokio::sync::mpsc;

use crate::handlers;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Panel configuration
    pub config: Arc<AdminConfig>,
    /// API request sender to runtime
    pub api_tx: mpsc::Sender<ApiRequest>,
}

/// HTTP request router.
pub struct Router {
    inner: MatchitRouter<RouteHandler>,
    state: AppState,
}

impl Router {
    /// Creates a new router with default routes.
    pub fn new(config: Arc<AdminConfig>, api_tx: mpsc::Sender<ApiRequest>) -> Self {
        let routes = [
            ("/ajax", RouteHandler::Ajax),
            ("/grid", RouteHandler::Grid),
            ("/rest", RouteHandler::Rest),
            ("/calendar", RouteHandler::Calendar),
            ("/tables", RouteHandler::Tables),
            ("/tables/{name}", RouteHandler::Tables),
        ];
        let mut router = MatchitRouter::new();
        for (path, handler) in routes {
            // Paths are static and distinct
            if let Err(e) = router.insert(path, handler) {
                tracing::error!("Failed to insert route {}: {}", path, e);
            }
        }

        Self {
            inner: router,
            state: AppState { config, api_tx },
        }
    }

    /// Routes an incoming request to the appropriate handler.
    ///
    /// # Arguments
    /// * `req` - HTTP request
    ///
    /// # Returns
    /// `Result<Response<Bytes>, RouterError>` containing the response or an error.
    pub async fn route(
        &self,
        req: Request<hyper::body::Incoming>,
    ) -> Result<Response<Bytes>, RouterError> {
        let path = req.uri().path().to_string();

        match self.inner.at(&path) {
            Ok(matched) => {
                tracing::debug!("{} {}", req.method(), path);
                let handler = *matched.value;
                let name = matched.params.get("name").map(str::to_string);
                handler.handle(req, name, self.state.clone()).await
            }
            Err(_) => Err(RouterError::NotFound(format!("No route found for {}", path))),
        }
    }
}

/// Route handler function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RouteHandler {
    Ajax,
    Grid,
    Rest,
    Calendar,
    Tables,
}

impl RouteHandler {
    /// Handles a request with the given route parameters.
    async fn handle(
        &self,
        req: Request<hyper::body::Incoming>,
        name: Option<String>,
        state: AppState,
    ) -> Result<Response<Bytes>, RouterError> {
        let method = req.method().clone();
        match (self, method) {
            (RouteHandler::Ajax, Method::GET | Method::POST) => handlers::ajax(req, state).await,
            (RouteHandler::Grid, Method::GET | Method::POST) => handlers::grid(req, state).await,
            (RouteHandler::Rest, Method::GET) => handlers::rest(req, state).await,
            (RouteHandler::Calendar, Method::GET) => handlers::calendar(req, state).await,
            (RouteHandler::Tables, Method::GET) => match name {
                Some(name) => handlers::get_table(name, state).await,
                None => handlers::list_tables(state).await,
            },
            _ => Err(RouterError::MethodNotAllowed),
        }
    }
}

/// Router error type.
#[derive(Debug, Clone, PartialEq)]
pub enum RouterError {
    MethodNotAllowed,
    InternalError(String),
    Timeout,
    BadRequest(String),
    NotFound(String),
    Unauthorized,
    NotImplemented(String),
}

impl RouterError {
    /// HTTP status code of the error.
    pub fn status(&self) -> u16 {
        match self {
            RouterError::MethodNotAllowed => 405,
            RouterError::InternalError(_) => 500,
            RouterError::Timeout => 408,
            RouterError::BadRequest(_) => 400,
            RouterError::NotFound(_) => 404,
            RouterError::Unauthorized => 401,
            RouterError::NotImplemented(_) => 501,
        }
    }

    /// Variant name reported as `error.kind`.
    pub fn kind(&self) -> &'static str {
        match self {
            RouterError::MethodNotAllowed => "MethodNotAllowed",
            RouterError::InternalError(_) => "InternalError",
            RouterError::Timeout => "Timeout",
            RouterError::BadRequest(_) => "BadRequest",
            RouterError::NotFound(_) => "NotFound",
            RouterError::Unauthorized => "Unauthorized",
            RouterError::NotImplemented(_) => "NotImplemented",
        }
    }
}

impl std::fmt::Display for RouterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RouterError::MethodNotAllowed => write!(f, "Method Not Allowed"),
            RouterError::InternalError(msg) => write!(f, "Internal Error: {}", msg),
            RouterError::Timeout => write!(f, "Request Timeout"),
            RouterError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            RouterError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            RouterError::Unauthorized => write!(f, "Unauthorized"),
            RouterError::NotImplemented(msg) => write!(f, "Not Implemented: {}", msg),
        }
    }
}

impl std::error::Error for RouterError {}

impl From<RouterError> for Response<Bytes> {
    fn from(err: RouterError) -> Self {
        let status = err.status();
        let message = match &err {
            RouterError::InternalError(msg)
            | RouterError::BadRequest(msg)
            | RouterError::NotFound(msg)
            | RouterError::NotImplemented(msg) => msg.clone(),
            other => other.to_string(),
        };

        let error_response = handlers::error_response(status, err.kind(), message);
        let body = serde_json::to_vec(&error_response).unwrap_or_else(|e| {
            format!(
                "{{\"success\":false,\"result\":-1,\"displayMessage\":\"Failed to serialize error\",\"error\":{{\"code\":\"500\",\"kind\":\"InternalError\",\"message\":\"Failed to serialize error: {}\"}}}}",
                e
            )
            .into_bytes()
        });

        let mut response = Response::new(Bytes::from(body));
        *response.status_mut() =
            hyper::StatusCode::from_u16(status).unwrap_or(hyper::StatusCode::INTERNAL_SERVER_ERROR);
        response.headers_mut().insert(
            hyper::header::CONTENT_TYPE,
            hyper::header::HeaderValue::from_static("application/json"),
        );
        response
    }
}
