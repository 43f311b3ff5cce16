//! Request utilities for HTTP endpoints.

use admin_core::error::AdminError;
use admin_runtime::{ApiRequest, Params, Reply};
use http_body_util::BodyExt;
use hyper::header::{HeaderMap, CONTENT_TYPE};
use hyper::{body::Bytes, Request, Response};
use percent_encoding::percent_decode_str;
use tokio::sync::oneshot;
use tokio::time;

use crate::router::{AppState, RouterError};

/// Header carrying the authenticated user set by the fronting proxy
pub const USER_HEADER: &str = "x-admin-user";

/// Header carrying the requested language
pub const LANGUAGE_HEADER: &str = "accept-language";

/// Helper function to read request body with timeout
pub async fn read_request_body_with_timeout(
    req: Request<hyper::body::Incoming>,
    timeout_ms: u64,
) -> Result<Bytes, RouterError> {
    let timeout_duration = time::Duration::from_millis(timeout_ms);
    let body = time::timeout(timeout_duration, req.collect())
        .await
        .map_err(|_| RouterError::Timeout)?
        .map_err(|e| RouterError::InternalError(format!("Failed to read request body: {}", e)))?;
    Ok(body.to_bytes())
}

/// Helper function to wait for response with timeout
pub async fn wait_for_response_with_timeout<T>(
    rx: oneshot::Receiver<T>,
    timeout_ms: u64,
) -> Result<T, RouterError> {
    let timeout_duration = time::Duration::from_millis(timeout_ms);
    time::timeout(timeout_duration, rx)
        .await
        .map_err(|_| RouterError::Timeout)?
        .map_err(|e| RouterError::InternalError(format!("Response channel closed: {}", e)))
}

/// Sends a request to the runtime and waits for its reply.
///
/// # Arguments
/// * `state` - Shared state holding the runtime channel
/// * `build` - Wraps the response sender into the request
pub async fn call_runtime<F>(state: &AppState, build: F) -> Result<Reply, RouterError>
where
    F: FnOnce(admin_runtime::ResponseSender) -> ApiRequest,
{
    let (tx, rx) = oneshot::channel();
    state
        .api_tx
        .send(build(tx))
        .await
        .map_err(|e| RouterError::InternalError(format!("Channel closed: {}", e)))?;
    let result = wait_for_response_with_timeout(rx, state.config.response_timeout_ms).await?;
    result.map_err(map_admin_error_to_router_error)
}

/// Map AdminError to appropriate RouterError
pub fn map_admin_error_to_router_error(e: AdminError) -> RouterError {
    match e {
        AdminError::TableNotFound { .. }
        | AdminError::FieldNotFound { .. }
        | AdminError::RecordNotFound { .. } => RouterError::NotFound(e.to_string()),
        AdminError::UnknownAction(_)
        | AdminError::MissingObject(_)
        | AdminError::InvalidParameter { .. }
        | AdminError::Validation(_)
        | AdminError::UnknownFieldType(_)
        | AdminError::FieldAlreadyExists { .. }
        | AdminError::TableAlreadyExists(_)
        | AdminError::DanglingForeignKey { .. } => RouterError::BadRequest(e.to_string()),
        AdminError::HandlerNotDeclared { .. } => RouterError::NotImplemented(e.to_string()),
        AdminError::Unauthenticated => RouterError::Unauthorized,
        AdminError::Timeout => RouterError::Timeout,
        AdminError::Serialization(_) | AdminError::Io(_) => {
            RouterError::InternalError(format!("Runtime error: {}", e))
        }
    }
}

/// Decodes `application/x-www-form-urlencoded` pairs. `+` is a space;
/// pairs without `=` carry an empty value. Later duplicates win.
pub fn parse_form(input: &str) -> Params {
    let mut params = Params::new();
    for pair in input.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        params.insert(decode_component(key), decode_component(value));
    }
    params
}

fn decode_component(raw: &str) -> String {
    percent_decode_str(&raw.replace('+', " "))
        .decode_utf8_lossy()
        .into_owned()
}

/// Parameters of a request: the query string, overlaid with a form body.
///
/// # Returns
/// `Err(RouterError::BadRequest)` when a body is sent with a content type
/// other than form encoding.
pub fn merge_params(
    query: Option<&str>,
    content_type: Option<&str>,
    body: &[u8],
) -> Result<Params, RouterError> {
    let mut params = parse_form(query.unwrap_or_default());
    if body.is_empty() {
        return Ok(params);
    }
    let is_form = content_type
        .map(|ct| ct.starts_with("application/x-www-form-urlencoded"))
        .unwrap_or(true);
    if !is_form {
        return Err(RouterError::BadRequest(format!(
            "Unsupported content type '{}'",
            content_type.unwrap_or_default()
        )));
    }
    let body = std::str::from_utf8(body)
        .map_err(|e| RouterError::BadRequest(format!("Body is not UTF-8: {}", e)))?;
    params.extend(parse_form(body));
    Ok(params)
}

/// Decoded parameters plus the caller's identity.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestParams {
    pub params: Params,
    /// Authenticated user from [`USER_HEADER`]
    pub user: Option<String>,
}

/// Reads query and body parameters of a request. The primary language of
/// `Accept-Language` fills `lang` when the parameters do not name one.
pub async fn read_params(
    req: Request<hyper::body::Incoming>,
    timeout_ms: u64,
) -> Result<RequestParams, RouterError> {
    let query = req.uri().query().map(str::to_string);
    let content_type = header(req.headers(), CONTENT_TYPE.as_str());
    let user = header(req.headers(), USER_HEADER);
    let language = header(req.headers(), LANGUAGE_HEADER).and_then(|l| primary_language(&l));
    let body = read_request_body_with_timeout(req, timeout_ms).await?;
    let mut params = merge_params(query.as_deref(), content_type.as_deref(), &body)?;
    if let Some(language) = language {
        params.entry("lang".to_string()).or_insert(language);
    }
    Ok(RequestParams { params, user })
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// First language tag of an `Accept-Language` value, without region.
fn primary_language(value: &str) -> Option<String> {
    let tag = value.split(',').next()?.split(';').next()?.trim();
    let primary = tag.split('-').next()?.to_ascii_lowercase();
    (!primary.is_empty() && primary != "*").then_some(primary)
}

/// Helper to build HTTP response with proper error handling
pub fn build_response(
    status: u16,
    content_type: &str,
    body: Vec<u8>,
) -> Result<Response<Bytes>, RouterError> {
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, content_type)
        .body(Bytes::from(body))
        .map_err(|e| RouterError::InternalError(format!("Failed to build response: {}", e)))
}

/// 200 response carrying a runtime reply.
pub fn reply_response(reply: Reply) -> Result<Response<Bytes>, RouterError> {
    let content_type = reply.content_type();
    build_response(200, content_type, reply.into_body().into_bytes())
}
