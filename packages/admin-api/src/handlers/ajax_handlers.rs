//! CRUD dispatch endpoint.

use admin_runtime::{AjaxRequest, ApiRequest};
use hyper::{body::Bytes, Request, Response};

use crate::router::{AppState, RouterError};

use super::request_utils::{
    call_runtime, map_admin_error_to_router_error, read_params, reply_response,
};

/// Dispatches `(object, jackaction)` to the runtime.
///
/// # Endpoint
/// `GET|POST /ajax`
///
/// # Request
/// Form-encoded parameters in the query string or body:
/// `object=Task&jackaction=create&title=Fix+bug`. The legacy `action`
/// key is read when `jackaction` is absent; `wta=1` wraps the reply in a
/// `<textarea>` for iframe uploads.
///
/// # Response
/// - **200 OK**: HTML for pages, `{result, displayMessage, operationResults?}`
///   JSON for CRUD actions
///
/// # Errors
/// - **400 Bad Request**: No action, unknown action or missing object
/// - **401 Unauthorized**: Anonymous request while authentication is required
/// - **404 Not Found**: Unknown table or record
/// - **501 Not Implemented**: Upload/Send without a declared handler
///
/// # Example
/// ```bash
/// curl -X POST http://localhost:8080/ajax \
///   -d 'object=Task&jackaction=create&title=Fix+bug'
/// ```
pub async fn ajax(
    req: Request<hyper::body::Incoming>,
    state: AppState,
) -> Result<Response<Bytes>, RouterError> {
    let input = read_params(req, state.config.request_timeout_ms).await?;
    let mut request =
        AjaxRequest::from_params(input.params).map_err(map_admin_error_to_router_error)?;
    if let Some(user) = input.user {
        request = request.with_user(user);
    }

    let reply = call_runtime(&state, |response| ApiRequest::Ajax { request, response }).await?;
    reply_response(reply)
}
