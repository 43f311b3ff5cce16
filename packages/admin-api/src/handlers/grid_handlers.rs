//! Grid listing, record feed and calendar endpoints.

use admin_runtime::{ApiRequest, CalendarRequest, GridRequest};
use hyper::{body::Bytes, Request, Response};

use crate::router::{AppState, RouterError};

use super::request_utils::{
    call_runtime, map_admin_error_to_router_error, read_params, reply_response, RequestParams,
};

fn grid_request(input: RequestParams, state: &AppState) -> Result<GridRequest, RouterError> {
    let mut request = GridRequest::from_params(&input.params, state.config.default_page_size)
        .map_err(map_admin_error_to_router_error)?;
    request.user = input.user;
    Ok(request)
}

/// Lists one page of a table.
///
/// # Endpoint
/// `GET|POST /grid?object=Task&page=1&rows=20&sidx=title&sord=asc`
///
/// Quick search adds `field`, `value`, `searchoption` and `searchtype`
/// (`fk`, `en`, `dt`, `bl`) with the matching `fkValue`, `enumValue` or
/// `datepickervalue`. `format=html` renders cells as markup.
///
/// # Response
/// ```json
/// {"page": 1, "total": 3, "records": 42, "rows": [{"id": "1", "cell": [...]}]}
/// ```
pub async fn grid(
    req: Request<hyper::body::Incoming>,
    state: AppState,
) -> Result<Response<Bytes>, RouterError> {
    let input = read_params(req, state.config.request_timeout_ms).await?;
    let request = grid_request(input, &state)?;
    let reply = call_runtime(&state, |response| ApiRequest::Grid { request, response }).await?;
    reply_response(reply)
}

/// Records of one grid page, one JSON object per line.
///
/// # Endpoint
/// `GET /rest?object=Task&rows=100`
pub async fn rest(
    req: Request<hyper::body::Incoming>,
    state: AppState,
) -> Result<Response<Bytes>, RouterError> {
    let input = read_params(req, state.config.request_timeout_ms).await?;
    let request = grid_request(input, &state)?;
    let reply = call_runtime(&state, |response| ApiRequest::Rest { request, response }).await?;
    reply_response(reply)
}

/// Calendar events.
///
/// # Endpoint
/// `GET /calendar?object=ALL` or `GET /calendar?object=Task,Meeting`
pub async fn calendar(
    req: Request<hyper::body::Incoming>,
    state: AppState,
) -> Result<Response<Bytes>, RouterError> {
    let input = read_params(req, state.config.request_timeout_ms).await?;
    let mut request = CalendarRequest::from_params(&input.params);
    request.user = input.user;
    let reply = call_runtime(&state, |response| ApiRequest::Calendar { request, response }).await?;
    reply_response(reply)
}
