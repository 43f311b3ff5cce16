//! Table definition endpoints.

use admin_runtime::ApiRequest;
use hyper::{body::Bytes, Response};

use crate::router::{AppState, RouterError};

use super::request_utils::{build_response, call_runtime};
use super::response::success_response;

fn json_response(data: serde_json::Value) -> Result<Response<Bytes>, RouterError> {
    let json = serde_json::to_vec(&success_response(data))
        .map_err(|e| RouterError::InternalError(format!("Failed to serialize response: {}", e)))?;
    build_response(200, "application/json", json)
}

/// Lists registered table names.
///
/// # Endpoint
/// `GET /tables`
///
/// # Response
/// ```json
/// {"success": true, "data": ["Project", "Task"]}
/// ```
pub async fn list_tables(state: AppState) -> Result<Response<Bytes>, RouterError> {
    let reply = call_runtime(&state, |response| ApiRequest::ListTables { response }).await?;
    json_response(reply.as_json().cloned().unwrap_or_default())
}

/// Returns one table definition.
///
/// # Endpoint
/// `GET /tables/{name}`
///
/// # Errors
/// - **404 Not Found**: Table not registered
pub async fn get_table(name: String, state: AppState) -> Result<Response<Bytes>, RouterError> {
    let reply = call_runtime(&state, |response| ApiRequest::GetTable { name, response }).await?;
    json_response(reply.as_json().cloned().unwrap_or_default())
}
