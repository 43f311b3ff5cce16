//! JSON envelopes of the HTTP front end.
//!
//! Failures carry the same `result`/`displayMessage` pair as CRUD replies,
//! so the browser reports a routing failure the way it reports a rejected
//! save.

use admin_runtime::ResultCode;
use serde::Serialize;

/// Envelope of a JSON endpoint that answered.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

/// Machine-readable part of a failure.
#[derive(Debug, Serialize)]
pub struct ApiError {
    /// HTTP status as a string.
    pub code: String,
    /// Failure class such as `NotFound` or `BadRequest`.
    pub kind: &'static str,
    pub message: String,
}

/// Envelope of a failed request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub success: bool,
    /// Always [`ResultCode::Failed`].
    pub result: ResultCode,
    pub display_message: String,
    pub error: ApiError,
}

pub fn success_response<T: Serialize>(data: T) -> ApiResponse<T> {
    ApiResponse {
        success: true,
        data,
    }
}

pub fn error_response(code: u16, kind: &'static str, message: String) -> ErrorResponse {
    ErrorResponse {
        success: false,
        result: ResultCode::Failed,
        display_message: message.clone(),
        error: ApiError {
            code: code.to_string(),
            kind,
            message,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_envelope_matches_crud_failure_shape() {
        let body = serde_json::to_value(error_response(
            400,
            "BadRequest",
            "Missing 'object'".to_string(),
        ))
        .unwrap();
        assert_eq!(
            body,
            json!({
                "success": false,
                "result": -1,
                "displayMessage": "Missing 'object'",
                "error": {"code": "400", "kind": "BadRequest", "message": "Missing 'object'"}
            })
        );
    }

    #[test]
    fn test_success_envelope() {
        let body = serde_json::to_value(success_response(vec!["Task"])).unwrap();
        assert_eq!(body, json!({"success": true, "data": ["Task"]}));
    }
}
