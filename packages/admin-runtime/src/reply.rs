//! Reply bodies produced by the runtime.

use serde_json::Value;

/// Body of a dispatched request.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// JSON document
    Json(Value),
    /// HTML fragment
    Html(String),
    /// Plain text, e.g. newline-delimited JSON or a textarea-wrapped result
    Text(String),
}

impl Reply {
    pub fn content_type(&self) -> &'static str {
        match self {
            Reply::Json(_) => "application/json",
            Reply::Html(_) => "text/html; charset=utf-8",
            Reply::Text(_) => "text/plain; charset=utf-8",
        }
    }

    pub fn into_body(self) -> String {
        match self {
            Reply::Json(value) => value.to_string(),
            Reply::Html(s) | Reply::Text(s) => s,
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Reply::Json(value) => Some(value),
            _ => None,
        }
    }
}
