//! The `{result, displayMessage, operationResults}` contract of CRUD
//! responses.

use serde::{Serialize, Serializer};

/// Outcome code: `1` all passed, `0` some passed, `-1` none passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultCode {
    Passed,
    PartialFailure,
    Failed,
}

impl ResultCode {
    pub fn as_i8(&self) -> i8 {
        match self {
            ResultCode::Passed => 1,
            ResultCode::PartialFailure => 0,
            ResultCode::Failed => -1,
        }
    }

    /// Combined code of several operations.
    pub fn combine(passed: usize, total: usize) -> Self {
        if passed == total {
            ResultCode::Passed
        } else if passed == 0 {
            ResultCode::Failed
        } else {
            ResultCode::PartialFailure
        }
    }
}

impl Serialize for ResultCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i8(self.as_i8())
    }
}

/// Result of one operation within a request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationResult {
    pub result: ResultCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub display_message: String,
    /// JSON of the affected record
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl OperationResult {
    pub fn passed(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            result: ResultCode::Passed,
            id: Some(id.into()),
            display_message: message.into(),
            display_content: None,
            error_code: None,
        }
    }

    pub fn failed(id: Option<String>, message: impl Into<String>, error_code: impl Into<String>) -> Self {
        Self {
            result: ResultCode::Failed,
            id,
            display_message: message.into(),
            display_content: None,
            error_code: Some(error_code.into()),
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.display_content = Some(content.into());
        self
    }
}

/// Response of a CRUD action.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestResult {
    pub result: ResultCode,
    pub display_message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub operation_results: Vec<OperationResult>,
}

impl RequestResult {
    pub fn passed(message: impl Into<String>) -> Self {
        Self {
            result: ResultCode::Passed,
            display_message: message.into(),
            operation_results: Vec::new(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            result: ResultCode::Failed,
            display_message: message.into(),
            operation_results: Vec::new(),
        }
    }

    pub fn with_operation(mut self, operation: OperationResult) -> Self {
        self.operation_results.push(operation);
        self
    }

    pub fn is_passed(&self) -> bool {
        self.result == ResultCode::Passed
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_else(|e| {
            serde_json::json!({"result": -1, "displayMessage": e.to_string()})
        })
    }
}
