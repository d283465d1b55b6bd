//! The JSON envelope shared by every API response.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

/// The body of every JSON response, e.g. `{"success": true, "message": "...", "data": {...}}`.
///
/// `message` and `data` are left out of the serialized JSON when they are `None`.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the request succeeded.
    pub success: bool,
    /// A human readable summary of the outcome.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// The resource(s) returned by the request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// A successful response carrying `data` and no message.
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    /// A successful response carrying both a message and `data`.
    pub fn with_message(message: &str, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.to_owned()),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    /// A successful response with only a message, e.g. after deleting something.
    pub fn message(message: &str) -> Self {
        Self {
            success: true,
            message: Some(message.to_owned()),
            data: None,
        }
    }

    /// A failed response with an error message.
    pub fn error(message: String) -> Self {
        Self {
            success: false,
            message: Some(message),
            data: None,
        }
    }
}

/// Serialize `body` as JSON with the given status code.
pub fn json_response<T: Serialize>(status: StatusCode, body: ApiResponse<T>) -> Response {
    (status, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::budget::BudgetMonth;

    use super::ApiResponse;

    #[test]
    fn omits_missing_fields() {
        let body = serde_json::to_value(ApiResponse::message("Budget deleted")).unwrap();

        assert_eq!(body, json!({"success": true, "message": "Budget deleted"}));
    }

    #[test]
    fn includes_data() {
        let body = serde_json::to_value(ApiResponse::with_message("Created", [1, 2])).unwrap();

        assert_eq!(
            body,
            json!({"success": true, "message": "Created", "data": [1, 2]})
        );
    }

    #[test]
    fn parses_error_body_without_data() {
        let body: ApiResponse<BudgetMonth> =
            serde_json::from_value(json!({"success": false, "message": "Budget not found"}))
                .unwrap();

        assert!(!body.success);
        assert_eq!(body.message.as_deref(), Some("Budget not found"));
        assert_eq!(body.data, None);
    }
}
