//! The fallback for requests that do not match any route.

use axum::{http::StatusCode, response::Response};

use crate::response::{ApiResponse, json_response};

/// Respond with a 404 JSON error.
pub async fn get_404_not_found() -> Response {
    json_response(
        StatusCode::NOT_FOUND,
        ApiResponse::<()>::error("Route not found".to_owned()),
    )
}
