use axum::{body::Body, http::Response};
use serde::de::DeserializeOwned;

/// Read the whole response body and deserialize it as JSON.
pub(crate) async fn parse_json_body<T: DeserializeOwned>(response: Response<Body>) -> T {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Could not read response body");

    serde_json::from_slice(&body).unwrap_or_else(|error| {
        panic!(
            "Could not parse response body {:?} as JSON: {error}",
            String::from_utf8_lossy(&body)
        )
    })
}

/// The value of an `Authorization` header for `token`.
pub(crate) fn bearer_header(token: &str) -> String {
    format!("Bearer {token}")
}
