//! Signing out.

use axum::{Extension, http::StatusCode, response::Response};

use crate::{
    UserId,
    response::{ApiResponse, json_response},
};

/// Handler for sign-out requests.
///
/// Tokens are stateless, so this only acknowledges the request. The client is
/// expected to discard its token.
pub async fn sign_out(Extension(user_id): Extension<UserId>) -> Response {
    tracing::info!("user {user_id} signed out");

    json_response(StatusCode::OK, ApiResponse::message("Logged out successfully"))
}

#[cfg(test)]
mod tests {
    use axum::{Extension, http::StatusCode};

    use crate::{UserId, response::ApiResponse, test_utils::parse_json_body};

    use super::sign_out;

    #[tokio::test]
    async fn sign_out_returns_message() {
        let response = sign_out(Extension(UserId::new(1))).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: ApiResponse<()> = parse_json_body(response).await;
        assert!(body.success);
        assert_eq!(body.message.as_deref(), Some("Logged out successfully"));
    }
}
