//! Signing in with an email and password.

use axum::{extract::State, http::StatusCode, response::Response};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    auth::{AuthState, encode_token, sign_up::AuthData},
    db::lock_connection,
    extract::Json,
    response::{ApiResponse, json_response},
    user::{Email, get_user_by_email},
};

/// The raw data entered by the user when signing in.
///
/// The password is stored as a plain string. There is no need for validation here since
/// it will be compared against the password in the database, which has been verified.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignInRequest {
    /// Email entered during sign-in.
    pub email: Option<String>,
    /// Password entered during sign-in.
    pub password: Option<String>,
}

/// Handler for sign-in requests.
///
/// An unknown email and a wrong password give the same error so that clients
/// cannot find out which addresses are registered.
///
/// # Errors
///
/// This function will return an error in a few situations.
/// - The email or password is missing.
/// - The email does not belong to a registered user.
/// - The password is not correct.
/// - An internal error occurred when verifying the password.
pub async fn sign_in(
    State(state): State<AuthState>,
    Json(request): Json<SignInRequest>,
) -> Result<Response, Error> {
    let (Some(email), Some(password)) = (request.email, request.password) else {
        return Err(Error::MissingFields("Please provide email and password"));
    };

    let email = Email::new(&email).map_err(|_| Error::InvalidCredentials)?;

    let user = {
        let connection = lock_connection(&state.db_connection)?;
        get_user_by_email(&email, &connection).map_err(|error| match error {
            Error::UserNotFound => Error::InvalidCredentials,
            error => error,
        })?
    };

    let is_password_valid = user.password_hash.verify(&password).map_err(|error| {
        tracing::error!("Unhandled error while verifying credentials: {error}");
        Error::HashingError(error.to_string())
    })?;

    if !is_password_valid {
        return Err(Error::InvalidCredentials);
    }

    let token = encode_token(user.id, state.token_duration, &state.jwt_keys)?;

    Ok(json_response(
        StatusCode::OK,
        ApiResponse::with_message("Login successful", AuthData { token, user }),
    ))
}
