//! Registering a new account.

use axum::{extract::State, http::StatusCode, response::Response};
use serde::{Deserialize, Serialize};

use crate::{
    Error, PasswordHash, User,
    auth::{AuthState, encode_token},
    category::create_default_categories,
    db::lock_connection,
    extract::Json,
    response::{ApiResponse, json_response},
    settings::create_default_settings,
    user::{Email, NewUser, UserName, create_user},
};

/// The raw data sent by the client to create an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignUpRequest {
    /// The display name for the new user.
    pub name: Option<String>,
    /// The email to sign in with.
    pub email: Option<String>,
    /// The plain text password.
    pub password: Option<String>,
}

/// A freshly issued token and the user it belongs to.
#[derive(Debug, Serialize)]
pub struct AuthData {
    /// The bearer token for subsequent requests.
    pub token: String,
    /// The signed in user.
    pub user: User,
}

/// Handler for creating a new account.
///
/// The user, their default settings and their default categories are created
/// in a single SQL transaction, so a failure part way leaves nothing behind.
///
/// # Errors
///
/// Returns an error response if a field is missing or invalid, if the email is
/// already registered, or if there was an internal error.
pub async fn sign_up(
    State(state): State<AuthState>,
    Json(request): Json<SignUpRequest>,
) -> Result<Response, Error> {
    let (Some(name), Some(email), Some(password)) = (request.name, request.email, request.password)
    else {
        return Err(Error::MissingFields("Please provide name, email and password"));
    };

    let name = UserName::new(&name)?;
    let email = Email::new(&email)?;
    let password_hash = PasswordHash::from_raw_password(&password, state.password_hash_cost)?;

    let user = {
        let connection = lock_connection(&state.db_connection)?;
        let transaction = connection.unchecked_transaction()?;

        let user = create_user(
            NewUser {
                name,
                email,
                password_hash,
            },
            &transaction,
        )?;
        create_default_settings(user.id, &transaction)?;
        create_default_categories(user.id, &transaction)?;

        transaction.commit()?;
        user
    };

    tracing::info!("registered user {}", user.id);

    let token = encode_token(user.id, state.token_duration, &state.jwt_keys)?;

    Ok(json_response(
        StatusCode::CREATED,
        ApiResponse::with_message("User registered successfully", AuthData { token, user }),
    ))
}
