//! Endpoints for viewing, editing and deleting the signed in user's account.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    http::StatusCode,
    response::Response,
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error, PasswordHash,
    db::lock_connection,
    extract::Json,
    response::{ApiResponse, json_response},
    user::{
        Currency, Email, UserChanges, UserId, UserName, delete_user, get_user_by_id, update_user,
    },
};

/// The state needed to edit a user's profile.
#[derive(Debug, Clone)]
pub struct ProfileState {
    /// The bcrypt cost used when hashing a new password.
    pub password_hash_cost: u32,
    /// The shared database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ProfileState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            password_hash_cost: state.password_hash_cost,
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The fields of the profile a client may change. Omitted fields are left as is.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub currency: Option<Currency>,
    pub dark_mode: Option<bool>,
}

/// Handler for getting the signed in user's profile.
pub async fn get_profile(
    State(state): State<ProfileState>,
    Extension(user_id): Extension<UserId>,
) -> Result<Response, Error> {
    let connection = lock_connection(&state.db_connection)?;
    let user = get_user_by_id(user_id, &connection)?;

    Ok(json_response(StatusCode::OK, ApiResponse::data(user)))
}

/// Handler for partially updating the signed in user's profile.
///
/// A new password is validated and hashed before it is stored.
///
/// # Errors
///
/// Returns an error response if a field is invalid, or if the new email is
/// already taken by another user.
pub async fn update_profile(
    State(state): State<ProfileState>,
    Extension(user_id): Extension<UserId>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Response, Error> {
    let changes = UserChanges {
        name: request.name.as_deref().map(UserName::new).transpose()?,
        email: request.email.as_deref().map(Email::new).transpose()?,
        password_hash: request
            .password
            .as_deref()
            .map(|password| PasswordHash::from_raw_password(password, state.password_hash_cost))
            .transpose()?,
        currency: request.currency,
        dark_mode: request.dark_mode,
    };

    let connection = lock_connection(&state.db_connection)?;
    let user = update_user(user_id, changes, &connection)?;

    Ok(json_response(
        StatusCode::OK,
        ApiResponse::with_message("Profile updated successfully", user),
    ))
}

/// Handler for deleting the signed in user's account and everything they own.
pub async fn delete_profile(
    State(state): State<ProfileState>,
    Extension(user_id): Extension<UserId>,
) -> Result<Response, Error> {
    let connection = lock_connection(&state.db_connection)?;
    delete_user(user_id, &connection)?;

    tracing::info!("deleted user {user_id}");

    Ok(json_response(
        StatusCode::OK,
        ApiResponse::message("Account deleted successfully"),
    ))
}
