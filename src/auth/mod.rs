//! Bearer token authentication: sign-up, sign-in, sign-out and the middleware
//! that guards every other route.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;
use time::Duration;

use crate::{AppState, JwtKeys};

mod middleware;
mod password;
mod sign_in;
mod sign_out;
mod sign_up;
mod token;

pub use middleware::auth_guard;
pub use password::{PasswordHash, ValidatedPassword};
pub use sign_in::sign_in;
pub use sign_out::sign_out;
pub use sign_up::sign_up;
pub use token::{decode_token, encode_token};

/// How long a bearer token is valid for if the server is not configured otherwise.
pub const DEFAULT_TOKEN_DURATION: Duration = Duration::minutes(24 * 60);

/// The state needed to issue and check bearer tokens.
#[derive(Debug, Clone)]
pub struct AuthState {
    /// The keys used for signing and verifying bearer tokens.
    pub jwt_keys: JwtKeys,
    /// How long a newly issued token is valid for.
    pub token_duration: Duration,
    /// The bcrypt cost used when hashing new passwords.
    pub password_hash_cost: u32,
    /// The shared database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            jwt_keys: state.jwt_keys.clone(),
            token_duration: state.token_duration,
            password_hash_cost: state.password_hash_cost,
            db_connection: state.db_connection.clone(),
        }
    }
}
