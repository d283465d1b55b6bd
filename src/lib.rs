//! A personal-finance tracking REST API.
//!
//! Users authenticate with a bearer token, record income and expense
//! transactions against categories, set monthly budgets per category and view
//! aggregated analytics. Every endpoint speaks JSON and is backed by a single
//! SQLite database.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use time::Date;
use tokio::signal;

mod analytics;
mod app_state;
mod auth;
mod budget;
mod category;
mod config;
mod database_id;
mod db;
mod endpoints;
mod extract;
mod logging;
mod not_found;
mod response;
mod routing;
mod settings;
mod timezone;
mod transaction;
mod user;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use auth::{PasswordHash, ValidatedPassword};
pub use budget::{BudgetMonth, NewBudget, create_budget};
pub use category::{CategoryKind, DEFAULT_CATEGORIES, create_default_categories};
pub use config::JwtKeys;
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::{build_router, cors_layer};
pub use settings::create_default_settings;
pub use timezone::get_local_offset;
pub use transaction::{NewTransaction, create_transaction};
pub use user::{
    Email, NewUser, User, UserId, UserName, create_user, get_user_by_email, update_password,
};

use crate::response::ApiResponse;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The email and password did not match a registered user.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// The request did not carry a bearer token.
    #[error("Unauthorized")]
    Unauthorized,

    /// The bearer token was valid once but its expiry has passed.
    #[error("Session expired. Please log in again.")]
    TokenExpired,

    /// The bearer token could not be decoded or its signature did not match.
    #[error("Invalid token. Please log in again.")]
    InvalidToken,

    /// The bearer token is valid but the user it was issued to has been deleted.
    #[error("User no longer exists")]
    UserNoLongerExists,

    /// A JSON web token could not be created.
    ///
    /// The error string should only be logged for debugging on the server.
    #[error("could not create token: {0}")]
    TokenCreation(String),

    /// The email address is already registered to another user.
    #[error("User already exists")]
    DuplicateEmail,

    /// The email address is not of the form `local@domain.tld`.
    #[error("Invalid email address")]
    InvalidEmail,

    /// The user's display name is empty, too short or too long.
    #[error("Name must be between 2 and 100 characters")]
    InvalidUserName,

    /// The password does not satisfy the length rules.
    #[error("Invalid password: {0}")]
    InvalidPassword(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// One or more required fields were missing from the request body or query.
    ///
    /// The string is the message shown to the client.
    #[error("{0}")]
    MissingFields(&'static str),

    /// An empty string was used to create a category name.
    #[error("Category name cannot be empty")]
    EmptyCategoryName,

    /// A category colour that is not a `#RGB` or `#RRGGBB` hex code.
    #[error("\"{0}\" is not a valid hex colour, e.g. #FF6B6B")]
    InvalidColor(String),

    /// The category ID does not refer to a category visible to the user.
    #[error("Invalid category")]
    InvalidCategory,

    /// The transaction type does not match the type of its category.
    #[error("Transaction type must match the category type")]
    CategoryTypeMismatch,

    /// Budgets can only track spending in expense categories.
    #[error("Budgets can only be set for expense categories")]
    BudgetCategoryNotExpense,

    /// Tried to delete a category that still has transactions.
    #[error("Cannot delete category with existing transactions")]
    CategoryInUse,

    /// Tried to change the type of a category that still has transactions or budgets.
    #[error("Cannot change the type of a category with existing transactions or budgets")]
    CategoryTypeLocked,

    /// A transaction amount that is zero, negative or not finite.
    #[error("Amount must be a positive number, got {0}")]
    InvalidAmount(f64),

    /// A budget limit that is zero, negative or not finite.
    #[error("Budget limit must be a positive number, got {0}")]
    InvalidBudgetLimit(f64),

    /// An alert threshold outside of 0 to 100 percent.
    #[error("Alert threshold must be between 0 and 100, got {0}")]
    InvalidAlertThreshold(i64),

    /// A budget month that is not formatted as `YYYY-MM`.
    #[error("\"{0}\" is not a valid month, expected YYYY-MM")]
    InvalidBudgetMonth(String),

    /// A budget for the same category and month already exists.
    #[error("Budget for this category already exists this month")]
    DuplicateBudget,

    /// A date that is not formatted as `YYYY-MM-DD`.
    #[error("\"{0}\" is not a valid date, expected YYYY-MM-DD")]
    InvalidDate(String),

    /// The start of a date range is after its end.
    #[error("Start date {0} must not be after end date {1}")]
    InvalidDateRange(Date, Date),

    /// A year that could not be parsed or is out of range.
    #[error("\"{0}\" is not a valid year")]
    InvalidYear(String),

    /// The request body was not JSON or did not have the expected fields.
    ///
    /// Keeps the status of the underlying rejection, e.g. 415 for a missing
    /// content type or 422 for a field of the wrong type.
    #[error("{1}")]
    InvalidRequestBody(StatusCode, String),

    /// A path parameter could not be parsed, e.g. a non-numeric ID.
    #[error("{0}")]
    InvalidPathParameter(String),

    /// The query string could not be parsed.
    #[error("{0}")]
    InvalidQueryParameter(String),

    /// The requested user could not be found.
    #[error("User not found")]
    UserNotFound,

    /// The requested category could not be found.
    #[error("Category not found")]
    CategoryNotFound,

    /// The requested transaction could not be found.
    #[error("Transaction not found")]
    TransactionNotFound,

    /// The requested budget could not be found.
    #[error("Budget not found")]
    BudgetNotFound,

    /// The settings for the user could not be found.
    #[error("Settings not found")]
    SettingsNotFound,

    /// The requested resource was not found.
    ///
    /// Internally, this error occurs when a query returns no rows. Callers
    /// should convert it to the resource-specific variant where possible.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("user.email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("budget.") =>
            {
                Error::DuplicateBudget
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidCredentials
            | Error::Unauthorized
            | Error::TokenExpired
            | Error::InvalidToken
            | Error::UserNoLongerExists => StatusCode::UNAUTHORIZED,
            Error::DuplicateEmail | Error::DuplicateBudget => StatusCode::CONFLICT,
            Error::InvalidEmail
            | Error::InvalidUserName
            | Error::InvalidPassword(_)
            | Error::MissingFields(_)
            | Error::EmptyCategoryName
            | Error::InvalidColor(_)
            | Error::InvalidCategory
            | Error::CategoryTypeMismatch
            | Error::BudgetCategoryNotExpense
            | Error::CategoryInUse
            | Error::CategoryTypeLocked
            | Error::InvalidAmount(_)
            | Error::InvalidBudgetLimit(_)
            | Error::InvalidAlertThreshold(_)
            | Error::InvalidBudgetMonth(_)
            | Error::InvalidDate(_)
            | Error::InvalidDateRange(_, _)
            | Error::InvalidYear(_)
            | Error::InvalidPathParameter(_)
            | Error::InvalidQueryParameter(_) => StatusCode::BAD_REQUEST,
            Error::InvalidRequestBody(status, _) => *status,
            Error::UserNotFound
            | Error::CategoryNotFound
            | Error::TransactionNotFound
            | Error::BudgetNotFound
            | Error::SettingsNotFound
            | Error::NotFound => StatusCode::NOT_FOUND,
            Error::TokenCreation(_)
            | Error::HashingError(_)
            | Error::SqlError(_)
            | Error::DatabaseLockError
            | Error::InvalidTimezoneError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Any errors that are server-side faults are not intended to be shown to the client.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("An unexpected error occurred: {}", self);
            "Server Error".to_owned()
        } else {
            self.to_string()
        };

        (status, axum::Json(ApiResponse::<()>::error(message))).into_response()
    }
}

#[cfg(test)]
mod error_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::{Error, response::ApiResponse, test_utils::parse_json_body};

    #[tokio::test]
    async fn client_errors_show_their_message() {
        let response = Error::CategoryInUse.into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: ApiResponse<()> = parse_json_body(response).await;
        assert!(!body.success);
        assert_eq!(
            body.message.as_deref(),
            Some("Cannot delete category with existing transactions")
        );
    }

    #[tokio::test]
    async fn server_errors_hide_their_message() {
        let response = Error::HashingError("bcrypt exploded".to_owned()).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: ApiResponse<()> = parse_json_body(response).await;
        assert_eq!(body.message.as_deref(), Some("Server Error"));
    }

    #[test]
    fn no_rows_maps_to_not_found() {
        let error: Error = rusqlite::Error::QueryReturnedNoRows.into();

        assert_eq!(error, Error::NotFound);
    }
}
