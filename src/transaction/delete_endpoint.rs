//! Defines the endpoint for deleting a transaction.

use axum::{Extension, extract::State, http::StatusCode, response::Response};

use crate::{
    Error, UserId,
    database_id::TransactionId,
    db::{DbState, lock_connection},
    extract::Path,
    response::{ApiResponse, json_response},
    transaction::delete_transaction,
};

/// A route handler for deleting a transaction.
pub async fn delete_transaction_endpoint(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserId>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Response, Error> {
    let connection = lock_connection(&state.db_connection)?;
    delete_transaction(transaction_id, user_id, &connection)?;

    Ok(json_response(
        StatusCode::OK,
        ApiResponse::message("Transaction deleted"),
    ))
}
