//! Endpoints for listing transactions and fetching a single transaction.

use axum::{Extension, extract::State, http::StatusCode, response::Response};
use serde::Deserialize;

use crate::{
    Error, UserId,
    category::CategoryKind,
    database_id::TransactionId,
    db::{DbState, lock_connection},
    extract::{Path, Query},
    response::{ApiResponse, json_response},
    transaction::{get_transaction, get_transactions},
};

/// The optional filter for listing transactions, e.g. `?type=income`.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionQuery {
    /// Only return transactions of this kind.
    #[serde(rename = "type")]
    pub kind: Option<CategoryKind>,
}

/// Handler for listing the user's transactions, newest first.
pub async fn list_transactions_endpoint(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserId>,
    Query(query): Query<TransactionQuery>,
) -> Result<Response, Error> {
    let connection = lock_connection(&state.db_connection)?;
    let transactions = get_transactions(user_id, query.kind, &connection)?;

    Ok(json_response(StatusCode::OK, ApiResponse::data(transactions)))
}

/// Handler for fetching a single transaction.
pub async fn get_transaction_endpoint(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserId>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Response, Error> {
    let connection = lock_connection(&state.db_connection)?;
    let transaction = get_transaction(transaction_id, user_id, &connection)?;

    Ok(json_response(StatusCode::OK, ApiResponse::data(transaction)))
}
