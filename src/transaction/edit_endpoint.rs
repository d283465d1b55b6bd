//! Defines the endpoint for updating a transaction.

use axum::{Extension, extract::State, http::StatusCode, response::Response};
use serde::{Deserialize, Serialize};

use crate::{
    Error, UserId,
    category::CategoryKind,
    database_id::{CategoryId, TransactionId},
    db::{DbState, lock_connection},
    extract::{Json, Path},
    response::{ApiResponse, json_response},
    timezone::parse_date,
    transaction::{
        Transaction, check_category, get_transaction, update_transaction, validate_amount,
    },
};

/// The fields of a transaction a client may change. Omitted fields are left as is.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTransactionRequest {
    pub amount: Option<f64>,
    #[serde(rename = "type")]
    pub kind: Option<CategoryKind>,
    pub category_id: Option<CategoryId>,
    pub date: Option<String>,
    pub description: Option<String>,
}

/// A route handler for partially updating a transaction.
///
/// The merged transaction is checked with the same rules as a new transaction.
///
/// # Errors
///
/// Returns an error response if the transaction is not owned by the user, or
/// if the merged transaction is invalid.
pub async fn update_transaction_endpoint(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserId>,
    Path(transaction_id): Path<TransactionId>,
    Json(request): Json<UpdateTransactionRequest>,
) -> Result<Response, Error> {
    let amount = request.amount.map(validate_amount).transpose()?;
    let date = request.date.as_deref().map(parse_date).transpose()?;

    let connection = lock_connection(&state.db_connection)?;
    let transaction = get_transaction(transaction_id, user_id, &connection)?;

    let updated = Transaction {
        category_id: request.category_id.unwrap_or(transaction.category_id),
        kind: request.kind.unwrap_or(transaction.kind),
        amount: amount.unwrap_or(transaction.amount),
        date: date.unwrap_or(transaction.date),
        description: request
            .description
            .map(|description| description.trim().to_owned())
            .unwrap_or(transaction.description),
        ..transaction
    };

    check_category(updated.category_id, updated.kind, user_id, &connection)?;
    update_transaction(&updated, &connection)?;

    Ok(json_response(
        StatusCode::OK,
        ApiResponse::with_message("Transaction updated", updated),
    ))
}
