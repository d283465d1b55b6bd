//! Defines the endpoint for creating a new transaction.

use axum::{Extension, extract::State, http::StatusCode, response::Response};
use serde::{Deserialize, Serialize};

use crate::{
    Error, UserId,
    category::CategoryKind,
    database_id::CategoryId,
    db::{DbState, lock_connection},
    extract::Json,
    response::{ApiResponse, json_response},
    timezone::parse_date,
    transaction::{NewTransaction, check_category, create_transaction, validate_amount},
};

/// The raw data sent by the client to record a transaction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    pub amount: Option<f64>,
    #[serde(rename = "type")]
    pub kind: Option<CategoryKind>,
    pub category_id: Option<CategoryId>,
    pub date: Option<String>,
    pub description: Option<String>,
}

/// A route handler for creating a new transaction.
///
/// # Errors
///
/// Returns an error response if a required field is missing, the amount or date
/// is invalid, or the category is not visible to the user or of a different type.
pub async fn create_transaction_endpoint(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserId>,
    Json(request): Json<CreateTransactionRequest>,
) -> Result<Response, Error> {
    let (Some(amount), Some(kind), Some(category_id), Some(date)) =
        (request.amount, request.kind, request.category_id, request.date)
    else {
        return Err(Error::MissingFields(
            "Please provide amount, type, categoryId and date",
        ));
    };

    let amount = validate_amount(amount)?;
    let date = parse_date(&date)?;

    let connection = lock_connection(&state.db_connection)?;
    check_category(category_id, kind, user_id, &connection)?;

    let transaction = create_transaction(
        NewTransaction {
            user_id,
            category_id,
            kind,
            amount,
            date,
            description: request.description.unwrap_or_default().trim().to_owned(),
        },
        &connection,
    )?;

    Ok(json_response(
        StatusCode::CREATED,
        ApiResponse::with_message("Transaction created", transaction),
    ))
}
