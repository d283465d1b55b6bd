//! Endpoint for deleting a budget.

use axum::{Extension, extract::State, http::StatusCode, response::Response};

use crate::{
    Error, UserId,
    budget::delete_budget,
    database_id::BudgetId,
    db::{DbState, lock_connection},
    extract::Path,
    response::{ApiResponse, json_response},
};

/// Handler for deleting a budget.
pub async fn delete_budget_endpoint(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserId>,
    Path(budget_id): Path<BudgetId>,
) -> Result<Response, Error> {
    let connection = lock_connection(&state.db_connection)?;
    delete_budget(budget_id, user_id, &connection)?;

    Ok(json_response(StatusCode::OK, ApiResponse::message("Budget deleted")))
}
