//! Endpoint for creating a budget.

use axum::{Extension, extract::State, http::StatusCode, response::Response};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    Error, UserId,
    budget::{
        BudgetMonth, BudgetStatus, DEFAULT_ALERT_THRESHOLD, NewBudget, create_budget,
        validate_alert_threshold, validate_limit,
    },
    category::{CategoryKind, get_category},
    database_id::CategoryId,
    db::{DbState, lock_connection},
    extract::Json,
    response::{ApiResponse, json_response},
};

/// The raw data sent by the client to create a budget.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBudgetRequest {
    pub category_id: Option<CategoryId>,
    pub limit: Option<f64>,
    pub month: Option<String>,
    pub alert_threshold: Option<i64>,
}

/// Check that the category is visible to `user_id` and is for expenses.
pub(super) fn check_budget_category(
    category_id: CategoryId,
    user_id: UserId,
    connection: &Connection,
) -> Result<(), Error> {
    let category = get_category(category_id, user_id, connection).map_err(|error| match error {
        Error::CategoryNotFound => Error::InvalidCategory,
        error => error,
    })?;

    if category.kind != CategoryKind::Expense {
        return Err(Error::BudgetCategoryNotExpense);
    }

    Ok(())
}

/// Handler for creating a budget.
///
/// # Errors
///
/// Returns an error response if a required field is missing or invalid, if the
/// category is not an expense category visible to the user, or if a budget for
/// the category and month already exists.
pub async fn create_budget_endpoint(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserId>,
    Json(request): Json<CreateBudgetRequest>,
) -> Result<Response, Error> {
    let (Some(category_id), Some(limit), Some(month)) =
        (request.category_id, request.limit, request.month)
    else {
        return Err(Error::MissingFields("Category, limit and month are required"));
    };

    let limit = validate_limit(limit)?;
    let month: BudgetMonth = month.parse()?;
    let alert_threshold = validate_alert_threshold(
        request.alert_threshold.unwrap_or(DEFAULT_ALERT_THRESHOLD),
    )?;

    let connection = lock_connection(&state.db_connection)?;
    check_budget_category(category_id, user_id, &connection)?;

    let budget = create_budget(
        NewBudget {
            user_id,
            category_id,
            month,
            limit,
            alert_threshold,
        },
        &connection,
    )?;

    Ok(json_response(
        StatusCode::CREATED,
        ApiResponse::with_message("Budget created", BudgetStatus::from(budget)),
    ))
}
