//! Endpoint for editing a budget.

use axum::{Extension, extract::State, http::StatusCode, response::Response};
use serde::{Deserialize, Serialize};

use crate::{
    Error, UserId,
    budget::{
        Budget, BudgetMonth, BudgetStatus, create::check_budget_category, get_budget,
        update_budget, validate_alert_threshold, validate_limit,
    },
    database_id::{BudgetId, CategoryId},
    db::{DbState, lock_connection},
    extract::{Json, Path},
    response::{ApiResponse, json_response},
};

/// The fields of a budget a client may change. Omitted fields are left as is.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBudgetRequest {
    pub category_id: Option<CategoryId>,
    pub limit: Option<f64>,
    pub month: Option<String>,
    pub alert_threshold: Option<i64>,
    pub is_active: Option<bool>,
}

/// Handler for partially updating a budget.
///
/// # Errors
///
/// Returns an error response if the budget is not owned by the user, a field is
/// invalid, or the new category and month clash with another budget.
pub async fn update_budget_endpoint(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserId>,
    Path(budget_id): Path<BudgetId>,
    Json(request): Json<UpdateBudgetRequest>,
) -> Result<Response, Error> {
    let limit = request.limit.map(validate_limit).transpose()?;
    let month = request
        .month
        .as_deref()
        .map(str::parse::<BudgetMonth>)
        .transpose()?;
    let alert_threshold = request
        .alert_threshold
        .map(validate_alert_threshold)
        .transpose()?;

    let connection = lock_connection(&state.db_connection)?;
    let budget = get_budget(budget_id, user_id, &connection)?;

    if let Some(category_id) = request.category_id {
        check_budget_category(category_id, user_id, &connection)?;
    }

    let updated = Budget {
        category_id: request.category_id.unwrap_or(budget.category_id),
        month: month.unwrap_or(budget.month),
        limit: limit.unwrap_or(budget.limit),
        alert_threshold: alert_threshold.unwrap_or(budget.alert_threshold),
        is_active: request.is_active.unwrap_or(budget.is_active),
        ..budget
    };

    update_budget(&updated, &connection)?;
    // Spending depends on the category and month, so read it back.
    let updated = get_budget(budget_id, user_id, &connection)?;

    Ok(json_response(
        StatusCode::OK,
        ApiResponse::with_message("Budget updated", BudgetStatus::from(updated)),
    ))
}

#[cfg(test)]
mod tests {
    use axum::{
        Extension,
        extract::{FromRef, State},
        http::StatusCode,
    };
    use time::macros::date;

    use crate::{
        Error, UserId,
        budget::{Budget, BudgetStatus, NewBudget, create_budget},
        category::{Category, create_default_categories},
        db::DbState,
        extract::{Json, Path},
        response::ApiResponse,
        test_utils::{create_test_user, get_test_state, parse_json_body},
        transaction::{NewTransaction, create_transaction},
    };

    use super::{UpdateBudgetRequest, update_budget_endpoint};

    fn setup() -> (DbState, UserId, Vec<Category>, Budget) {
        let state = DbState::from_ref(&get_test_state());
        let (user_id, categories, budget) = {
            let connection = state.db_connection.lock().unwrap();
            let user = create_test_user("jane@example.com", &connection);
            let categories = create_default_categories(user.id, &connection).unwrap();
            let budget = create_budget(
                NewBudget {
                    user_id: user.id,
                    category_id: categories[0].id,
                    month: "2025-03".parse().unwrap(),
                    limit: 100.0,
                    alert_threshold: 80,
                },
                &connection,
            )
            .unwrap();
            create_transaction(
                NewTransaction {
                    user_id: user.id,
                    category_id: categories[1].id,
                    kind: categories[1].kind,
                    amount: 60.0,
                    date: date!(2025 - 04 - 02),
                    description: String::new(),
                },
                &connection,
            )
            .unwrap();
            (user.id, categories, budget)
        };

        (state, user_id, categories, budget)
    }

    #[tokio::test]
    async fn moving_budget_recomputes_spending() {
        let (state, user_id, categories, budget) = setup();

        let response = update_budget_endpoint(
            State(state),
            Extension(user_id),
            Path(budget.id),
            Json(UpdateBudgetRequest {
                category_id: Some(categories[1].id),
                month: Some("2025-04".to_owned()),
                alert_threshold: Some(50),
                ..Default::default()
            }),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: ApiResponse<BudgetStatus> = parse_json_body(response).await;
        let status = body.data.unwrap();
        assert_eq!(status.budget.spent, 60.0);
        assert_eq!(status.budget.alert_threshold, 50);
        assert!(status.alert_triggered);
    }

    #[tokio::test]
    async fn can_deactivate_budget() {
        let (state, user_id, _, budget) = setup();

        let response = update_budget_endpoint(
            State(state),
            Extension(user_id),
            Path(budget.id),
            Json(UpdateBudgetRequest {
                is_active: Some(false),
                ..Default::default()
            }),
        )
        .await
        .unwrap();

        let body: ApiResponse<BudgetStatus> = parse_json_body(response).await;
        assert!(!body.data.unwrap().budget.is_active);
    }

    #[tokio::test]
    async fn rejects_invalid_threshold() {
        let (state, user_id, _, budget) = setup();

        let result = update_budget_endpoint(
            State(state),
            Extension(user_id),
            Path(budget.id),
            Json(UpdateBudgetRequest {
                alert_threshold: Some(150),
                ..Default::default()
            }),
        )
        .await;

        assert_eq!(result.unwrap_err(), Error::InvalidAlertThreshold(150));
    }

    #[tokio::test]
    async fn rejects_income_category() {
        let (state, user_id, categories, budget) = setup();

        let result = update_budget_endpoint(
            State(state),
            Extension(user_id),
            Path(budget.id),
            Json(UpdateBudgetRequest {
                category_id: Some(categories[9].id),
                ..Default::default()
            }),
        )
        .await;

        assert_eq!(result.unwrap_err(), Error::BudgetCategoryNotExpense);
    }
}
