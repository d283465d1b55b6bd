//! Endpoints for listing budgets and fetching a single budget.

use axum::{Extension, extract::State, http::StatusCode, response::Response};
use serde::Deserialize;

use crate::{
    Error, UserId,
    budget::{BudgetMonth, BudgetStatus, get_budget, get_budgets},
    database_id::BudgetId,
    db::{DbState, lock_connection},
    extract::{Path, Query},
    response::{ApiResponse, json_response},
};

/// The optional filter for listing budgets, e.g. `?month=2025-03`.
#[derive(Debug, Default, Deserialize)]
pub struct BudgetQuery {
    /// Only return budgets for this `YYYY-MM` month.
    pub month: Option<String>,
}

/// Handler for listing the user's budgets with their current spending.
pub async fn list_budgets_endpoint(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserId>,
    Query(query): Query<BudgetQuery>,
) -> Result<Response, Error> {
    let month = query
        .month
        .as_deref()
        .map(str::parse::<BudgetMonth>)
        .transpose()?;

    let connection = lock_connection(&state.db_connection)?;
    let budgets: Vec<BudgetStatus> = get_budgets(user_id, month, &connection)?
        .into_iter()
        .map(BudgetStatus::from)
        .collect();

    Ok(json_response(StatusCode::OK, ApiResponse::data(budgets)))
}

/// Handler for fetching a single budget with its current spending.
pub async fn get_budget_endpoint(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserId>,
    Path(budget_id): Path<BudgetId>,
) -> Result<Response, Error> {
    let connection = lock_connection(&state.db_connection)?;
    let budget = get_budget(budget_id, user_id, &connection)?;

    Ok(json_response(
        StatusCode::OK,
        ApiResponse::data(BudgetStatus::from(budget)),
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
        Error,
        budget::{BudgetStatus, NewBudget, create_budget},
        category::create_default_categories,
        db::DbState,
        extract::{Path, Query},
        response::ApiResponse,
        test_utils::{create_test_user, get_test_state, parse_json_body},
        transaction::{NewTransaction, create_transaction},
    };

    use super::{BudgetQuery, get_budget_endpoint, list_budgets_endpoint};

    #[tokio::test]
    async fn lists_budgets_for_month_with_spending() {
        let state = DbState::from_ref(&get_test_state());
        let user_id = {
            let connection = state.db_connection.lock().unwrap();
            let user = create_test_user("jane@example.com", &connection);
            let categories = create_default_categories(user.id, &connection).unwrap();
            for month in ["2025-03", "2025-04"] {
                create_budget(
                    NewBudget {
                        user_id: user.id,
                        category_id: categories[0].id,
                        month: month.parse().unwrap(),
                        limit: 100.0,
                        alert_threshold: 80,
                    },
                    &connection,
                )
                .unwrap();
            }
            create_transaction(
                NewTransaction {
                    user_id: user.id,
                    category_id: categories[0].id,
                    kind: categories[0].kind,
                    amount: 85.0,
                    date: date!(2025 - 03 - 20),
                    description: String::new(),
                },
                &connection,
            )
            .unwrap();
            user.id
        };

        let response = list_budgets_endpoint(
            State(state),
            Extension(user_id),
            Query(BudgetQuery {
                month: Some("2025-03".to_owned()),
            }),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: ApiResponse<Vec<BudgetStatus>> = parse_json_body(response).await;
        let budgets = body.data.unwrap();
        assert_eq!(budgets.len(), 1);
        assert_eq!(budgets[0].budget.spent, 85.0);
        assert_eq!(budgets[0].remaining, 15.0);
        assert_eq!(budgets[0].percent_used, 85.0);
        assert!(budgets[0].alert_triggered);
    }

    #[tokio::test]
    async fn malformed_month_filter_is_rejected() {
        let state = DbState::from_ref(&get_test_state());
        let user = create_test_user("jane@example.com", &state.db_connection.lock().unwrap());

        let result = list_budgets_endpoint(
            State(state),
            Extension(user.id),
            Query(BudgetQuery {
                month: Some("2025-3".to_owned()),
            }),
        )
        .await;

        assert_eq!(
            result.unwrap_err(),
            Error::InvalidBudgetMonth("2025-3".to_owned())
        );
    }

    #[tokio::test]
    async fn missing_budget_is_not_found() {
        let state = DbState::from_ref(&get_test_state());
        let user = create_test_user("jane@example.com", &state.db_connection.lock().unwrap());

        let result = get_budget_endpoint(State(state), Extension(user.id), Path(1)).await;

        assert_eq!(result.unwrap_err(), Error::BudgetNotFound);
    }
}
