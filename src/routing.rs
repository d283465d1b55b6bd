//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post},
};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::{
    AppState,
    analytics::{get_charts_data, get_income_analytics, get_monthly_trends, get_spending_analytics},
    auth::{auth_guard, sign_in, sign_out, sign_up},
    budget::{
        create_budget_endpoint, delete_budget_endpoint, get_budget_endpoint,
        list_budgets_endpoint, update_budget_endpoint,
    },
    category::{
        create_category_endpoint, delete_category_endpoint, get_category_endpoint,
        list_categories_endpoint, update_category_endpoint,
    },
    endpoints,
    not_found::get_404_not_found,
    settings::{get_settings_endpoint, update_settings_endpoint},
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, get_transaction_endpoint,
        list_transactions_endpoint, update_transaction_endpoint,
    },
    user::{delete_profile, get_profile, update_profile},
};

/// The origins of the development clients that are always allowed to call the API.
const DEV_ORIGINS: [&str; 3] = [
    "http://localhost:8081",
    "http://localhost:19006",
    "http://localhost:3000",
];

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::ROOT, get(get_welcome))
        .route(endpoints::SIGN_UP, post(sign_up))
        .route(endpoints::SIGN_IN, post(sign_in));

    let protected_routes = Router::new()
        .route(endpoints::SIGN_OUT, post(sign_out))
        .route(
            endpoints::PROFILE,
            get(get_profile).put(update_profile).delete(delete_profile),
        )
        .route(
            endpoints::CATEGORIES,
            get(list_categories_endpoint).post(create_category_endpoint),
        )
        .route(
            endpoints::CATEGORY,
            get(get_category_endpoint)
                .put(update_category_endpoint)
                .delete(delete_category_endpoint),
        )
        .route(
            endpoints::TRANSACTIONS,
            get(list_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            get(get_transaction_endpoint)
                .put(update_transaction_endpoint)
                .delete(delete_transaction_endpoint),
        )
        .route(
            endpoints::BUDGETS,
            get(list_budgets_endpoint).post(create_budget_endpoint),
        )
        .route(
            endpoints::BUDGET,
            get(get_budget_endpoint)
                .put(update_budget_endpoint)
                .delete(delete_budget_endpoint),
        )
        .route(
            endpoints::SETTINGS,
            get(get_settings_endpoint).put(update_settings_endpoint),
        )
        .route(endpoints::SPENDING_ANALYTICS, get(get_spending_analytics))
        .route(endpoints::INCOME_ANALYTICS, get(get_income_analytics))
        .route(endpoints::MONTHLY_TRENDS, get(get_monthly_trends))
        .route(endpoints::CHARTS, get(get_charts_data))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    protected_routes
        .merge(unprotected_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

/// Build the CORS layer that lets browser clients call the API.
///
/// `client_url` is added to the local development origins. Origins that are
/// not valid header values are skipped with a warning.
pub fn cors_layer(client_url: Option<&str>) -> CorsLayer {
    let mut raw_origins: Vec<&str> = DEV_ORIGINS.to_vec();
    raw_origins.extend(client_url);

    let origins: Vec<HeaderValue> = raw_origins
        .into_iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(origin) => Some(origin),
            Err(error) => {
                tracing::warn!("Ignoring invalid CORS origin {origin:?}: {error}");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
}

/// The health check.
async fn get_welcome() -> &'static str {
    "Welcome to the Personal Finance API"
}
