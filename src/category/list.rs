//! Endpoints for listing categories and fetching a single category.

use axum::{Extension, extract::State, http::StatusCode, response::Response};
use serde::Deserialize;

use crate::{
    Error, UserId,
    category::{CategoryKind, get_categories, get_category},
    database_id::CategoryId,
    db::{DbState, lock_connection},
    extract::{Path, Query},
    response::{ApiResponse, json_response},
};

/// The optional filter for listing categories, e.g. `?type=expense`.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryQuery {
    /// Only return categories of this kind.
    #[serde(rename = "type")]
    pub kind: Option<CategoryKind>,
}

/// Handler for listing the user's categories and the global categories.
pub async fn list_categories_endpoint(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserId>,
    Query(query): Query<CategoryQuery>,
) -> Result<Response, Error> {
    let connection = lock_connection(&state.db_connection)?;
    let categories = get_categories(user_id, query.kind, &connection)?;

    Ok(json_response(StatusCode::OK, ApiResponse::data(categories)))
}

/// Handler for fetching a single category.
pub async fn get_category_endpoint(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserId>,
    Path(category_id): Path<CategoryId>,
) -> Result<Response, Error> {
    let connection = lock_connection(&state.db_connection)?;
    let category = get_category(category_id, user_id, &connection)?;

    Ok(json_response(StatusCode::OK, ApiResponse::data(category)))
}
