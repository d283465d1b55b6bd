//! Endpoint for deleting a category.

use axum::{Extension, extract::State, http::StatusCode, response::Response};

use crate::{
    Error, UserId,
    category::{count_category_transactions, delete_category, get_category},
    database_id::CategoryId,
    db::{DbState, lock_connection},
    extract::Path,
    response::{ApiResponse, json_response},
};

/// Handler for deleting a category owned by the signed in user.
///
/// Categories with transactions cannot be deleted. Budgets for the category are
/// deleted along with it.
pub async fn delete_category_endpoint(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserId>,
    Path(category_id): Path<CategoryId>,
) -> Result<Response, Error> {
    let connection = lock_connection(&state.db_connection)?;
    let category = get_category(category_id, user_id, &connection)?;

    if category.user_id != Some(user_id) {
        return Err(Error::CategoryNotFound);
    }

    if count_category_transactions(category_id, &connection)? > 0 {
        return Err(Error::CategoryInUse);
    }

    delete_category(category_id, user_id, &connection)?;

    Ok(json_response(
        StatusCode::OK,
        ApiResponse::message("Category deleted successfully"),
    ))
}
