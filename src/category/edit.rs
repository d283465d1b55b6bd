//! Endpoint for editing a category.

use axum::{Extension, extract::State, http::StatusCode, response::Response};
use serde::{Deserialize, Serialize};

use crate::{
    Error, UserId,
    category::{
        Category, CategoryKind, CategoryName, Color, count_category_budgets,
        count_category_transactions, get_category, update_category,
    },
    database_id::CategoryId,
    db::{DbState, lock_connection},
    extract::{Json, Path},
    response::{ApiResponse, json_response},
};

/// The fields of a category a client may change. Omitted fields are left as is.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<CategoryKind>,
    pub icon: Option<String>,
    pub color: Option<String>,
}

/// Handler for partially updating a category owned by the signed in user.
///
/// # Errors
///
/// Returns an error response if:
/// - the category does not exist, is global or belongs to another user,
/// - a field is invalid,
/// - or the type is changed while transactions or budgets use the category.
pub async fn update_category_endpoint(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserId>,
    Path(category_id): Path<CategoryId>,
    Json(request): Json<UpdateCategoryRequest>,
) -> Result<Response, Error> {
    let name = request.name.as_deref().map(CategoryName::new).transpose()?;
    let color = request.color.as_deref().map(Color::new).transpose()?;

    let connection = lock_connection(&state.db_connection)?;
    let category = get_category(category_id, user_id, &connection)?;

    if category.user_id != Some(user_id) {
        return Err(Error::CategoryNotFound);
    }

    let kind = request.kind.unwrap_or(category.kind);
    if kind != category.kind
        && (count_category_transactions(category_id, &connection)? > 0
            || count_category_budgets(category_id, &connection)? > 0)
    {
        return Err(Error::CategoryTypeLocked);
    }

    let updated = Category {
        name: name.unwrap_or(category.name),
        kind,
        icon: request
            .icon
            .filter(|icon| !icon.trim().is_empty())
            .unwrap_or(category.icon),
        color: color.unwrap_or(category.color),
        ..category
    };

    update_category(&updated, &connection)?;

    Ok(json_response(
        StatusCode::OK,
        ApiResponse::with_message("Category updated", updated),
    ))
}
