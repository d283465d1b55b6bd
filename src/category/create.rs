//! Endpoint for creating a category.

use axum::{Extension, extract::State, http::StatusCode, response::Response};
use serde::{Deserialize, Serialize};

use crate::{
    Error, UserId,
    category::{CategoryKind, CategoryName, Color, DEFAULT_ICON, NewCategory, create_category},
    db::{DbState, lock_connection},
    extract::Json,
    response::{ApiResponse, json_response},
};

/// The raw data sent by the client to create a category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<CategoryKind>,
    pub icon: Option<String>,
    pub color: Option<String>,
}

/// Handler for creating a category owned by the signed in user.
///
/// # Errors
///
/// Returns an error response if the name or type is missing, or if the name or
/// colour is invalid.
pub async fn create_category_endpoint(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserId>,
    Json(request): Json<CreateCategoryRequest>,
) -> Result<Response, Error> {
    let (Some(name), Some(kind)) = (request.name, request.kind) else {
        return Err(Error::MissingFields("Please provide category name and type"));
    };

    let name = CategoryName::new(&name)?;
    let color = match request.color {
        Some(color) => Color::new(&color)?,
        None => Color::default(),
    };
    let icon = request
        .icon
        .filter(|icon| !icon.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_ICON.to_owned());

    let connection = lock_connection(&state.db_connection)?;
    let category = create_category(
        NewCategory {
            user_id,
            name,
            kind,
            icon,
            color,
            is_default: false,
        },
        &connection,
    )?;

    Ok(json_response(
        StatusCode::CREATED,
        ApiResponse::with_message("Category created", category),
    ))
}
