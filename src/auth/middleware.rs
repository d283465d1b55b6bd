//! Authentication middleware that checks the bearer token on protected routes.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};

use crate::{
    Error,
    auth::{AuthState, decode_token},
    db::lock_connection,
    user::get_user_by_id,
};

/// Middleware function that checks for a valid bearer token in the `Authorization` header.
///
/// The user ID is placed into the request and then the request is executed
/// normally if the token is valid and the user still exists, otherwise a 401
/// JSON error is returned.
///
/// **Note**: Route handlers can use the function argument
/// `Extension(user_id): Extension<UserId>` to receive the user ID.
pub async fn auth_guard(
    State(state): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(Authorization(bearer)) = request.headers().typed_get::<Authorization<Bearer>>() else {
        return Error::Unauthorized.into_response();
    };

    let user_id = match decode_token(bearer.token(), &state.jwt_keys) {
        Ok(user_id) => user_id,
        Err(error) => return error.into_response(),
    };

    let user_exists = lock_connection(&state.db_connection)
        .and_then(|connection| get_user_by_id(user_id, &connection).map(|_| ()));

    match user_exists {
        Ok(()) => {}
        Err(Error::UserNotFound) => return Error::UserNoLongerExists.into_response(),
        Err(error) => return error.into_response(),
    }

    request.extensions_mut().insert(user_id);
    next.run(request).await
}
