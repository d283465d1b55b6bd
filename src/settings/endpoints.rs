//! Endpoints for reading and changing the signed in user's settings.

use axum::{Extension, extract::State, http::StatusCode, response::Response};

use crate::{
    Error, UserId,
    db::{DbState, lock_connection},
    extract::Json,
    response::{ApiResponse, json_response},
    settings::{SettingsChanges, get_settings, update_settings},
};

/// Handler for getting the signed in user's settings.
pub async fn get_settings_endpoint(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserId>,
) -> Result<Response, Error> {
    let connection = lock_connection(&state.db_connection)?;
    let settings = get_settings(user_id, &connection)?;

    Ok(json_response(
        StatusCode::OK,
        ApiResponse::with_message("Settings retrieved successfully", settings),
    ))
}

/// Handler for partially updating the signed in user's settings.
///
/// Unsupported currencies, date formats and languages are rejected when the
/// request body is deserialized.
pub async fn update_settings_endpoint(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserId>,
    Json(changes): Json<SettingsChanges>,
) -> Result<Response, Error> {
    let connection = lock_connection(&state.db_connection)?;
    let settings = update_settings(user_id, changes, &connection)?;

    Ok(json_response(
        StatusCode::OK,
        ApiResponse::with_message("Settings updated successfully", settings),
    ))
}

#[cfg(test)]
mod tests {
    use axum::{
        Extension,
        extract::{FromRef, State},
        http::StatusCode,
    };

    use crate::{
        db::DbState,
        extract::Json,
        response::ApiResponse,
        settings::{Settings, SettingsChanges, create_default_settings, domain::DateFormat},
        test_utils::{create_test_user, get_test_state, parse_json_body},
    };

    use super::{get_settings_endpoint, update_settings_endpoint};

    #[tokio::test]
    async fn update_then_get_settings() {
        let state = DbState::from_ref(&get_test_state());
        let user = {
            let connection = state.db_connection.lock().unwrap();
            let user = create_test_user("jane@example.com", &connection);
            create_default_settings(user.id, &connection).unwrap();
            user
        };
        let changes: SettingsChanges = serde_json::from_value(serde_json::json!({
            "darkMode": true,
            "dateFormat": "DD/MM/YYYY",
            "notifications": {"weeklyReports": true}
        }))
        .unwrap();

        let response =
            update_settings_endpoint(State(state.clone()), Extension(user.id), Json(changes))
                .await
                .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = get_settings_endpoint(State(state), Extension(user.id))
            .await
            .unwrap();
        let body: ApiResponse<Settings> = parse_json_body(response).await;
        let settings = body.data.unwrap();
        assert!(settings.dark_mode);
        assert_eq!(settings.date_format, DateFormat::DayMonthYear);
        assert!(settings.notifications.weekly_reports);
        assert!(settings.notifications.budget_alerts);
    }

    #[test]
    fn unsupported_values_fail_to_deserialize() {
        let result = serde_json::from_value::<SettingsChanges>(serde_json::json!({
            "currency": "XYZ"
        }));

        assert!(result.is_err());
    }
}
