//! Handlers for `/user/preferences` (theme and locale).

use agentpay_core::error::CoreError;
use axum::extract::State;
use axum::Json;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthSession;
use crate::response::DataResponse;
use crate::session::{Preferences, PreferencesUpdate};
use crate::state::AppState;

/// GET /api/v1/user/preferences
pub async fn get_preferences(auth: AuthSession) -> AppResult<Json<DataResponse<Preferences>>> {
    Ok(Json(DataResponse {
        data: auth.session.preferences,
    }))
}

/// PUT /api/v1/user/preferences
///
/// Partial update; omitted fields keep their current value.
pub async fn update_preferences(
    State(state): State<AppState>,
    auth: AuthSession,
    Json(update): Json<PreferencesUpdate>,
) -> AppResult<Json<DataResponse<Preferences>>> {
    let preferences = state
        .sessions
        .update_preferences(&auth.token, update)
        .await
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired session".into()))
        })?;

    tracing::debug!(
        email = %auth.email(),
        theme = ?preferences.theme,
        locale = ?preferences.locale,
        "Preferences updated",
    );

    Ok(Json(DataResponse { data: preferences }))
}
