//! Handlers for the `/auth` resource (login, logout, me).

use agentpay_client::PayrollApiError;
use agentpay_core::error::CoreError;
use agentpay_core::types::Timestamp;
use agentpay_core::validation::validate_input;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthSession;
use crate::response::DataResponse;
use crate::session::{Preferences, SessionUser};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Successful login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Opaque dashboard session token; send as `Authorization: Bearer <token>`.
    pub token: String,
    pub expires_at: Timestamp,
    pub user: SessionUser,
    pub preferences: Preferences,
}

/// Current session as returned by `GET /auth/me`.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: SessionUser,
    pub preferences: Preferences,
    pub expires_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/login
///
/// Forward the credentials to the payroll backend and open a dashboard
/// session bound to the backend's access token.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<DataResponse<LoginResponse>>> {
    validate_input(&input)?;

    let upstream = state
        .payroll
        .login(&input.email, &input.password)
        .await
        .map_err(|err| match err {
            PayrollApiError::Api { status: 400 | 401 | 403, .. } => AppError::Core(
                CoreError::Unauthorized("Invalid email or password".into()),
            ),
            other => AppError::Upstream(other),
        })?;

    let user = SessionUser::from(upstream.user);
    let (token, session) = state.sessions.create(user, upstream.access_token).await;

    tracing::info!(email = %session.user.email, role = %session.user.role, "User logged in");

    Ok(Json(DataResponse {
        data: LoginResponse {
            token,
            expires_at: session.expires_at,
            user: session.user,
            preferences: session.preferences,
        },
    }))
}

/// POST /api/v1/auth/logout
///
/// Drop the caller's session. Returns 204 No Content.
pub async fn logout(State(state): State<AppState>, auth: AuthSession) -> AppResult<StatusCode> {
    state.sessions.remove(&auth.token).await;
    tracing::info!(email = %auth.email(), "User logged out");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/me
pub async fn me(auth: AuthSession) -> AppResult<Json<DataResponse<MeResponse>>> {
    let session = auth.session;
    Ok(Json(DataResponse {
        data: MeResponse {
            user: session.user,
            preferences: session.preferences,
            expires_at: session.expires_at,
        },
    }))
}
