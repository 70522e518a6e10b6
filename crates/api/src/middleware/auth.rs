//! Session-based authentication extractor for Axum handlers.

use agentpay_core::error::CoreError;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::session::Session;
use crate::state::AppState;

/// Authenticated session extracted from a Bearer token in the `Authorization` header.
///
/// Use this as an extractor parameter in any handler that requires a signed-in user:
///
/// ```ignore
/// async fn my_handler(auth: AuthSession) -> AppResult<Json<()>> {
///     tracing::info!(user = %auth.session.user.email, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthSession {
    /// The plaintext session token presented by the caller.
    pub token: String,
    pub session: Session,
}

impl AuthSession {
    /// Bearer token for calls to the payroll backend.
    pub fn upstream_token(&self) -> &str {
        &self.session.upstream_token
    }

    pub fn role(&self) -> &str {
        &self.session.user.role
    }

    pub fn email(&self) -> &str {
        &self.session.user.email
    }
}

impl FromRequestParts<AppState> for AuthSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let session = state.sessions.get(token).await.ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired session".into()))
        })?;

        Ok(AuthSession {
            token: token.to_string(),
            session,
        })
    }
}
