//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthSession`] and rejects requests whose role does
//! not meet the minimum requirement.

use agentpay_core::error::CoreError;
use agentpay_core::roles::{is_accountant_or_admin, ROLE_ADMIN};
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use super::auth::AuthSession;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `admin` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(auth): RequireAdmin) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthSession);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = AuthSession::from_request_parts(parts, state).await?;
        if auth.role() != ROLE_ADMIN {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".into(),
            )));
        }
        Ok(RequireAdmin(auth))
    }
}

/// Requires `accountant` or `admin` role. Rejects with 403 Forbidden otherwise.
pub struct RequireAccountant(pub AuthSession);

impl FromRequestParts<AppState> for RequireAccountant {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = AuthSession::from_request_parts(parts, state).await?;
        if !is_accountant_or_admin(auth.role()) {
            return Err(AppError::Core(CoreError::Forbidden(
                "Accountant or admin role required".into(),
            )));
        }
        Ok(RequireAccountant(auth))
    }
}

