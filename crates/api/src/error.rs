use agentpay_client::PayrollApiError;
use agentpay_core::affordability::AffordabilityError;
use agentpay_core::error::CoreError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{json, Value};

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `agentpay_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A failed call to the payroll backend.
    #[error(transparent)]
    Upstream(#[from] PayrollApiError),

    /// A debt that would break the monthly cap.
    #[error(transparent)]
    LimitExceeded(#[from] AffordabilityError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut details: Option<Value> = None;

        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- Payroll backend errors ---
            AppError::Upstream(err) => classify_upstream_error(err),

            // --- Affordability ---
            AppError::LimitExceeded(err) => {
                let AffordabilityError::LimitExceeded {
                    target_month,
                    total_potential,
                    max_allowed_debt,
                    max_additional,
                    minimum_reserve,
                } = err;
                details = Some(json!({
                    "target_month": target_month,
                    "total_potential": total_potential,
                    "max_allowed_debt": max_allowed_debt,
                    "max_additional": max_additional,
                    "minimum_reserve": minimum_reserve,
                }));
                (StatusCode::UNPROCESSABLE_ENTITY, "LIMIT_EXCEEDED", err.to_string())
            }

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let mut body = json!({
            "error": message,
            "code": code,
        });
        if let Some(details) = details {
            body["details"] = details;
        }

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a payroll backend error into an HTTP status, error code, and message.
///
/// - Backend 404 maps to 404 `NOT_FOUND`.
/// - Other backend 4xx keep their status under `UPSTREAM_ERROR` with the
///   backend's detail message.
/// - Backend 5xx, transport failures and undecodable payloads map to 502 with
///   a sanitized message.
fn classify_upstream_error(err: &PayrollApiError) -> (StatusCode, &'static str, String) {
    match err {
        PayrollApiError::Api { status, detail } => {
            let status = StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY);
            if status == StatusCode::NOT_FOUND {
                (StatusCode::NOT_FOUND, "NOT_FOUND", detail.clone())
            } else if status.is_client_error() {
                (status, "UPSTREAM_ERROR", detail.clone())
            } else {
                tracing::error!(status = %status, detail = %detail, "Payroll backend error");
                (
                    StatusCode::BAD_GATEWAY,
                    "BAD_GATEWAY",
                    "The payroll backend failed to process the request".to_string(),
                )
            }
        }
        PayrollApiError::Request(req_err) => {
            tracing::error!(error = %req_err, "Payroll backend unreachable");
            (
                StatusCode::BAD_GATEWAY,
                "BAD_GATEWAY",
                "The payroll backend is unavailable".to_string(),
            )
        }
        PayrollApiError::Decode(msg) => {
            tracing::error!(error = %msg, "Unexpected payroll backend payload");
            (
                StatusCode::BAD_GATEWAY,
                "BAD_GATEWAY",
                "The payroll backend returned an unexpected response".to_string(),
            )
        }
    }
}
