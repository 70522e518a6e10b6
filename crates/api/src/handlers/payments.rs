//! Handlers for the `/payments` resource and its status lifecycle.

use agentpay_client::wire::PaymentPayload;
use agentpay_core::payment::{Payment, PaymentInput, PaymentStatus};
use agentpay_core::types::EntityId;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthSession;
use crate::middleware::rbac::RequireAccountant;
use crate::query::parse_month_filter;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /payments`.
#[derive(Debug, Deserialize)]
pub struct PaymentListParams {
    pub agent_id: Option<EntityId>,
    pub status: Option<String>,
    /// `YYYY-MM`.
    pub month: Option<String>,
}

/// GET /api/v1/payments?agent_id=&status=&month=
pub async fn list_payments(
    State(state): State<AppState>,
    auth: AuthSession,
    Query(params): Query<PaymentListParams>,
) -> AppResult<Json<DataResponse<Vec<Payment>>>> {
    let status = params
        .status
        .as_deref()
        .map(PaymentStatus::parse_lenient)
        .transpose()?;
    let month = parse_month_filter(params.month.as_deref())?;

    let payments = state
        .payroll
        .list_payments(auth.upstream_token())
        .await?
        .into_iter()
        .filter(|p| params.agent_id.is_none_or(|id| p.agent_id == id))
        .filter(|p| status.is_none_or(|s| p.status == s))
        .filter(|p| month.is_none_or(|m| p.period == m))
        .collect();
    Ok(Json(DataResponse { data: payments }))
}

/// GET /api/v1/payments/{id}
pub async fn get_payment(
    State(state): State<AppState>,
    auth: AuthSession,
    Path(id): Path<EntityId>,
) -> AppResult<Json<DataResponse<Payment>>> {
    let payment = state.payroll.get_payment(auth.upstream_token(), id).await?;
    Ok(Json(DataResponse { data: payment }))
}

/// POST /api/v1/payments
///
/// New payments always start as pending.
pub async fn create_payment(
    State(state): State<AppState>,
    RequireAccountant(auth): RequireAccountant,
    Json(input): Json<PaymentInput>,
) -> AppResult<(StatusCode, Json<DataResponse<Payment>>)> {
    let payment_date = input.resolved_date(Utc::now().date_naive())?;
    let token = auth.upstream_token();
    let agent = state.payroll.get_agent(token, input.agent_id).await?;

    let payload = PaymentPayload {
        agent_id: agent.id,
        amount: input.amount,
        payment_date,
        status: PaymentStatus::Pending.as_str(),
    };
    let payment = state.payroll.create_payment(token, &payload).await?;

    tracing::info!(
        payment_id = payment.id,
        agent_id = agent.id,
        period = %payment.period,
        created_by = %auth.email(),
        "Payment recorded",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: payment })))
}

/// POST /api/v1/payments/{id}/complete
pub async fn complete_payment(
    State(state): State<AppState>,
    RequireAccountant(auth): RequireAccountant,
    Path(id): Path<EntityId>,
) -> AppResult<Json<DataResponse<Payment>>> {
    let payment = transition(&state, &auth, id, PaymentStatus::Completed).await?;
    Ok(Json(DataResponse { data: payment }))
}

/// POST /api/v1/payments/{id}/cancel
pub async fn cancel_payment(
    State(state): State<AppState>,
    RequireAccountant(auth): RequireAccountant,
    Path(id): Path<EntityId>,
) -> AppResult<Json<DataResponse<Payment>>> {
    let payment = transition(&state, &auth, id, PaymentStatus::Cancelled).await?;
    Ok(Json(DataResponse { data: payment }))
}

/// DELETE /api/v1/payments/{id}
pub async fn delete_payment(
    State(state): State<AppState>,
    RequireAccountant(auth): RequireAccountant,
    Path(id): Path<EntityId>,
) -> AppResult<StatusCode> {
    state.payroll.delete_payment(auth.upstream_token(), id).await?;
    tracing::info!(payment_id = id, deleted_by = %auth.email(), "Payment deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Fetch the payment, validate the lifecycle move and store the new status.
async fn transition(
    state: &AppState,
    auth: &AuthSession,
    id: EntityId,
    next: PaymentStatus,
) -> AppResult<Payment> {
    let token = auth.upstream_token();
    let current = state.payroll.get_payment(token, id).await?;
    let next = current.status.transition(next)?;
    let updated = state.payroll.set_payment_status(token, &current, next).await?;

    tracing::info!(
        payment_id = id,
        from = current.status.as_str(),
        to = next.as_str(),
        changed_by = %auth.email(),
        "Payment status changed",
    );

    Ok(updated)
}
