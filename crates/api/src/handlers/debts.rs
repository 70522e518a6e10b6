//! Handlers for the `/debts` resource.
//!
//! Creation runs the monthly affordability check against freshly fetched
//! backend state before anything is forwarded.

use agentpay_client::wire::DebtPayload;
use agentpay_core::affordability::{evaluate_for_agent, Evaluation};
use agentpay_core::debt::{ensure_month_open, Debt, DebtInput};
use agentpay_core::period::YearMonth;
use agentpay_core::types::{Amount, EntityId};
use agentpay_core::validation::validate_input;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthSession;
use crate::middleware::rbac::RequireAdmin;
use crate::query::parse_month_filter;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /debts`.
#[derive(Debug, Deserialize)]
pub struct DebtListParams {
    pub agent_id: Option<EntityId>,
    /// `YYYY-MM`.
    pub month: Option<String>,
}

/// Request body for `POST /debts/check`.
#[derive(Debug, Deserialize)]
pub struct DebtCheckRequest {
    pub agent_id: EntityId,
    #[serde(with = "agentpay_core::money::lenient")]
    pub amount: Amount,
    /// Month to evaluate; wins over `debt_date`.
    #[serde(default)]
    pub month: Option<YearMonth>,
    #[serde(default)]
    pub debt_date: Option<NaiveDate>,
}

impl DebtCheckRequest {
    fn target_month(&self, today: NaiveDate) -> YearMonth {
        match (self.month, self.debt_date) {
            (Some(month), _) => month,
            (None, Some(date)) => YearMonth::from_date(date),
            (None, None) => YearMonth::current(today),
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/debts?agent_id=&month=
pub async fn list_debts(
    State(state): State<AppState>,
    auth: AuthSession,
    Query(params): Query<DebtListParams>,
) -> AppResult<Json<DataResponse<Vec<Debt>>>> {
    let month = parse_month_filter(params.month.as_deref())?;
    let debts = state
        .payroll
        .list_debts(auth.upstream_token())
        .await?
        .into_iter()
        .filter(|d| params.agent_id.is_none_or(|id| d.agent_id == id))
        .filter(|d| month.is_none_or(|m| m.contains(d.debt_date)))
        .collect();
    Ok(Json(DataResponse { data: debts }))
}

/// POST /api/v1/debts/check
///
/// Dry-run affordability evaluation. Answers 200 whether or not the debt
/// would be accepted.
pub async fn check_debt(
    State(state): State<AppState>,
    auth: AuthSession,
    Json(input): Json<DebtCheckRequest>,
) -> AppResult<Json<DataResponse<Evaluation>>> {
    let target_month = input.target_month(Utc::now().date_naive());
    let token = auth.upstream_token();

    let (agent, debts) = tokio::try_join!(
        state.payroll.get_agent(token, input.agent_id),
        state.payroll.list_debts(token),
    )?;

    let evaluation = evaluate_for_agent(&agent, &debts, target_month, input.amount);

    tracing::debug!(
        agent_id = agent.id,
        target_month = %target_month,
        accepted = evaluation.accepted,
        "Debt affordability checked",
    );

    Ok(Json(DataResponse { data: evaluation }))
}

/// POST /api/v1/debts
///
/// Rejects with 409 when the month's payment is already completed and with
/// 422 `LIMIT_EXCEEDED` when the debt would break the monthly cap.
pub async fn create_debt(
    State(state): State<AppState>,
    RequireAdmin(auth): RequireAdmin,
    Json(input): Json<DebtInput>,
) -> AppResult<(StatusCode, Json<DataResponse<Debt>>)> {
    validate_input(&input)?;

    let today = Utc::now().date_naive();
    let debt_date = input.resolved_date(today);
    let target_month = input.target_month(today);
    let token = auth.upstream_token();

    let (agent, debts, payments) = tokio::try_join!(
        state.payroll.get_agent(token, input.agent_id),
        state.payroll.list_debts(token),
        state.payroll.list_payments(token),
    )?;

    ensure_month_open(&payments, agent.id, target_month)?;
    let evaluation = evaluate_for_agent(&agent, &debts, target_month, input.amount).into_result()?;

    let payload = DebtPayload {
        agent_id: agent.id,
        amount: input.amount,
        reason: input.reason.as_deref().map(str::trim).filter(|r| !r.is_empty()),
        debt_date,
    };
    let debt = state.payroll.create_debt(token, &payload).await?;

    tracing::info!(
        debt_id = debt.id,
        agent_id = agent.id,
        target_month = %target_month,
        remaining_salary = %evaluation.remaining_salary,
        created_by = %auth.email(),
        "Debt recorded",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: debt })))
}

/// DELETE /api/v1/debts/{id}
pub async fn delete_debt(
    State(state): State<AppState>,
    RequireAdmin(auth): RequireAdmin,
    Path(id): Path<EntityId>,
) -> AppResult<StatusCode> {
    state.payroll.delete_debt(auth.upstream_token(), id).await?;
    tracing::info!(debt_id = id, deleted_by = %auth.email(), "Debt deleted");
    Ok(StatusCode::NO_CONTENT)
}
