//! Handlers for the `/reports` resource: dashboard figures and PDF exports.

use agentpay_core::reporting::{dashboard_stats, DashboardStats};
use agentpay_core::types::EntityId;
use axum::extract::{Query, State};
use axum::response::Response;
use axum::Json;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthSession;
use crate::query::PeriodParams;
use crate::response::{document_response, DataResponse};
use crate::state::AppState;

/// Query parameters for `GET /reports/payslip/pdf`.
#[derive(Debug, Deserialize)]
pub struct PayslipReportParams {
    pub agent_id: EntityId,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub month: Option<String>,
    pub year: Option<i32>,
}

impl PayslipReportParams {
    fn period_params(&self) -> PeriodParams {
        PeriodParams {
            kind: self.kind.clone(),
            month: self.month.clone(),
            year: self.year,
        }
    }
}

/// GET /api/v1/reports/dashboard?type=&month=&year=
pub async fn dashboard(
    State(state): State<AppState>,
    auth: AuthSession,
    Query(params): Query<PeriodParams>,
) -> AppResult<Json<DataResponse<DashboardStats>>> {
    let period = params.period()?;
    let token = auth.upstream_token();

    let (agents, debts, payments) = tokio::try_join!(
        state.payroll.list_agents(token),
        state.payroll.list_debts(token),
        state.payroll.list_payments(token),
    )?;

    let stats = dashboard_stats(period, &agents, &debts, &payments);
    tracing::debug!(
        period_type = stats.period_type,
        period = %stats.period,
        agents = stats.agent_count,
        debts = stats.debt_count,
        "Dashboard computed",
    );

    Ok(Json(DataResponse { data: stats }))
}

/// GET /api/v1/reports/agents/pdf
pub async fn agents_pdf(State(state): State<AppState>, auth: AuthSession) -> AppResult<Response> {
    let doc = state.payroll.agents_report_pdf(auth.upstream_token()).await?;
    Ok(document_response(doc, "agents_report.pdf"))
}

/// GET /api/v1/reports/debts/pdf
pub async fn debts_pdf(State(state): State<AppState>, auth: AuthSession) -> AppResult<Response> {
    let doc = state.payroll.debts_report_pdf(auth.upstream_token()).await?;
    Ok(document_response(doc, "debts_report.pdf"))
}

/// GET /api/v1/reports/payslip/pdf?agent_id=&type=&month=&year=
///
/// The period is validated before anything is forwarded.
pub async fn payslip_pdf(
    State(state): State<AppState>,
    auth: AuthSession,
    Query(params): Query<PayslipReportParams>,
) -> AppResult<Response> {
    let period = params.period_params().period()?;
    let doc = state
        .payroll
        .payslip_report_pdf(auth.upstream_token(), params.agent_id, &period)
        .await?;
    Ok(document_response(
        doc,
        &format!("payslip_{}_{}.pdf", params.agent_id, period.label()),
    ))
}
