//! Handlers for the `/payslips` resource.
//!
//! `POST /payslips` asks the backend to compute and store a payslip;
//! `POST /payslips/preview` runs the same calculation locally without
//! storing anything.

use std::collections::{HashMap, HashSet};

use agentpay_client::api::PayslipQuery;
use agentpay_core::configuration::{PayElement, PayElementKind, PayZone};
use agentpay_core::error::CoreError;
use agentpay_core::payroll::{compute_payslip, PayrollBreakdown};
use agentpay_core::payslip::{Payslip, PayslipPayment, PayslipRequest, PayslipStatus};
use agentpay_core::period::YearMonth;
use agentpay_core::types::EntityId;
use agentpay_core::validation::{validate_input, validate_non_blank};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::middleware::auth::AuthSession;
use crate::middleware::rbac::{RequireAccountant, RequireAdmin};
use crate::response::{document_response, DataResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /payslips`.
#[derive(Debug, Deserialize)]
pub struct PayslipListParams {
    pub teacher_id: Option<EntityId>,
    pub month: Option<u32>,
    pub year: Option<i32>,
    /// `pending` or `paid`.
    pub status: Option<String>,
}

/// Locally computed payslip.
#[derive(Debug, Serialize)]
pub struct PayslipPreview {
    pub teacher_id: EntityId,
    pub teacher_name: String,
    pub period: YearMonth,
    pub grade: String,
    pub pay_zone: PayZone,
    #[serde(flatten)]
    pub breakdown: PayrollBreakdown,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/payslips?teacher_id=&month=&year=&status=
pub async fn list_payslips(
    State(state): State<AppState>,
    auth: AuthSession,
    Query(params): Query<PayslipListParams>,
) -> AppResult<Json<DataResponse<Vec<Payslip>>>> {
    if let Some(month) = params.month {
        if !(1..=12).contains(&month) {
            return Err(CoreError::Validation(format!("month {month} is out of range 1-12")).into());
        }
    }
    let status = params
        .status
        .as_deref()
        .map(PayslipStatus::parse_lenient)
        .transpose()?;

    let query = PayslipQuery {
        teacher_id: params.teacher_id,
        month: params.month,
        year: params.year,
        status,
    };
    let payslips = state
        .payroll
        .list_payslips(auth.upstream_token(), &query)
        .await?;
    Ok(Json(DataResponse { data: payslips }))
}

/// POST /api/v1/payslips
pub async fn compute_payslip_upstream(
    State(state): State<AppState>,
    RequireAccountant(auth): RequireAccountant,
    Json(input): Json<PayslipRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Payslip>>)> {
    validate_input(&input)?;
    input.period()?;
    let payslip = state
        .payroll
        .compute_payslip(auth.upstream_token(), &input)
        .await?;

    tracing::info!(
        payslip_id = payslip.id,
        teacher_id = payslip.teacher_id,
        period = %payslip.period,
        net = %payslip.net,
        "Payslip generated",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: payslip })))
}

/// POST /api/v1/payslips/preview
pub async fn preview_payslip(
    State(state): State<AppState>,
    auth: AuthSession,
    Json(input): Json<PayslipRequest>,
) -> AppResult<Json<DataResponse<PayslipPreview>>> {
    validate_input(&input)?;
    let period = input.period()?;
    let token = auth.upstream_token();

    let teacher = state.payroll.get_teacher(token, input.teacher_id).await?;
    let (grade, establishment, elements) = tokio::try_join!(
        state.payroll.get_grade(token, teacher.grade_id),
        state.payroll.get_establishment(token, teacher.establishment_id),
        state.payroll.list_elements(token, None),
    )?;

    let selected = select_elements(&elements, &input.gains, &input.deductions)?;
    let breakdown = compute_payslip(grade.base_salary, Some(establishment.pay_zone), &selected);

    Ok(Json(DataResponse {
        data: PayslipPreview {
            teacher_id: teacher.id,
            teacher_name: teacher.full_name(),
            period,
            grade: grade.label,
            pay_zone: establishment.pay_zone,
            breakdown,
        },
    }))
}

/// GET /api/v1/payslips/{id}
pub async fn get_payslip(
    State(state): State<AppState>,
    auth: AuthSession,
    Path(id): Path<EntityId>,
) -> AppResult<Json<DataResponse<Payslip>>> {
    let payslip = state.payroll.get_payslip(auth.upstream_token(), id).await?;
    Ok(Json(DataResponse { data: payslip }))
}

/// DELETE /api/v1/payslips/{id}
pub async fn delete_payslip(
    State(state): State<AppState>,
    RequireAdmin(auth): RequireAdmin,
    Path(id): Path<EntityId>,
) -> AppResult<StatusCode> {
    state.payroll.delete_payslip(auth.upstream_token(), id).await?;
    tracing::info!(payslip_id = id, deleted_by = %auth.email(), "Payslip deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/payslips/{id}/pay
///
/// A payslip can be paid once; paying it again is a conflict.
pub async fn pay_payslip(
    State(state): State<AppState>,
    RequireAccountant(auth): RequireAccountant,
    Path(id): Path<EntityId>,
    Json(input): Json<PayslipPayment>,
) -> AppResult<Json<DataResponse<Payslip>>> {
    validate_input(&input)?;
    validate_non_blank(&input.payment_method, "payment_method")?;
    let token = auth.upstream_token();

    let current = state.payroll.get_payslip(token, id).await?;
    if current.status == PayslipStatus::Paid {
        return Err(CoreError::Conflict(format!("payslip {id} is already paid")).into());
    }

    let payslip = state
        .payroll
        .pay_payslip(token, id, input.payment_method.trim())
        .await?;

    tracing::info!(
        payslip_id = id,
        payment_method = %input.payment_method,
        paid_by = %auth.email(),
        "Payslip paid",
    );

    Ok(Json(DataResponse { data: payslip }))
}

/// GET /api/v1/payslips/{id}/pdf
pub async fn payslip_pdf(
    State(state): State<AppState>,
    auth: AuthSession,
    Path(id): Path<EntityId>,
) -> AppResult<Response> {
    let doc = state.payroll.payslip_pdf(auth.upstream_token(), id).await?;
    Ok(document_response(doc, &format!("payslip_{id}.pdf")))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Resolve the requested gain and deduction ids against the element catalog.
///
/// Repeated ids count once, as the backend selects elements by id set.
/// Unknown ids are `NotFound`; an id listed under the wrong kind is a
/// validation error.
fn select_elements(
    catalog: &[PayElement],
    gains: &[EntityId],
    deductions: &[EntityId],
) -> Result<Vec<PayElement>, CoreError> {
    let by_id: HashMap<EntityId, &PayElement> = catalog.iter().map(|e| (e.id, e)).collect();

    let mut seen = HashSet::new();
    let mut selected = Vec::with_capacity(gains.len() + deductions.len());
    for (ids, kind) in [
        (gains, PayElementKind::Gain),
        (deductions, PayElementKind::Deduction),
    ] {
        for id in ids {
            let element = by_id.get(id).ok_or(CoreError::NotFound {
                entity: "PayElement",
                id: *id,
            })?;
            if element.kind != kind {
                return Err(CoreError::Validation(format!(
                    "pay element {id} is a {}, not a {kind}",
                    element.kind
                )));
            }
            if seen.insert(*id) {
                selected.push((*element).clone());
            }
        }
    }
    Ok(selected)
}
