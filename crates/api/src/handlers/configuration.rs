//! Handlers for payroll configuration: grades, pay elements, provinces and
//! establishments.

use agentpay_core::configuration::{
    Establishment, EstablishmentInput, Grade, GradeInput, PayElement, PayElementInput,
    PayElementKind, Province, ProvinceInput,
};
use agentpay_core::types::EntityId;
use agentpay_core::validation::validate_input;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthSession;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Grades
// ---------------------------------------------------------------------------

/// GET /api/v1/grades
pub async fn list_grades(
    State(state): State<AppState>,
    auth: AuthSession,
) -> AppResult<Json<DataResponse<Vec<Grade>>>> {
    let grades = state.payroll.list_grades(auth.upstream_token()).await?;
    Ok(Json(DataResponse { data: grades }))
}

/// GET /api/v1/grades/{id}
pub async fn get_grade(
    State(state): State<AppState>,
    auth: AuthSession,
    Path(id): Path<EntityId>,
) -> AppResult<Json<DataResponse<Grade>>> {
    let grade = state.payroll.get_grade(auth.upstream_token(), id).await?;
    Ok(Json(DataResponse { data: grade }))
}

/// POST /api/v1/grades
pub async fn create_grade(
    State(state): State<AppState>,
    RequireAdmin(auth): RequireAdmin,
    Json(input): Json<GradeInput>,
) -> AppResult<(StatusCode, Json<DataResponse<Grade>>)> {
    validate_input(&input)?;
    let grade = state.payroll.create_grade(auth.upstream_token(), &input).await?;
    tracing::info!(grade_id = grade.id, label = %grade.label, "Grade created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: grade })))
}

/// PUT /api/v1/grades/{id}
pub async fn update_grade(
    State(state): State<AppState>,
    RequireAdmin(auth): RequireAdmin,
    Path(id): Path<EntityId>,
    Json(input): Json<GradeInput>,
) -> AppResult<Json<DataResponse<Grade>>> {
    validate_input(&input)?;
    let grade = state
        .payroll
        .update_grade(auth.upstream_token(), id, &input)
        .await?;
    tracing::info!(grade_id = id, "Grade updated");
    Ok(Json(DataResponse { data: grade }))
}

/// DELETE /api/v1/grades/{id}
pub async fn delete_grade(
    State(state): State<AppState>,
    RequireAdmin(auth): RequireAdmin,
    Path(id): Path<EntityId>,
) -> AppResult<StatusCode> {
    state.payroll.delete_grade(auth.upstream_token(), id).await?;
    tracing::info!(grade_id = id, "Grade deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Pay elements
// ---------------------------------------------------------------------------

/// Query parameters for `GET /pay-elements`.
#[derive(Debug, Deserialize)]
pub struct PayElementParams {
    /// `gain` or `deduction`.
    pub kind: Option<String>,
}

/// GET /api/v1/pay-elements?kind=
pub async fn list_pay_elements(
    State(state): State<AppState>,
    auth: AuthSession,
    Query(params): Query<PayElementParams>,
) -> AppResult<Json<DataResponse<Vec<PayElement>>>> {
    let kind = params
        .kind
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(PayElementKind::parse_lenient)
        .transpose()?;
    let elements = state
        .payroll
        .list_elements(auth.upstream_token(), kind)
        .await?;
    Ok(Json(DataResponse { data: elements }))
}

/// GET /api/v1/pay-elements/{id}
pub async fn get_pay_element(
    State(state): State<AppState>,
    auth: AuthSession,
    Path(id): Path<EntityId>,
) -> AppResult<Json<DataResponse<PayElement>>> {
    let element = state.payroll.get_element(auth.upstream_token(), id).await?;
    Ok(Json(DataResponse { data: element }))
}

/// POST /api/v1/pay-elements
pub async fn create_pay_element(
    State(state): State<AppState>,
    RequireAdmin(auth): RequireAdmin,
    Json(input): Json<PayElementInput>,
) -> AppResult<(StatusCode, Json<DataResponse<PayElement>>)> {
    validate_input(&input)?;
    let element = state
        .payroll
        .create_element(auth.upstream_token(), &input)
        .await?;
    tracing::info!(element_id = element.id, kind = %element.kind, "Pay element created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: element })))
}

// ---------------------------------------------------------------------------
// Provinces
// ---------------------------------------------------------------------------

/// GET /api/v1/provinces
pub async fn list_provinces(
    State(state): State<AppState>,
    auth: AuthSession,
) -> AppResult<Json<DataResponse<Vec<Province>>>> {
    let provinces = state.payroll.list_provinces(auth.upstream_token()).await?;
    Ok(Json(DataResponse { data: provinces }))
}

/// POST /api/v1/provinces
pub async fn create_province(
    State(state): State<AppState>,
    RequireAdmin(auth): RequireAdmin,
    Json(input): Json<ProvinceInput>,
) -> AppResult<(StatusCode, Json<DataResponse<Province>>)> {
    validate_input(&input)?;
    let province = state
        .payroll
        .create_province(auth.upstream_token(), &input)
        .await?;
    tracing::info!(province_id = province.id, "Province created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: province })))
}

// ---------------------------------------------------------------------------
// Establishments
// ---------------------------------------------------------------------------

/// GET /api/v1/establishments
pub async fn list_establishments(
    State(state): State<AppState>,
    auth: AuthSession,
) -> AppResult<Json<DataResponse<Vec<Establishment>>>> {
    let establishments = state
        .payroll
        .list_establishments(auth.upstream_token())
        .await?;
    Ok(Json(DataResponse {
        data: establishments,
    }))
}

/// GET /api/v1/establishments/{id}
pub async fn get_establishment(
    State(state): State<AppState>,
    auth: AuthSession,
    Path(id): Path<EntityId>,
) -> AppResult<Json<DataResponse<Establishment>>> {
    let establishment = state
        .payroll
        .get_establishment(auth.upstream_token(), id)
        .await?;
    Ok(Json(DataResponse {
        data: establishment,
    }))
}

/// POST /api/v1/establishments
pub async fn create_establishment(
    State(state): State<AppState>,
    RequireAdmin(auth): RequireAdmin,
    Json(input): Json<EstablishmentInput>,
) -> AppResult<(StatusCode, Json<DataResponse<Establishment>>)> {
    validate_input(&input)?;
    let establishment = state
        .payroll
        .create_establishment(auth.upstream_token(), &input)
        .await?;
    tracing::info!(
        establishment_id = establishment.id,
        province_id = establishment.province_id,
        "Establishment created",
    );
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: establishment,
        }),
    ))
}
