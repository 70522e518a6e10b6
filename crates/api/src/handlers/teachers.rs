//! Handlers for the `/teachers` resource.

use agentpay_client::api::TeacherQuery;
use agentpay_core::error::CoreError;
use agentpay_core::teacher::{Teacher, TeacherInput, TeacherUpdate};
use agentpay_core::types::EntityId;
use agentpay_core::validation::{clamp_limit, clamp_offset, validate_input};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthSession;
use crate::middleware::rbac::RequireAccountant;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /teachers`.
#[derive(Debug, Deserialize)]
pub struct TeacherListParams {
    pub search: Option<String>,
    pub establishment_id: Option<EntityId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// GET /api/v1/teachers?search=&establishment_id=&limit=&offset=
pub async fn list_teachers(
    State(state): State<AppState>,
    auth: AuthSession,
    Query(params): Query<TeacherListParams>,
) -> AppResult<Json<DataResponse<Vec<Teacher>>>> {
    let query = TeacherQuery {
        search: params
            .search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()),
        establishment_id: params.establishment_id,
        limit: clamp_limit(params.limit),
        offset: clamp_offset(params.offset),
    };
    let teachers = state
        .payroll
        .list_teachers(auth.upstream_token(), &query)
        .await?;
    Ok(Json(DataResponse { data: teachers }))
}

/// GET /api/v1/teachers/{id}
pub async fn get_teacher(
    State(state): State<AppState>,
    auth: AuthSession,
    Path(id): Path<EntityId>,
) -> AppResult<Json<DataResponse<Teacher>>> {
    let teacher = state.payroll.get_teacher(auth.upstream_token(), id).await?;
    Ok(Json(DataResponse { data: teacher }))
}

/// POST /api/v1/teachers
pub async fn create_teacher(
    State(state): State<AppState>,
    RequireAccountant(auth): RequireAccountant,
    Json(input): Json<TeacherInput>,
) -> AppResult<(StatusCode, Json<DataResponse<Teacher>>)> {
    validate_input(&input)?;
    let teacher = state
        .payroll
        .create_teacher(auth.upstream_token(), &input)
        .await?;
    tracing::info!(
        teacher_id = teacher.id,
        registration_number = %teacher.registration_number,
        "Teacher created",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: teacher })))
}

/// PUT /api/v1/teachers/{id}
///
/// Partial update; at least one field must be supplied.
pub async fn update_teacher(
    State(state): State<AppState>,
    RequireAccountant(auth): RequireAccountant,
    Path(id): Path<EntityId>,
    Json(update): Json<TeacherUpdate>,
) -> AppResult<Json<DataResponse<Teacher>>> {
    validate_input(&update)?;
    if update.is_empty() {
        return Err(CoreError::Validation("no fields to update".into()).into());
    }
    let teacher = state
        .payroll
        .update_teacher(auth.upstream_token(), id, &update)
        .await?;
    tracing::info!(teacher_id = id, "Teacher updated");
    Ok(Json(DataResponse { data: teacher }))
}

/// DELETE /api/v1/teachers/{id}
pub async fn delete_teacher(
    State(state): State<AppState>,
    RequireAccountant(auth): RequireAccountant,
    Path(id): Path<EntityId>,
) -> AppResult<StatusCode> {
    state.payroll.delete_teacher(auth.upstream_token(), id).await?;
    tracing::info!(teacher_id = id, "Teacher deleted");
    Ok(StatusCode::NO_CONTENT)
}
