//! Handlers for the `/agents` resource.

use agentpay_core::agent::{Agent, AgentInput};
use agentpay_core::types::EntityId;
use agentpay_core::validation::validate_input;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::error::AppResult;
use crate::middleware::auth::AuthSession;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/agents
pub async fn list_agents(
    State(state): State<AppState>,
    auth: AuthSession,
) -> AppResult<Json<DataResponse<Vec<Agent>>>> {
    let agents = state.payroll.list_agents(auth.upstream_token()).await?;
    Ok(Json(DataResponse { data: agents }))
}

/// GET /api/v1/agents/{id}
pub async fn get_agent(
    State(state): State<AppState>,
    auth: AuthSession,
    Path(id): Path<EntityId>,
) -> AppResult<Json<DataResponse<Agent>>> {
    let agent = state.payroll.get_agent(auth.upstream_token(), id).await?;
    Ok(Json(DataResponse { data: agent }))
}

/// POST /api/v1/agents
pub async fn create_agent(
    State(state): State<AppState>,
    RequireAdmin(auth): RequireAdmin,
    Json(input): Json<AgentInput>,
) -> AppResult<(StatusCode, Json<DataResponse<Agent>>)> {
    validate_input(&input)?;
    let agent = state
        .payroll
        .create_agent(auth.upstream_token(), &input)
        .await?;

    tracing::info!(agent_id = agent.id, created_by = %auth.email(), "Agent created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: agent })))
}

/// PUT /api/v1/agents/{id}
pub async fn update_agent(
    State(state): State<AppState>,
    RequireAdmin(auth): RequireAdmin,
    Path(id): Path<EntityId>,
    Json(input): Json<AgentInput>,
) -> AppResult<Json<DataResponse<Agent>>> {
    validate_input(&input)?;
    let agent = state
        .payroll
        .update_agent(auth.upstream_token(), id, &input)
        .await?;

    tracing::info!(agent_id = id, updated_by = %auth.email(), "Agent updated");

    Ok(Json(DataResponse { data: agent }))
}

/// DELETE /api/v1/agents/{id}
pub async fn delete_agent(
    State(state): State<AppState>,
    RequireAdmin(auth): RequireAdmin,
    Path(id): Path<EntityId>,
) -> AppResult<StatusCode> {
    state.payroll.delete_agent(auth.upstream_token(), id).await?;
    tracing::info!(agent_id = id, deleted_by = %auth.email(), "Agent deleted");
    Ok(StatusCode::NO_CONTENT)
}
