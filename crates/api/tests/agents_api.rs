//! Integration tests for the `/agents` resource.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get_auth, login, VIEWER_EMAIL};

#[tokio::test]
async fn list_normalizes_backend_amounts() {
    let app = common::spawn_app().await;
    let token = login(&app, VIEWER_EMAIL).await;

    let response = get_auth(&app, "/api/v1/agents", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let agents = json["data"].as_array().unwrap();
    assert_eq!(agents.len(), 2);
    assert_eq!(agents[0]["salary"], 1000.0);
    assert_eq!(agents[1]["salary"], 500.0);
}

#[tokio::test]
async fn get_unknown_agent_is_404() {
    let app = common::spawn_app().await;
    let token = login(&app, VIEWER_EMAIL).await;

    let response = get_auth(&app, "/api/v1/agents/2", &token).await;
    assert_eq!(body_json(response).await["data"]["name"], "Baraka");

    let response = get_auth(&app, "/api/v1/agents/99", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "Agent with id 99 not found");
}

#[tokio::test]
async fn only_admins_delete_agents() {
    let app = common::spawn_app().await;
    let token = login(&app, VIEWER_EMAIL).await;

    let response = delete_auth(&app, "/api/v1/agents/1", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
