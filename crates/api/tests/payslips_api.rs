//! Integration tests for the local payslip preview.
//!
//! Teacher 1 is on grade A1 (base 100 000) in a rural establishment.

mod common;

use axum::http::StatusCode;
use common::{body_json, login, post_json_auth, VIEWER_EMAIL};
use serde_json::json;

#[tokio::test]
async fn preview_applies_rural_uplift_and_statutory_deductions() {
    let app = common::spawn_app().await;
    let token = login(&app, VIEWER_EMAIL).await;

    let response = post_json_auth(
        &app,
        "/api/v1/payslips/preview",
        json!({ "teacher_id": 1, "month": 6, "year": 2025, "gains": [1], "deductions": [2] }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let preview = body_json(response).await["data"].clone();
    assert_eq!(preview["teacher_name"], "Mukendi Jean");
    assert_eq!(preview["period"], "2025-06");
    assert_eq!(preview["grade"], "A1");
    assert_eq!(preview["pay_zone"], "rural");
    assert_eq!(preview["base_salary"], 100000.0);
    assert_eq!(preview["total_gains"], 12000.0);
    assert_eq!(preview["gross"], 112000.0);
    assert_eq!(preview["cnss"], 5600.0);
    // CNSS, IPR, then the selected deduction.
    assert_eq!(preview["lines"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn preview_counts_repeated_elements_once() {
    let app = common::spawn_app().await;
    let token = login(&app, VIEWER_EMAIL).await;

    let response = post_json_auth(
        &app,
        "/api/v1/payslips/preview",
        json!({ "teacher_id": 1, "month": 6, "year": 2025, "gains": [1, 1], "deductions": [2, 2] }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let preview = body_json(response).await["data"].clone();
    assert_eq!(preview["total_gains"], 12000.0);
    assert_eq!(preview["gross"], 112000.0);
    assert_eq!(preview["lines"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn preview_with_unknown_element_is_404() {
    let app = common::spawn_app().await;
    let token = login(&app, VIEWER_EMAIL).await;

    let response = post_json_auth(
        &app,
        "/api/v1/payslips/preview",
        json!({ "teacher_id": 1, "month": 6, "year": 2025, "gains": [42] }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "PayElement with id 42 not found");
}

#[tokio::test]
async fn preview_rejects_a_deduction_listed_as_gain() {
    let app = common::spawn_app().await;
    let token = login(&app, VIEWER_EMAIL).await;

    let response = post_json_auth(
        &app,
        "/api/v1/payslips/preview",
        json!({ "teacher_id": 1, "month": 6, "year": 2025, "gains": [2] }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn preview_rejects_out_of_range_month() {
    let app = common::spawn_app().await;
    let token = login(&app, VIEWER_EMAIL).await;

    let response = post_json_auth(
        &app,
        "/api/v1/payslips/preview",
        json!({ "teacher_id": 1, "month": 13, "year": 2025 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn preview_for_unknown_teacher_is_404() {
    let app = common::spawn_app().await;
    let token = login(&app, VIEWER_EMAIL).await;

    let response = post_json_auth(
        &app,
        "/api/v1/payslips/preview",
        json!({ "teacher_id": 7, "month": 6, "year": 2025 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
