#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use agentpay_api::config::{LogFormat, ServerConfig, UpstreamConfig};
use agentpay_api::routes;
use agentpay_api::state::AppState;
use agentpay_client::PayrollApi;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::header::{AUTHORIZATION, CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderName, Method, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing;
use axum::{Json, Router};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

pub const ADMIN_EMAIL: &str = "admin@school.com";
pub const ACCOUNTANT_EMAIL: &str = "accountant@school.com";
pub const VIEWER_EMAIL: &str = "viewer@school.com";
pub const PASSWORD: &str = "123456";

const UPSTREAM_TOKEN: &str = "upstream-token";

// ---------------------------------------------------------------------------
// Application under test
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` pointing at `upstream_url`.
pub fn test_config(upstream_url: &str) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        upstream: UpstreamConfig {
            api_url: upstream_url.to_string(),
            timeout_secs: 5,
        },
        session_ttl_hours: 8,
        session_sweep_interval_secs: 300,
        log_format: LogFormat::Text,
    }
}

/// Build the full application router with all middleware layers.
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack that production uses.
pub fn build_test_app(upstream_url: &str) -> Router {
    let config = test_config(upstream_url);
    let payroll = PayrollApi::new(config.upstream.api_url.clone(), config.upstream.timeout())
        .expect("payroll client");
    let state = AppState::new(config, payroll);

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(CompressionLayer::new())
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

/// Start a fake payroll backend and build the app against it.
pub async fn spawn_app() -> Router {
    let upstream = spawn_upstream().await;
    build_test_app(&upstream)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response {
    let request = Request::get(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_auth(app: &Router, uri: &str, token: &str) -> Response {
    let request = Request::get(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> Response {
    let request = Request::post(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json_auth(app: &Router, uri: &str, body: Value, token: &str) -> Response {
    let request = Request::post(uri)
        .header(CONTENT_TYPE, "application/json")
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn put_json_auth(app: &Router, uri: &str, body: Value, token: &str) -> Response {
    let request = Request::put(uri)
        .header(CONTENT_TYPE, "application/json")
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn delete_auth(app: &Router, uri: &str, token: &str) -> Response {
    let request = Request::delete(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

pub async fn body_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// Log in through the app and return the dashboard session token.
pub async fn login(app: &Router, email: &str) -> String {
    let response = post_json(
        app,
        "/api/v1/auth/login",
        json!({ "email": email, "password": PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK, "login as {email}");
    body_json(response).await["data"]["token"]
        .as_str()
        .unwrap()
        .to_string()
}

// ---------------------------------------------------------------------------
// Fake payroll backend
// ---------------------------------------------------------------------------

/// In-memory records served by the fake backend, in its wire format.
struct Store {
    agents: Vec<Value>,
    debts: Vec<Value>,
    payments: Vec<Value>,
    next_id: i64,
}

type Shared = Arc<Mutex<Store>>;

fn seed() -> Store {
    Store {
        agents: vec![
            json!({ "id": 1, "name": "Amani", "role": "Teacher", "salary": "1000" }),
            json!({ "id": 2, "name": "Baraka", "role": "Driver", "salary": 500 }),
        ],
        debts: vec![json!({
            "id": 1, "agent_id": 1, "amount": "700.00", "reason": "loan", "debt_date": "2025-06-03"
        })],
        payments: vec![
            json!({
                "id": 1, "agent_id": 1, "amount": 900, "status": "pending",
                "payment_date": "2025-06-28"
            }),
            json!({
                "id": 2, "agent_id": 2, "amount": 500, "status": "Paid",
                "payment_date": "2025-05-28"
            }),
        ],
        next_id: 100,
    }
}

fn authorized(headers: &HeaderMap) -> Result<(), Response> {
    let expected = format!("Bearer {UPSTREAM_TOKEN}");
    match headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some(value) if value == expected => Ok(()),
        _ => Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "Not authenticated" })),
        )
            .into_response()),
    }
}

fn not_found(what: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "detail": format!("{what} not found") })),
    )
        .into_response()
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "payroll backend" }))
}

async fn upstream_login(Json(body): Json<Value>) -> Response {
    let role = match body["email"].as_str() {
        Some(ADMIN_EMAIL) => "admin",
        Some(ACCOUNTANT_EMAIL) => "accountant",
        Some(VIEWER_EMAIL) => "viewer",
        _ => "",
    };
    if role.is_empty() || body["password"] != PASSWORD {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "Invalid credentials" })),
        )
            .into_response();
    }
    Json(json!({
        "access_token": UPSTREAM_TOKEN,
        "token_type": "bearer",
        "user": { "email": body["email"], "role": role, "name": "Staff" }
    }))
    .into_response()
}

fn list_collection(
    store: &Shared,
    headers: &HeaderMap,
    pick: fn(&Store) -> &Vec<Value>,
) -> Response {
    if let Err(rejection) = authorized(headers) {
        return rejection;
    }
    let store = store.lock().unwrap();
    Json(Value::Array(pick(&store).clone())).into_response()
}

async fn list_agents(State(store): State<Shared>, headers: HeaderMap) -> Response {
    list_collection(&store, &headers, |s| &s.agents)
}

async fn list_debts(State(store): State<Shared>, headers: HeaderMap) -> Response {
    list_collection(&store, &headers, |s| &s.debts)
}

async fn list_payments(State(store): State<Shared>, headers: HeaderMap) -> Response {
    list_collection(&store, &headers, |s| &s.payments)
}

async fn create_debt(
    State(store): State<Shared>,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> Response {
    if let Err(rejection) = authorized(&headers) {
        return rejection;
    }
    let mut store = store.lock().unwrap();
    store.next_id += 1;
    body["id"] = json!(store.next_id);
    store.debts.push(body.clone());
    Json(body).into_response()
}

async fn delete_debt(
    State(store): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    if let Err(rejection) = authorized(&headers) {
        return rejection;
    }
    let mut store = store.lock().unwrap();
    let before = store.debts.len();
    store.debts.retain(|d| d["id"] != id);
    if store.debts.len() == before {
        return Json(json!({ "error": "Debt not found" })).into_response();
    }
    Json(json!({ "message": "Debt deleted" })).into_response()
}

async fn create_payment(
    State(store): State<Shared>,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> Response {
    if let Err(rejection) = authorized(&headers) {
        return rejection;
    }
    let mut store = store.lock().unwrap();
    store.next_id += 1;
    body["id"] = json!(store.next_id);
    store.payments.push(body.clone());
    Json(body).into_response()
}

async fn get_payment(
    State(store): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    if let Err(rejection) = authorized(&headers) {
        return rejection;
    }
    let store = store.lock().unwrap();
    match store.payments.iter().find(|p| p["id"] == id) {
        Some(payment) => Json(payment.clone()).into_response(),
        None => not_found("Payment"),
    }
}

async fn replace_payment(
    State(store): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(mut body): Json<Value>,
) -> Response {
    if let Err(rejection) = authorized(&headers) {
        return rejection;
    }
    let mut store = store.lock().unwrap();
    match store.payments.iter_mut().find(|p| p["id"] == id) {
        Some(payment) => {
            body["id"] = json!(id);
            *payment = body.clone();
            Json(body).into_response()
        }
        None => not_found("Payment"),
    }
}

async fn get_grade(headers: HeaderMap, Path(id): Path<i64>) -> Response {
    if let Err(rejection) = authorized(&headers) {
        return rejection;
    }
    if id != 1 {
        return not_found("Grade");
    }
    Json(json!({ "id": 1, "libelle": "A1", "salaire_base": 100000 })).into_response()
}

async fn get_establishment(headers: HeaderMap, Path(id): Path<i64>) -> Response {
    if let Err(rejection) = authorized(&headers) {
        return rejection;
    }
    if id != 1 {
        return not_found("Etablissement");
    }
    Json(json!({ "id": 1, "nom_ecole": "EP Tumaini", "province_id": 1, "zone_paie": "Rurale" }))
        .into_response()
}

async fn list_elements(headers: HeaderMap) -> Response {
    if let Err(rejection) = authorized(&headers) {
        return rejection;
    }
    Json(json!([
        { "id": 1, "nom_element": "Prime de brousse", "type": "Gain", "montant_fixe": 10000 },
        { "id": 2, "nom_element": "Avance sur salaire", "type": "Retenue", "montant_fixe": "5000" }
    ]))
    .into_response()
}

async fn get_teacher(headers: HeaderMap, Path(id): Path<i64>) -> Response {
    if let Err(rejection) = authorized(&headers) {
        return rejection;
    }
    if id != 1 {
        return not_found("Enseignant");
    }
    Json(json!({
        "id": 1,
        "matricule_dinacope": "M-001",
        "nom": "Mukendi",
        "prenom": "Jean",
        "grade_id": 1,
        "ecole_id": 1,
        "telephone": null,
        "email": null
    }))
    .into_response()
}

async fn agents_pdf(headers: HeaderMap) -> Response {
    if let Err(rejection) = authorized(&headers) {
        return rejection;
    }
    (
        [
            (CONTENT_TYPE, "application/pdf"),
            (CONTENT_DISPOSITION, "attachment; filename=\"agents_report.pdf\""),
        ],
        b"%PDF-1.4 agents".to_vec(),
    )
        .into_response()
}

async fn payslip_report_pdf(headers: HeaderMap) -> Response {
    if let Err(rejection) = authorized(&headers) {
        return rejection;
    }
    ([(CONTENT_TYPE, "application/pdf")], b"%PDF-1.4 payslip".to_vec()).into_response()
}

/// Bind the fake backend on an ephemeral port and return its base URL.
pub async fn spawn_upstream() -> String {
    let store: Shared = Arc::new(Mutex::new(seed()));

    let router = Router::new()
        .route("/", routing::get(root))
        .route("/login", routing::post(upstream_login))
        .route("/agents/", routing::get(list_agents))
        .route("/debts/", routing::get(list_debts).post(create_debt))
        .route("/debts/{id}", axum::routing::delete(delete_debt))
        .route("/payments/", routing::get(list_payments).post(create_payment))
        .route("/payments/{id}", routing::get(get_payment).put(replace_payment))
        .route("/grades/{id}", routing::get(get_grade))
        .route("/etablissements/{id}", routing::get(get_establishment))
        .route("/elements/", routing::get(list_elements))
        .route("/enseignants/{id}", routing::get(get_teacher))
        .route("/reports/agents/pdf", routing::get(agents_pdf))
        .route("/reports/payslip/pdf", routing::get(payslip_report_pdf))
        .with_state(store);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}
