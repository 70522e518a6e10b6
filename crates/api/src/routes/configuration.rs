//! Route definitions for payroll configuration resources.

use axum::routing::get;
use axum::Router;

use crate::handlers::configuration;
use crate::state::AppState;

/// Routes mounted at `/grades`.
///
/// ```text
/// GET    /       -> list_grades
/// POST   /       -> create_grade (admin)
/// GET    /{id}   -> get_grade
/// PUT    /{id}   -> update_grade (admin)
/// DELETE /{id}   -> delete_grade (admin)
/// ```
pub fn grades_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(configuration::list_grades).post(configuration::create_grade),
        )
        .route(
            "/{id}",
            get(configuration::get_grade)
                .put(configuration::update_grade)
                .delete(configuration::delete_grade),
        )
}

/// Routes mounted at `/pay-elements`.
///
/// ```text
/// GET  /       -> list_pay_elements (?kind=gain|deduction)
/// POST /       -> create_pay_element (admin)
/// GET  /{id}   -> get_pay_element
/// ```
pub fn pay_elements_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(configuration::list_pay_elements).post(configuration::create_pay_element),
        )
        .route("/{id}", get(configuration::get_pay_element))
}

/// Routes mounted at `/provinces`.
pub fn provinces_router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(configuration::list_provinces).post(configuration::create_province),
    )
}

/// Routes mounted at `/establishments`.
///
/// ```text
/// GET  /       -> list_establishments
/// POST /       -> create_establishment (admin)
/// GET  /{id}   -> get_establishment
/// ```
pub fn establishments_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(configuration::list_establishments).post(configuration::create_establishment),
        )
        .route("/{id}", get(configuration::get_establishment))
}
