//! Route definitions for the `/payslips` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::payslips;
use crate::state::AppState;

/// Routes mounted at `/payslips`.
///
/// ```text
/// GET    /            -> list_payslips
/// POST   /            -> compute_payslip_upstream (accountant)
/// POST   /preview     -> preview_payslip
/// GET    /{id}        -> get_payslip
/// DELETE /{id}        -> delete_payslip (admin)
/// POST   /{id}/pay    -> pay_payslip (accountant)
/// GET    /{id}/pdf    -> payslip_pdf
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(payslips::list_payslips).post(payslips::compute_payslip_upstream),
        )
        .route("/preview", post(payslips::preview_payslip))
        .route(
            "/{id}",
            get(payslips::get_payslip).delete(payslips::delete_payslip),
        )
        .route("/{id}/pay", post(payslips::pay_payslip))
        .route("/{id}/pdf", get(payslips::payslip_pdf))
}
