//! Route definitions for the `/reports` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::reports;
use crate::state::AppState;

/// Routes mounted at `/reports`.
///
/// ```text
/// GET /dashboard     -> dashboard (?type=&month=&year=)
/// GET /agents/pdf    -> agents_pdf
/// GET /debts/pdf     -> debts_pdf
/// GET /payslip/pdf   -> payslip_pdf (?agent_id=&type=&month=&year=)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(reports::dashboard))
        .route("/agents/pdf", get(reports::agents_pdf))
        .route("/debts/pdf", get(reports::debts_pdf))
        .route("/payslip/pdf", get(reports::payslip_pdf))
}
