//! Route definitions for the `/debts` resource.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::debts;
use crate::state::AppState;

/// Routes mounted at `/debts`.
///
/// ```text
/// GET    /        -> list_debts
/// POST   /        -> create_debt (admin)
/// POST   /check   -> check_debt
/// DELETE /{id}    -> delete_debt (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(debts::list_debts).post(debts::create_debt))
        .route("/check", post(debts::check_debt))
        .route("/{id}", delete(debts::delete_debt))
}
