//! Route definitions for the `/payments` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::payments;
use crate::state::AppState;

/// Routes mounted at `/payments`.
///
/// ```text
/// GET    /                -> list_payments
/// POST   /                -> create_payment (accountant)
/// GET    /{id}            -> get_payment
/// DELETE /{id}            -> delete_payment (accountant)
/// POST   /{id}/complete   -> complete_payment (accountant)
/// POST   /{id}/cancel     -> cancel_payment (accountant)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(payments::list_payments).post(payments::create_payment))
        .route(
            "/{id}",
            get(payments::get_payment).delete(payments::delete_payment),
        )
        .route("/{id}/complete", post(payments::complete_payment))
        .route("/{id}/cancel", post(payments::cancel_payment))
}
