pub mod agents;
pub mod auth;
pub mod configuration;
pub mod debts;
pub mod health;
pub mod payments;
pub mod payslips;
pub mod reports;
pub mod teachers;
pub mod user;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                       login (public)
/// /auth/logout                      logout (session)
/// /auth/me                          current user (session)
///
/// /user/preferences                 get, update (session)
///
/// /agents                           list, create (admin)
/// /agents/{id}                      get, update, delete (admin)
///
/// /debts                            list, create (admin, policy-checked)
/// /debts/check                      affordability dry run (POST)
/// /debts/{id}                       delete (admin)
///
/// /payments                         list, create (accountant)
/// /payments/{id}                    get, delete (accountant)
/// /payments/{id}/complete           pending -> completed (POST)
/// /payments/{id}/cancel             pending -> cancelled (POST)
///
/// /grades                           list, create (admin)
/// /grades/{id}                      get, update, delete (admin)
/// /pay-elements                     list, create (admin)
/// /pay-elements/{id}                get
/// /provinces                        list, create (admin)
/// /establishments                   list, create (admin)
/// /establishments/{id}              get
///
/// /teachers                         list, create (accountant)
/// /teachers/{id}                    get, update, delete (accountant)
///
/// /payslips                         list, compute via backend (accountant)
/// /payslips/preview                 local computation (POST)
/// /payslips/{id}                    get, delete (admin)
/// /payslips/{id}/pay                mark paid (accountant)
/// /payslips/{id}/pdf                PDF download
///
/// /reports/dashboard                dashboard figures
/// /reports/agents/pdf               agents PDF
/// /reports/debts/pdf                debts PDF
/// /reports/payslip/pdf              per-agent payslip PDF for a period
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/user", user::router())
        .nest("/agents", agents::router())
        .nest("/debts", debts::router())
        .nest("/payments", payments::router())
        .nest("/grades", configuration::grades_router())
        .nest("/pay-elements", configuration::pay_elements_router())
        .nest("/provinces", configuration::provinces_router())
        .nest("/establishments", configuration::establishments_router())
        .nest("/teachers", teachers::router())
        .nest("/payslips", payslips::router())
        .nest("/reports", reports::router())
}
