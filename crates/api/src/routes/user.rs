//! Route definitions for the `/user` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::preferences;
use crate::state::AppState;

/// Routes mounted at `/user`.
///
/// ```text
/// GET  /preferences  -> get_preferences
/// PUT  /preferences  -> update_preferences
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/preferences",
        get(preferences::get_preferences).put(preferences::update_preferences),
    )
}
