//! Route definitions for the `/agents` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::agents;
use crate::state::AppState;

/// Routes mounted at `/agents`.
///
/// ```text
/// GET    /       -> list_agents
/// POST   /       -> create_agent (admin)
/// GET    /{id}   -> get_agent
/// PUT    /{id}   -> update_agent (admin)
/// DELETE /{id}   -> delete_agent (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(agents::list_agents).post(agents::create_agent))
        .route(
            "/{id}",
            get(agents::get_agent)
                .put(agents::update_agent)
                .delete(agents::delete_agent),
        )
}
