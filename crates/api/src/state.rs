use std::sync::Arc;

use agentpay_client::PayrollApi;

use crate::config::ServerConfig;
use crate::session::SessionStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Client for the external payroll backend.
    pub payroll: Arc<PayrollApi>,
    /// Active dashboard sessions.
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(config: ServerConfig, payroll: PayrollApi) -> Self {
        let sessions = SessionStore::new(config.session_ttl());
        Self {
            config: Arc::new(config),
            payroll: Arc::new(payroll),
            sessions: Arc::new(sessions),
        }
    }
}
