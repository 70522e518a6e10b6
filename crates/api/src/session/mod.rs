//! Server-held dashboard sessions.
//!
//! A session binds an opaque token to the backend's bearer token, the
//! signed-in user and their UI preferences. Only token hashes are stored.

pub mod preferences;
pub mod token;

use std::collections::HashMap;

use agentpay_client::wire::UpstreamUser;
use agentpay_core::types::Timestamp;
use chrono::Utc;
use serde::Serialize;
use tokio::sync::RwLock;

pub use preferences::{Locale, Preferences, PreferencesUpdate, Theme};
use token::{generate_session_token, hash_session_token};

/// The signed-in staff member as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionUser {
    pub email: String,
    pub name: Option<String>,
    pub role: String,
}

impl From<UpstreamUser> for SessionUser {
    fn from(user: UpstreamUser) -> Self {
        Self {
            email: user.email,
            name: user.name,
            role: user.role.trim().to_ascii_lowercase(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    pub user: SessionUser,
    /// Bearer token forwarded to the backend on every call.
    pub upstream_token: String,
    pub preferences: Preferences,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
}

impl Session {
    pub fn is_expired(&self, now: Timestamp) -> bool {
        now >= self.expires_at
    }
}

/// In-memory session store.
///
/// Thread-safe via interior `RwLock`; designed to be wrapped in `Arc` and
/// shared across the application.
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
    ttl: chrono::Duration,
}

impl SessionStore {
    pub fn new(ttl: chrono::Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Open a session and return its plaintext token with the stored record.
    pub async fn create(&self, user: SessionUser, upstream_token: String) -> (String, Session) {
        let (plaintext, hash) = generate_session_token();
        let now = Utc::now();
        let session = Session {
            user,
            upstream_token,
            preferences: Preferences::default(),
            created_at: now,
            expires_at: now + self.ttl,
        };
        self.sessions.write().await.insert(hash, session.clone());
        (plaintext, session)
    }

    /// Look up a live session. Expired sessions are dropped on access.
    pub async fn get(&self, token: &str) -> Option<Session> {
        let hash = hash_session_token(token);
        let now = Utc::now();
        {
            let sessions = self.sessions.read().await;
            match sessions.get(&hash) {
                Some(session) if !session.is_expired(now) => return Some(session.clone()),
                Some(_) => {}
                None => return None,
            }
        }
        self.sessions.write().await.remove(&hash);
        None
    }

    /// Remove a session. Returns whether it existed.
    pub async fn remove(&self, token: &str) -> bool {
        self.sessions
            .write()
            .await
            .remove(&hash_session_token(token))
            .is_some()
    }

    /// Apply a preferences update and return the result, or `None` if the
    /// session is unknown or expired.
    pub async fn update_preferences(
        &self,
        token: &str,
        update: PreferencesUpdate,
    ) -> Option<Preferences> {
        let hash = hash_session_token(token);
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&hash).filter(|s| !s.is_expired(now))?;
        session.preferences.apply(update);
        Some(session.preferences)
    }

    /// Drop every session expired at `now`. Returns how many were removed.
    pub async fn purge_expired(&self, now: Timestamp) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired(now));
        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
