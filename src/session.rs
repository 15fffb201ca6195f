//! Auth session store.
//!
//! The server-side cookie is the authority. This store only caches the last
//! known verification result so the route guard and controllers can gate on
//! it without a round trip. One store is created by the composition root and
//! shared (`Arc`) with every consumer; nothing reads it as ambient global
//! state.

use serde::Serialize;
use tokio::sync::watch;

use crate::api::AuthApi;

/// `Uninitialized -> Checking -> Authenticated | Anonymous`; login and logout
/// move between the last two at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Uninitialized,
    Checking,
    Authenticated,
    Anonymous,
}

impl SessionState {
    pub fn is_authenticated(self) -> bool {
        matches!(self, SessionState::Authenticated)
    }
}

#[derive(Debug)]
pub struct SessionStore {
    state: watch::Sender<SessionState>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        let (state, _) = watch::channel(SessionState::Uninitialized);
        Self { state }
    }

    pub fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state().is_authenticated()
    }

    /// Receiver that wakes on every transition, for consumers that re-render
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn begin_check(&self) {
        self.transition(SessionState::Checking);
    }

    /// Record a successful login. The network call is the caller's job.
    pub fn login(&self) {
        self.transition(SessionState::Authenticated);
    }

    /// Record a logout. The network call is the caller's job.
    pub fn logout(&self) {
        self.transition(SessionState::Anonymous);
    }

    /// A request came back 401: the cached flag is stale.
    pub fn expire(&self) {
        if self.state() == SessionState::Authenticated {
            tracing::warn!("session rejected by backend, marking anonymous");
        }
        self.transition(SessionState::Anonymous);
    }

    /// Ask the backend whether the session cookie is still valid.
    pub async fn verify(&self, api: &dyn AuthApi) -> SessionState {
        self.begin_check();
        match api.verify_auth().await {
            Ok(_) => self.login(),
            Err(err) => {
                tracing::debug!(error = %err, "session verification failed");
                self.logout();
            }
        }
        self.state()
    }

    fn transition(&self, next: SessionState) {
        let prev = self.state.send_replace(next);
        if prev != next {
            tracing::info!(from = ?prev, to = ?next, "session transition");
        }
    }
}
