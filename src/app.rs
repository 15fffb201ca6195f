//! Composition root.
//!
//! Builds one [`SessionStore`] and hands it, together with the backend and the
//! notice sink, to every consumer.

use std::sync::Arc;

use crate::api::{ApiClient, AuthApi, DocumentsApi, ReviewsApi, UsersApi};
use crate::config::ClientConfig;
use crate::controllers::{AuthController, DocumentsController, ReviewsController, UsersController};
use crate::guard::{GuardOutcome, Navigator, Route, RouteGuard};
use crate::notify::Notifier;
use crate::session::{SessionState, SessionStore};

pub struct Admin {
    pub session: Arc<SessionStore>,
    pub auth: AuthController,
    pub users: UsersController,
    pub documents: DocumentsController,
    pub reviews: ReviewsController,
    pub guard: RouteGuard,
    pub notifier: Arc<dyn Notifier>,
}

impl Admin {
    /// Wire the HTTP client into every controller
    pub fn new(client: Arc<ApiClient>, config: &ClientConfig, notifier: Arc<dyn Notifier>) -> Self {
        Self::with_backend(client, config, notifier)
    }

    /// Wire any backend implementing the full API surface
    pub fn with_backend<B>(backend: Arc<B>, config: &ClientConfig, notifier: Arc<dyn Notifier>) -> Self
    where
        B: AuthApi + UsersApi + DocumentsApi + ReviewsApi + 'static,
    {
        let session = Arc::new(SessionStore::new());
        Self {
            auth: AuthController::new(backend.clone(), session.clone(), notifier.clone()),
            users: UsersController::new(
                backend.clone(),
                session.clone(),
                notifier.clone(),
                config.search.user_debounce(),
            ),
            documents: DocumentsController::new(
                backend.clone(),
                session.clone(),
                notifier.clone(),
                config.search.document_debounce(),
            ),
            reviews: ReviewsController::new(backend, session.clone(), notifier.clone()),
            guard: RouteGuard::new(session.clone()),
            session,
            notifier,
        }
    }

    /// Evaluate a route the way the SPA does on navigation: the first visit
    /// triggers a cookie check, after that the cached state decides.
    pub async fn enter(&self, route: &Route) -> GuardOutcome {
        if self.session.state() == SessionState::Uninitialized {
            self.auth.verify().await;
        }
        self.guard.check(route)
    }

    pub fn navigator(&self) -> Navigator {
        Navigator::new(self.session.clone())
    }
}
