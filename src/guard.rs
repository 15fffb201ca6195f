use std::sync::Arc;
use tokio::sync::watch;

use crate::session::{SessionState, SessionStore};

/// Views of the admin application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    PasswordReset,
    Dashboard,
    Users,
    Documents,
    Reviews,
    /// Anything else falls into the guarded dashboard subtree
    Other(String),
}

impl Route {
    pub fn parse(path: &str) -> Route {
        let path = path.split(['?', '#']).next().unwrap_or("");
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Route::Home,
            "/login" => Route::Login,
            "/password-reset" => Route::PasswordReset,
            "/dashboard" => Route::Dashboard,
            "/dashboard/users" => Route::Users,
            "/dashboard/documents" => Route::Documents,
            "/dashboard/reviews" => Route::Reviews,
            other => Route::Other(other.to_string()),
        }
    }

    pub fn path(&self) -> &str {
        match self {
            Route::Home => "/",
            Route::Login => "/login",
            Route::PasswordReset => "/password-reset",
            Route::Dashboard => "/dashboard",
            Route::Users => "/dashboard/users",
            Route::Documents => "/dashboard/documents",
            Route::Reviews => "/dashboard/reviews",
            Route::Other(path) => path,
        }
    }

    pub fn is_guarded(&self) -> bool {
        !matches!(self, Route::Home | Route::Login | Route::PasswordReset)
    }
}

/// Result of evaluating a navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    Mount(Route),
    /// Guarded route requested without a session
    Redirect(Route),
    /// Session verification in flight; show a loading state
    Pending(Route),
}

#[derive(Debug, Clone)]
pub struct RouteGuard {
    session: Arc<SessionStore>,
}

impl RouteGuard {
    pub fn new(session: Arc<SessionStore>) -> Self {
        Self { session }
    }

    pub fn check(&self, route: &Route) -> GuardOutcome {
        evaluate(route, self.session.state())
    }
}

fn evaluate(route: &Route, state: SessionState) -> GuardOutcome {
    if !route.is_guarded() {
        return GuardOutcome::Mount(route.clone());
    }
    match state {
        SessionState::Authenticated => GuardOutcome::Mount(route.clone()),
        SessionState::Checking => GuardOutcome::Pending(route.clone()),
        SessionState::Uninitialized | SessionState::Anonymous => {
            GuardOutcome::Redirect(Route::Login)
        }
    }
}

/// Tracks the requested route and re-evaluates it on every navigation and
/// every session transition.
#[derive(Debug)]
pub struct Navigator {
    guard: RouteGuard,
    session_rx: watch::Receiver<SessionState>,
    requested: Route,
    outcome: GuardOutcome,
}

impl Navigator {
    pub fn new(session: Arc<SessionStore>) -> Self {
        let session_rx = session.subscribe();
        let guard = RouteGuard::new(session);
        let outcome = guard.check(&Route::Home);
        Self {
            guard,
            session_rx,
            requested: Route::Home,
            outcome,
        }
    }

    pub fn navigate(&mut self, path: &str) -> &GuardOutcome {
        self.requested = Route::parse(path);
        self.refresh()
    }

    pub fn refresh(&mut self) -> &GuardOutcome {
        self.session_rx.borrow_and_update();
        let next = self.guard.check(&self.requested);
        if next != self.outcome {
            tracing::debug!(requested = self.requested.path(), outcome = ?next, "route re-evaluated");
        }
        self.outcome = next;
        &self.outcome
    }

    /// Wait for the next session transition, then re-evaluate. `None` once
    /// the session store has been dropped.
    pub async fn session_changed(&mut self) -> Option<&GuardOutcome> {
        self.session_rx.changed().await.ok()?;
        Some(self.refresh())
    }

    pub fn requested(&self) -> &Route {
        &self.requested
    }

    pub fn outcome(&self) -> &GuardOutcome {
        &self.outcome
    }
}
