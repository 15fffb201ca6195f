//! Resource list controllers.
//!
//! Each controller owns one cached list and mutates it only after the backend
//! has answered successfully. Load, search and filter replace the list
//! wholesale through a ticketed [`ListOp::Replace`]; create, update, toggle and
//! delete patch it in place.

pub mod auth;
pub mod debounce;
pub mod documents;
pub mod reviews;
pub mod state;
pub mod users;

use parking_lot::Mutex;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use crate::error::{AdminError, ApiError};
use crate::models::Entity;
use crate::notify::{Notice, Notifier};
use crate::session::SessionStore;

pub use auth::AuthController;
pub use debounce::Debouncer;
pub use documents::DocumentsController;
pub use reviews::ReviewsController;
pub use state::{Applied, ListOp, ListScope, ListState, Ticket};
pub use users::UsersController;

/// How a load/search/filter call ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The list now holds this many items from the response
    Applied(usize),
    /// The response arrived after a newer request had been issued; dropped
    Stale,
    /// A newer trigger arrived during the debounce window; no request sent
    Superseded,
}

/// First half of a two-step delete. Only a controller can create one, and the
/// destructive request is issued only when it is handed back to that
/// controller's `confirm_delete`. Dropping it cancels.
#[must_use = "a delete only happens once the request is confirmed"]
#[derive(Debug)]
pub struct PendingDelete<T> {
    id: String,
    label: String,
    _entity: PhantomData<fn() -> T>,
}

impl<T> PendingDelete<T> {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn prompt(&self) -> String {
        format!(
            "Are you sure you want to delete \"{}\"? This action cannot be undone.",
            self.label
        )
    }
}

/// State and plumbing shared by every list controller
pub(crate) struct ListCore<T> {
    resource: &'static str,
    state: Mutex<ListState<T>>,
    session: Arc<SessionStore>,
    notifier: Arc<dyn Notifier>,
    in_flight: AtomicUsize,
    submitting: AtomicBool,
}

struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Held while a create/update is in flight
pub(crate) struct SubmitPermit<'a>(&'a AtomicBool);

impl Drop for SubmitPermit<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl<T: Entity> ListCore<T> {
    pub(crate) fn new(resource: &'static str, session: Arc<SessionStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            resource,
            state: Mutex::new(ListState::new()),
            session,
            notifier,
            in_flight: AtomicUsize::new(0),
            submitting: AtomicBool::new(false),
        }
    }

    pub(crate) fn items(&self) -> Vec<T> {
        self.state.lock().items().to_vec()
    }

    pub(crate) fn get(&self, id: &str) -> Option<T> {
        self.state.lock().find(id).cloned()
    }

    pub(crate) fn scope(&self) -> ListScope {
        self.state.lock().scope().clone()
    }

    pub(crate) fn is_loaded(&self) -> bool {
        self.state.lock().is_loaded()
    }

    pub(crate) fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    pub(crate) fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::SeqCst)
    }

    pub(crate) fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Gate for moderation operations. Reported like any other failure.
    pub(crate) fn require_session(&self) -> Result<(), AdminError> {
        if self.session.is_authenticated() {
            Ok(())
        } else {
            Err(self.fail(AdminError::NotAuthenticated, "Please log in to continue"))
        }
    }

    pub(crate) fn begin_submit(&self) -> Result<SubmitPermit<'_>, AdminError> {
        self.submitting
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map(|_| SubmitPermit(&self.submitting))
            .map_err(|_| AdminError::Busy)
    }

    /// Run a fetch-family request and replace the list with its result,
    /// unless a newer fetch was issued while this one was in flight.
    pub(crate) async fn fetch<F>(&self, scope: ListScope, request: F, failure: &str) -> Result<FetchOutcome, AdminError>
    where
        F: Future<Output = Result<Vec<T>, ApiError>>,
    {
        let ticket = self.state.lock().issue();
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        let result = {
            let _in_flight = InFlight(&self.in_flight);
            request.await
        };

        match result {
            Ok(items) => {
                let count = items.len();
                let applied = self.state.lock().apply(ListOp::Replace {
                    ticket,
                    scope: scope.clone(),
                    items,
                });
                if applied == Applied::Stale {
                    tracing::debug!(resource = self.resource, ?scope, "discarding stale response");
                    return Ok(FetchOutcome::Stale);
                }
                tracing::debug!(resource = self.resource, ?scope, count, "list replaced");
                Ok(FetchOutcome::Applied(count))
            }
            Err(err) => Err(self.fail(err.into(), failure)),
        }
    }

    pub(crate) fn apply(&self, op: ListOp<T>) -> Applied {
        self.state.lock().apply(op)
    }

    /// Patch one cached entity in place; `Missing` if it is not in the list
    pub(crate) fn modify(&self, id: &str, change: impl FnOnce(&mut T)) -> Applied {
        let mut state = self.state.lock();
        let Some(mut entity) = state.find(id).cloned() else {
            return Applied::Missing;
        };
        change(&mut entity);
        state.apply(ListOp::Patch(entity))
    }

    pub(crate) fn pending_delete(&self, id: &str, label: impl FnOnce(&T) -> String) -> Result<PendingDelete<T>, AdminError> {
        let label = self
            .get(id)
            .map(|entity| label(&entity))
            .ok_or_else(|| AdminError::UnknownEntity(id.to_string()))?;
        Ok(PendingDelete {
            id: id.to_string(),
            label,
            _entity: PhantomData,
        })
    }

    pub(crate) fn succeed(&self, message: impl Into<String>) {
        self.notifier.notify(Notice::success(message));
    }

    pub(crate) fn notify(&self, notice: Notice) {
        self.notifier.notify(notice);
    }

    /// Report a failure and hand the error back. The list is never touched
    /// here. A 401 expires the session so the route guard redirects next time.
    pub(crate) fn fail(&self, err: AdminError, fallback: &str) -> AdminError {
        if let AdminError::Api(api) = &err {
            if api.is_unauthorized() {
                self.session.expire();
            }
        }
        tracing::warn!(resource = self.resource, error = %err, "{}", fallback);
        self.notifier.notify(Notice::error(err.notice_text(fallback)));
        err
    }
}
