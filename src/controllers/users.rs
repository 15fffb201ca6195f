use std::sync::Arc;
use std::time::Duration;

use super::{Debouncer, FetchOutcome, ListCore, ListScope};
use crate::api::UsersApi;
use crate::error::AdminError;
use crate::models::User;
use crate::notify::{Notice, Notifier};
use crate::session::SessionStore;

/// User moderation: list, search, details, block toggle
pub struct UsersController {
    api: Arc<dyn UsersApi>,
    core: ListCore<User>,
    debounce: Debouncer,
}

impl UsersController {
    pub fn new(
        api: Arc<dyn UsersApi>,
        session: Arc<SessionStore>,
        notifier: Arc<dyn Notifier>,
        search_debounce: Duration,
    ) -> Self {
        Self {
            api,
            core: ListCore::new("users", session, notifier),
            debounce: Debouncer::new(search_debounce),
        }
    }

    pub fn users(&self) -> Vec<User> {
        self.core.items()
    }

    pub fn get(&self, id: &str) -> Option<User> {
        self.core.get(id)
    }

    pub fn scope(&self) -> ListScope {
        self.core.scope()
    }

    pub fn is_loaded(&self) -> bool {
        self.core.is_loaded()
    }

    pub fn is_loading(&self) -> bool {
        self.core.is_loading()
    }

    /// Initial load when the view appears; nothing happens without a session
    pub async fn mount(&self) -> Result<Option<FetchOutcome>, AdminError> {
        if !self.core.session().is_authenticated() {
            return Ok(None);
        }
        self.load().await.map(Some)
    }

    pub async fn load(&self) -> Result<FetchOutcome, AdminError> {
        self.core.require_session()?;
        self.core
            .fetch(ListScope::All, self.api.all_users(), "Failed to fetch users")
            .await
    }

    /// Search by name or registration number. Blank text reverts to the full
    /// list.
    pub async fn search(&self, query: &str) -> Result<FetchOutcome, AdminError> {
        self.core.require_session()?;
        if !self.debounce.settle().await {
            return Ok(FetchOutcome::Superseded);
        }

        let query = query.trim();
        if query.is_empty() {
            return self
                .core
                .fetch(ListScope::All, self.api.all_users(), "Failed to fetch users")
                .await;
        }
        self.core
            .fetch(
                ListScope::Search(query.to_string()),
                self.api.search_users(query),
                "Search failed",
            )
            .await
    }

    /// Full record for the details dialog. The cached list is not touched.
    pub async fn details(&self, id: &str) -> Result<User, AdminError> {
        self.core.require_session()?;
        self.api
            .user_details(id)
            .await
            .map_err(|err| self.core.fail(err.into(), "Failed to fetch user details"))
    }

    /// Flip the block flag. The cached value is set from the server's answer,
    /// never flipped locally. Returns the new `block` value.
    pub async fn toggle_block(&self, id: &str) -> Result<bool, AdminError> {
        self.core.require_session()?;
        let response = self
            .api
            .toggle_block(id)
            .await
            .map_err(|err| self.core.fail(err.into(), "Failed to update user status"))?;

        let blocked = response.user.block;
        if self.core.modify(id, |user| user.block = blocked) == super::Applied::Missing {
            tracing::debug!(id, "toggled user is not in the current list");
        }

        let message = response.message.unwrap_or_else(|| {
            if blocked { "User blocked" } else { "User unblocked" }.to_string()
        });
        // A blocked user is surfaced as an alert, an unblock as a success.
        self.core.notify(if blocked {
            Notice::error(message)
        } else {
            Notice::success(message)
        });
        Ok(blocked)
    }
}
