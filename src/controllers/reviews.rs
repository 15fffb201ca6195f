use serde_json::Value;
use std::sync::Arc;

use super::{FetchOutcome, ListCore, ListOp, ListScope, PendingDelete};
use crate::api::ReviewsApi;
use crate::error::AdminError;
use crate::models::{Ack, Rating, Review};
use crate::notify::Notifier;
use crate::session::SessionStore;

/// Review moderation. The list itself is public; filter, toggle and delete
/// need a session.
pub struct ReviewsController {
    api: Arc<dyn ReviewsApi>,
    core: ListCore<Review>,
}

impl ReviewsController {
    pub fn new(api: Arc<dyn ReviewsApi>, session: Arc<SessionStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            core: ListCore::new("reviews", session, notifier),
        }
    }

    pub fn reviews(&self) -> Vec<Review> {
        self.core.items()
    }

    pub fn get(&self, id: &str) -> Option<Review> {
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

    /// Loads regardless of session state
    pub async fn mount(&self) -> Result<FetchOutcome, AdminError> {
        self.load().await
    }

    pub async fn load(&self) -> Result<FetchOutcome, AdminError> {
        self.core
            .fetch(ListScope::All, self.api.all_reviews(), "Failed to fetch reviews")
            .await
    }

    /// Server-side star filter; `None` (the "all" selection) reloads
    pub async fn filter(&self, rating: Option<Rating>) -> Result<FetchOutcome, AdminError> {
        self.core.require_session()?;
        let outcome = match rating {
            None => {
                self.core
                    .fetch(ListScope::All, self.api.all_reviews(), "Failed to filter reviews")
                    .await?
            }
            Some(rating) => {
                self.core
                    .fetch(
                        ListScope::Filter(rating.to_string()),
                        self.api.reviews_by_rating(rating),
                        "Failed to filter reviews",
                    )
                    .await?
            }
        };

        if matches!(outcome, FetchOutcome::Applied(_)) {
            self.core.succeed(match rating {
                None => "Showing all reviews".to_string(),
                Some(r) => format!("Showing {r}-star reviews"),
            });
        }
        Ok(outcome)
    }

    /// Flip `isVisible`. The server's value wins when the response carries
    /// one; otherwise the cached flag is flipped. Returns the new value, or
    /// `None` if the review is not cached.
    pub async fn toggle_visibility(&self, id: &str) -> Result<Option<bool>, AdminError> {
        self.core.require_session()?;
        let ack = self
            .api
            .toggle_visibility(id)
            .await
            .map_err(|err| self.core.fail(err.into(), "Failed to toggle review visibility"))?;

        let reported = reported_visibility(&ack);
        let mut visible = None;
        self.core.modify(id, |review| {
            review.is_visible = reported.unwrap_or(!review.is_visible);
            visible = Some(review.is_visible);
        });
        if visible.is_none() {
            tracing::debug!(id, "toggled review is not in the current list");
        }

        self.core.succeed("Review visibility updated successfully!");
        Ok(visible.or(reported))
    }

    pub fn request_delete(&self, id: &str) -> Result<PendingDelete<Review>, AdminError> {
        self.core.pending_delete(id, |review| {
            format!("review by {}", review.author_name())
        })
    }

    pub async fn confirm_delete(&self, pending: PendingDelete<Review>) -> Result<(), AdminError> {
        self.core.require_session()?;
        self.api
            .delete_review(pending.id())
            .await
            .map_err(|err| self.core.fail(err.into(), "Failed to delete review"))?;

        self.core.apply(ListOp::Remove(pending.id().to_string()));
        self.core.succeed("Review deleted successfully!");
        Ok(())
    }
}

/// `isVisible` from a toggle response, either top-level or under `review`
fn reported_visibility(ack: &Ack) -> Option<bool> {
    ack.extra
        .get("isVisible")
        .or_else(|| ack.extra.get("review").and_then(|r| r.get("isVisible")))
        .and_then(Value::as_bool)
}
