use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

use super::{Applied, Debouncer, FetchOutcome, ListCore, ListOp, ListScope, PendingDelete};
use crate::api::DocumentsApi;
use crate::editor::{DocumentEdit, DocumentForm};
use crate::error::AdminError;
use crate::models::{Document, Semester};
use crate::notify::Notifier;
use crate::session::SessionStore;

/// Document catalog management.
///
/// Search and semester filter are independent triggers; each replaces the
/// whole list and they are never combined. Whichever was triggered last
/// wins: a filter cancels a search still waiting out its debounce window.
pub struct DocumentsController {
    api: Arc<dyn DocumentsApi>,
    core: ListCore<Document>,
    debounce: Debouncer,
    search_text: Mutex<String>,
}

impl DocumentsController {
    pub fn new(
        api: Arc<dyn DocumentsApi>,
        session: Arc<SessionStore>,
        notifier: Arc<dyn Notifier>,
        search_debounce: Duration,
    ) -> Self {
        Self {
            api,
            core: ListCore::new("documents", session, notifier),
            debounce: Debouncer::new(search_debounce),
            search_text: Mutex::new(String::new()),
        }
    }

    pub fn documents(&self) -> Vec<Document> {
        self.core.items()
    }

    pub fn get(&self, id: &str) -> Option<Document> {
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

    /// True while a create or update is in flight; the submit button is
    /// disabled for that long.
    pub fn is_submitting(&self) -> bool {
        self.core.is_submitting()
    }

    pub async fn mount(&self) -> Result<Option<FetchOutcome>, AdminError> {
        if !self.core.session().is_authenticated() {
            return Ok(None);
        }
        self.load().await.map(Some)
    }

    pub async fn load(&self) -> Result<FetchOutcome, AdminError> {
        self.core.require_session()?;
        self.core
            .fetch(ListScope::All, self.api.all_documents(), "Failed to fetch documents")
            .await
    }

    /// Keystroke-driven search: waits out the debounce window and only the
    /// last query typed within it is sent.
    pub async fn search(&self, query: &str) -> Result<FetchOutcome, AdminError> {
        self.core.require_session()?;
        *self.search_text.lock() = query.to_string();
        if !self.debounce.settle().await {
            return Ok(FetchOutcome::Superseded);
        }
        self.run_search(query).await
    }

    /// Search without waiting, for callers that submit a finished query.
    /// Still cancels any pending debounced search.
    pub async fn search_now(&self, query: &str) -> Result<FetchOutcome, AdminError> {
        self.core.require_session()?;
        *self.search_text.lock() = query.to_string();
        self.debounce.cancel_pending();
        self.run_search(query).await
    }

    async fn run_search(&self, query: &str) -> Result<FetchOutcome, AdminError> {
        let query = query.trim();
        if query.is_empty() {
            return self
                .core
                .fetch(ListScope::All, self.api.all_documents(), "Failed to fetch documents")
                .await;
        }
        if let ListScope::Filter(semester) = self.core.scope() {
            tracing::warn!(%semester, query, "search replaces the semester-filtered list");
        }
        self.core
            .fetch(
                ListScope::Search(query.to_string()),
                self.api.search_documents(query),
                "Search failed",
            )
            .await
    }

    /// Server-side semester filter. `None` reverts to the full list.
    pub async fn filter(&self, semester: Option<Semester>) -> Result<FetchOutcome, AdminError> {
        self.core.require_session()?;
        self.debounce.cancel_pending();

        let Some(semester) = semester else {
            return self
                .core
                .fetch(ListScope::All, self.api.all_documents(), "Failed to fetch documents")
                .await;
        };
        if !self.search_text.lock().trim().is_empty() {
            tracing::warn!(%semester, "semester filter ignores the current search text");
        }
        self.core
            .fetch(
                ListScope::Filter(semester.to_string()),
                self.api.documents_by_semester(semester),
                "Failed to filter by semester",
            )
            .await
    }

    /// Upload a new document and append the server's echo to the list
    pub async fn create(&self, form: &DocumentForm) -> Result<Document, AdminError> {
        self.core.require_session()?;
        form.validate()
            .map_err(|err| self.core.fail(err.into(), "Operation failed"))?;
        let _permit = self.core.begin_submit()?;

        let created = self
            .api
            .upload_document(form)
            .await
            .map_err(|err| self.core.fail(err.into(), "Operation failed"))?;

        self.core.apply(ListOp::Append(created.clone()));
        self.core.succeed("Document added successfully!");
        Ok(created)
    }

    /// Edit form pre-filled from the cached entry
    pub fn edit_form(&self, id: &str) -> Result<DocumentEdit, AdminError> {
        self.core
            .get(id)
            .map(|doc| DocumentEdit::from_document(&doc))
            .ok_or_else(|| AdminError::UnknownEntity(id.to_string()))
    }

    /// Partial update; the server's copy replaces the cached one in place
    pub async fn update(&self, id: &str, edit: &DocumentEdit) -> Result<Document, AdminError> {
        self.core.require_session()?;
        edit.validate()
            .map_err(|err| self.core.fail(err.into(), "Operation failed"))?;
        let _permit = self.core.begin_submit()?;

        let updated = self
            .api
            .edit_document(id, edit)
            .await
            .map_err(|err| self.core.fail(err.into(), "Operation failed"))?;

        if self.core.apply(ListOp::Patch(updated.clone())) == Applied::Missing {
            tracing::debug!(id, "updated document is not in the current list");
        }
        self.core.succeed("Document updated successfully!");
        Ok(updated)
    }

    pub fn request_delete(&self, id: &str) -> Result<PendingDelete<Document>, AdminError> {
        self.core.pending_delete(id, |doc| doc.name.clone())
    }

    pub async fn confirm_delete(&self, pending: PendingDelete<Document>) -> Result<(), AdminError> {
        self.core.require_session()?;
        self.api
            .delete_document(pending.id())
            .await
            .map_err(|err| self.core.fail(err.into(), "Failed to delete document"))?;

        self.core.apply(ListOp::Remove(pending.id().to_string()));
        self.core.succeed("Document deleted successfully!");
        Ok(())
    }
}
