//! In-memory backend for unit tests.
//!
//! Implements every API trait against seeded collections, records each call
//! as `"METHOD /path?query"`, and supports per-call latency plus one-shot
//! failure injection.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::json;
use std::collections::HashMap;
use std::time::Duration;

use crate::api::{AuthApi, DocumentsApi, ReviewsApi, UsersApi};
use crate::editor::{Credentials, DocumentEdit, DocumentForm, PasswordReset, VerificationCode};
use crate::error::ApiError;
use crate::models::{Ack, BlockToggle, Document, Rating, Review, ReviewAuthor, Semester, User};
use crate::models::user::BlockState;

pub const ADMIN_EMAIL: &str = "admin@diginotes.test";
pub const ADMIN_PASSWORD: &str = "admin123";

pub fn user(id: &str, name: &str, block: bool) -> User {
    User {
        id: id.to_string(),
        name: name.to_string(),
        email: format!("{id}@diginotes.test"),
        regd_no: Some(format!("2101{id}")),
        dob: Some("2003-04-17".to_string()),
        gender: None,
        phno: None,
        branch: Some("CSE".to_string()),
        sem: Some(json!(5)),
        block,
    }
}

pub fn document(id: &str, name: &str, semester: u8) -> Document {
    Document {
        id: id.to_string(),
        name: name.to_string(),
        size: None,
        semester: Semester::new(semester).expect("test semester in range"),
        branch: "CSE".to_string(),
        image: None,
        view_link: Some(format!("https://drive.test/{id}")),
    }
}

pub fn review(id: &str, author: &str, rating: u8, visible: bool) -> Review {
    Review {
        id: id.to_string(),
        user: Some(ReviewAuthor { name: author.to_string() }),
        content: format!("review {id}"),
        rating: Rating::new(rating).expect("test rating in range"),
        is_visible: visible,
    }
}

#[derive(Default)]
struct Store {
    logged_in: bool,
    users: Vec<User>,
    documents: Vec<Document>,
    reviews: Vec<Review>,
    next_id: u32,
}

/// In-memory backend. Full-collection reads answer with the data held when
/// the call arrived, so a delayed reload can race a later mutation.
#[derive(Default)]
pub struct FakeBackend {
    store: Mutex<Store>,
    calls: Mutex<Vec<String>>,
    latency: Mutex<HashMap<String, Duration>>,
    failure: Mutex<Option<(u16, Option<String>)>>,
}

impl FakeBackend {
    /// Empty collections, not logged in
    pub fn new() -> Self {
        Self::default()
    }

    /// Three users, three documents, three reviews
    pub fn seeded() -> Self {
        let backend = Self::new();
        {
            let mut store = backend.store.lock();
            store.users = vec![
                user("u1", "Asha Patel", false),
                user("u2", "Ravi Kumar", false),
                user("u3", "Meera Iyer", false),
            ];
            store.documents = vec![
                document("d1", "Operating Systems", 4),
                document("d2", "Data Structures", 3),
                document("d3", "Engineering Maths I", 1),
            ];
            store.reviews = vec![
                review("r1", "Asha Patel", 5, true),
                review("r2", "Ravi Kumar", 3, false),
                review("r3", "Meera Iyer", 5, true),
            ];
            store.next_id = 4;
        }
        backend
    }

    pub fn set_logged_in(&self, logged_in: bool) {
        self.store.lock().logged_in = logged_in;
    }

    /// Delay every future call whose log line equals `call`
    pub fn set_latency(&self, call: &str, delay: Duration) {
        self.latency.lock().insert(call.to_string(), delay);
    }

    /// The next call, whatever it is, fails with this status
    pub fn fail_next(&self, status: u16, message: Option<&str>) {
        *self.failure.lock() = Some((status, message.map(str::to_string)));
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn calls_matching(&self, call: &str) -> usize {
        self.calls.lock().iter().filter(|c| *c == call).count()
    }

    pub fn user_blocked(&self, id: &str) -> bool {
        self.store.lock().users.iter().any(|u| u.id == id && u.block)
    }

    pub fn set_user_blocked(&self, id: &str, block: bool) {
        if let Some(u) = self.store.lock().users.iter_mut().find(|u| u.id == id) {
            u.block = block;
        }
    }

    async fn enter(&self, call: String) -> Result<(), ApiError> {
        self.calls.lock().push(call.clone());
        let delay = self.latency.lock().get(&call).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        match self.failure.lock().take() {
            Some((status, message)) => Err(ApiError::from_status(status, message)),
            None => Ok(()),
        }
    }

    fn next_id(&self, prefix: &str) -> String {
        let mut store = self.store.lock();
        let id = format!("{prefix}{}", store.next_id);
        store.next_id += 1;
        id
    }
}

fn ack(message: &str) -> Ack {
    Ack {
        message: Some(message.to_string()),
        extra: serde_json::Map::new(),
    }
}

fn not_found(what: &str) -> ApiError {
    ApiError::NotFound(Some(format!("{what} not found")))
}

#[async_trait]
impl AuthApi for FakeBackend {
    async fn verify_auth(&self) -> Result<Ack, ApiError> {
        self.enter("GET /auth/verify".into()).await?;
        if self.store.lock().logged_in {
            Ok(ack("Authenticated"))
        } else {
            Err(ApiError::Unauthorized(Some("Not authenticated".into())))
        }
    }

    async fn login(&self, credentials: &Credentials) -> Result<Ack, ApiError> {
        self.enter("POST /auth/login".into()).await?;
        if credentials.email == ADMIN_EMAIL && credentials.password == ADMIN_PASSWORD {
            self.set_logged_in(true);
            Ok(ack("Logged in"))
        } else {
            Err(ApiError::Unauthorized(Some("Invalid credentials".into())))
        }
    }

    async fn logout(&self) -> Result<Ack, ApiError> {
        self.enter("POST /auth/logout".into()).await?;
        self.set_logged_in(false);
        Ok(ack("Logged out"))
    }

    async fn send_reset_code(&self) -> Result<Ack, ApiError> {
        self.enter("POST /auth/send-resetcode".into()).await?;
        Ok(ack("Code sent"))
    }

    async fn verify_code(&self, code: &VerificationCode) -> Result<Ack, ApiError> {
        self.enter("POST /auth/codeverify".into()).await?;
        if code.as_str() == "123456" {
            Ok(ack("Code verified"))
        } else {
            Err(ApiError::BadRequest(Some("Invalid code".into())))
        }
    }

    async fn reset_password(&self, _reset: &PasswordReset) -> Result<Ack, ApiError> {
        self.enter("PATCH /auth/resetpassword".into()).await?;
        Ok(ack("Password updated"))
    }
}

#[async_trait]
impl UsersApi for FakeBackend {
    async fn all_users(&self) -> Result<Vec<User>, ApiError> {
        let snapshot = self.store.lock().users.clone();
        self.enter("GET /users/allusers".into()).await?;
        Ok(snapshot)
    }

    async fn search_users(&self, query: &str) -> Result<Vec<User>, ApiError> {
        self.enter(format!("GET /users/search?query={query}")).await?;
        let needle = query.to_lowercase();
        Ok(self
            .store
            .lock()
            .users
            .iter()
            .filter(|u| {
                u.name.to_lowercase().contains(&needle)
                    || u.regd_no.as_deref().is_some_and(|r| r.contains(&needle))
            })
            .cloned()
            .collect())
    }

    async fn user_details(&self, id: &str) -> Result<User, ApiError> {
        self.enter(format!("GET /users/details/{id}")).await?;
        self.store
            .lock()
            .users
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or_else(|| not_found("User"))
    }

    async fn toggle_block(&self, id: &str) -> Result<BlockToggle, ApiError> {
        self.enter(format!("PATCH /users/{id}/toggle-block")).await?;
        let mut store = self.store.lock();
        let user = store
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| not_found("User"))?;
        user.block = !user.block;
        Ok(BlockToggle {
            message: Some(format!(
                "User {} successfully",
                if user.block { "blocked" } else { "unblocked" }
            )),
            user: BlockState {
                id: Some(user.id.clone()),
                block: user.block,
            },
        })
    }
}

#[async_trait]
impl DocumentsApi for FakeBackend {
    async fn all_documents(&self) -> Result<Vec<Document>, ApiError> {
        let snapshot = self.store.lock().documents.clone();
        self.enter("GET /documents/alldocuments".into()).await?;
        Ok(snapshot)
    }

    async fn upload_document(&self, form: &DocumentForm) -> Result<Document, ApiError> {
        self.enter("POST /documents/upload".into()).await?;
        let id = self.next_id("d");
        let doc = Document {
            id,
            name: form.name.clone(),
            size: form.file.as_ref().map(|f| crate::models::DocumentSize::Bytes(f.len() as u64)),
            semester: form.semester,
            branch: form.branch.as_str().to_string(),
            image: form.image.as_ref().map(|i| format!("https://img.test/{}", i.file_name)),
            view_link: None,
        };
        self.store.lock().documents.push(doc.clone());
        Ok(doc)
    }

    async fn edit_document(&self, id: &str, edit: &DocumentEdit) -> Result<Document, ApiError> {
        self.enter(format!("PATCH /documents/edit/{id}")).await?;
        let mut store = self.store.lock();
        let doc = store
            .documents
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| not_found("Document"))?;
        if let Some(name) = &edit.name {
            doc.name = name.clone();
        }
        if let Some(semester) = edit.semester {
            doc.semester = semester;
        }
        if let Some(branch) = &edit.branch {
            doc.branch = branch.clone();
        }
        Ok(doc.clone())
    }

    async fn delete_document(&self, id: &str) -> Result<Ack, ApiError> {
        self.enter(format!("DELETE /documents/delete/{id}")).await?;
        let mut store = self.store.lock();
        let before = store.documents.len();
        store.documents.retain(|d| d.id != id);
        if store.documents.len() == before {
            return Err(not_found("Document"));
        }
        Ok(ack("Document deleted"))
    }

    async fn search_documents(&self, query: &str) -> Result<Vec<Document>, ApiError> {
        self.enter(format!("GET /documents/search?q={query}")).await?;
        let needle = query.to_lowercase();
        Ok(self
            .store
            .lock()
            .documents
            .iter()
            .filter(|d| d.name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn documents_by_semester(&self, semester: Semester) -> Result<Vec<Document>, ApiError> {
        self.enter(format!("GET /documents/{semester}")).await?;
        Ok(self
            .store
            .lock()
            .documents
            .iter()
            .filter(|d| d.semester == semester)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ReviewsApi for FakeBackend {
    async fn all_reviews(&self) -> Result<Vec<Review>, ApiError> {
        let snapshot = self.store.lock().reviews.clone();
        self.enter("GET /reviews/allreviews".into()).await?;
        Ok(snapshot)
    }

    async fn toggle_visibility(&self, id: &str) -> Result<Ack, ApiError> {
        self.enter(format!("PATCH /reviews/{id}/toggleshowhide")).await?;
        let mut store = self.store.lock();
        let review = store
            .reviews
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| not_found("Review"))?;
        review.is_visible = !review.is_visible;

        let mut ack = ack("Review visibility updated");
        ack.extra.insert(
            "review".into(),
            json!({ "_id": review.id, "isVisible": review.is_visible }),
        );
        Ok(ack)
    }

    async fn delete_review(&self, id: &str) -> Result<Ack, ApiError> {
        self.enter(format!("DELETE /reviews/delete/{id}")).await?;
        let mut store = self.store.lock();
        let before = store.reviews.len();
        store.reviews.retain(|r| r.id != id);
        if store.reviews.len() == before {
            return Err(not_found("Review"));
        }
        Ok(ack("Review deleted"))
    }

    async fn reviews_by_rating(&self, rating: Rating) -> Result<Vec<Review>, ApiError> {
        self.enter(format!("GET /reviews/{rating}")).await?;
        Ok(self
            .store
            .lock()
            .reviews
            .iter()
            .filter(|r| r.rating == rating)
            .cloned()
            .collect())
    }
}
