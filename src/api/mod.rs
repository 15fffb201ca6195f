//! Backend contract.
//!
//! One trait per resource, one method per endpoint. `ApiClient` is the HTTP
//! implementation; controllers only see the traits.

pub mod client;

mod auth;
mod documents;
mod reviews;
mod users;

use async_trait::async_trait;

use crate::editor::{Credentials, DocumentEdit, DocumentForm, PasswordReset, VerificationCode};
use crate::error::ApiError;
use crate::models::{Ack, BlockToggle, Document, Rating, Review, Semester, User};

pub use client::ApiClient;

#[async_trait]
pub trait AuthApi: Send + Sync {
    /// `GET /auth/verify`
    async fn verify_auth(&self) -> Result<Ack, ApiError>;
    /// `POST /auth/login`
    async fn login(&self, credentials: &Credentials) -> Result<Ack, ApiError>;
    /// `POST /auth/logout`
    async fn logout(&self) -> Result<Ack, ApiError>;
    /// `POST /auth/send-resetcode`
    async fn send_reset_code(&self) -> Result<Ack, ApiError>;
    /// `POST /auth/codeverify`
    async fn verify_code(&self, code: &VerificationCode) -> Result<Ack, ApiError>;
    /// `PATCH /auth/resetpassword`
    async fn reset_password(&self, reset: &PasswordReset) -> Result<Ack, ApiError>;
}

#[async_trait]
pub trait UsersApi: Send + Sync {
    /// `GET /users/allusers`
    async fn all_users(&self) -> Result<Vec<User>, ApiError>;
    /// `GET /users/search?query=`
    async fn search_users(&self, query: &str) -> Result<Vec<User>, ApiError>;
    /// `GET /users/details/{id}`
    async fn user_details(&self, id: &str) -> Result<User, ApiError>;
    /// `PATCH /users/{id}/toggle-block`
    async fn toggle_block(&self, id: &str) -> Result<BlockToggle, ApiError>;
}

#[async_trait]
pub trait DocumentsApi: Send + Sync {
    /// `GET /documents/alldocuments`
    async fn all_documents(&self) -> Result<Vec<Document>, ApiError>;
    /// `POST /documents/upload` (multipart)
    async fn upload_document(&self, form: &DocumentForm) -> Result<Document, ApiError>;
    /// `PATCH /documents/edit/{id}` (multipart)
    async fn edit_document(&self, id: &str, edit: &DocumentEdit) -> Result<Document, ApiError>;
    /// `DELETE /documents/delete/{id}`
    async fn delete_document(&self, id: &str) -> Result<Ack, ApiError>;
    /// `GET /documents/search?q=`
    async fn search_documents(&self, query: &str) -> Result<Vec<Document>, ApiError>;
    /// `GET /documents/{semester}`
    async fn documents_by_semester(&self, semester: Semester) -> Result<Vec<Document>, ApiError>;
}

#[async_trait]
pub trait ReviewsApi: Send + Sync {
    /// `GET /reviews/allreviews`
    async fn all_reviews(&self) -> Result<Vec<Review>, ApiError>;
    /// `PATCH /reviews/{id}/toggleshowhide`
    async fn toggle_visibility(&self, id: &str) -> Result<Ack, ApiError>;
    /// `DELETE /reviews/delete/{id}`
    async fn delete_review(&self, id: &str) -> Result<Ack, ApiError>;
    /// `GET /reviews/{rating}`
    async fn reviews_by_rating(&self, rating: Rating) -> Result<Vec<Review>, ApiError>;
}
