use async_trait::async_trait;
use reqwest::Method;

use super::{ApiClient, AuthApi};
use crate::editor::{Credentials, PasswordReset, VerificationCode};
use crate::error::ApiError;
use crate::models::Ack;

#[async_trait]
impl AuthApi for ApiClient {
    async fn verify_auth(&self) -> Result<Ack, ApiError> {
        self.send_ack(Method::GET, &["auth", "verify"], |r| r).await
    }

    async fn login(&self, credentials: &Credentials) -> Result<Ack, ApiError> {
        self.send_ack(Method::POST, &["auth", "login"], |r| r.json(credentials)).await
    }

    async fn logout(&self) -> Result<Ack, ApiError> {
        self.send_ack(Method::POST, &["auth", "logout"], |r| r).await
    }

    async fn send_reset_code(&self) -> Result<Ack, ApiError> {
        self.send_ack(Method::POST, &["auth", "send-resetcode"], |r| r).await
    }

    async fn verify_code(&self, code: &VerificationCode) -> Result<Ack, ApiError> {
        self.send_ack(Method::POST, &["auth", "codeverify"], |r| r.json(code)).await
    }

    async fn reset_password(&self, reset: &PasswordReset) -> Result<Ack, ApiError> {
        self.send_ack(Method::PATCH, &["auth", "resetpassword"], |r| r.json(reset)).await
    }
}
