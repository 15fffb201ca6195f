use std::sync::Arc;

use crate::api::AuthApi;
use crate::editor::{Credentials, PasswordReset, VerificationCode};
use crate::error::AdminError;
use crate::notify::{Notice, Notifier};
use crate::session::{SessionState, SessionStore};

/// Login, logout and the password-reset flow. Only login and logout move the
/// session; the reset steps are plain requests.
pub struct AuthController {
    api: Arc<dyn AuthApi>,
    session: Arc<SessionStore>,
    notifier: Arc<dyn Notifier>,
}

impl AuthController {
    pub fn new(api: Arc<dyn AuthApi>, session: Arc<SessionStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { api, session, notifier }
    }

    /// Re-check the cookie with the backend
    pub async fn verify(&self) -> SessionState {
        self.session.verify(self.api.as_ref()).await
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<(), AdminError> {
        match self.api.login(credentials).await {
            Ok(_) => {
                self.session.login();
                self.notifier.notify(Notice::success("Login successful! Welcome Admin"));
                Ok(())
            }
            Err(err) => Err(self.fail(err.into(), "Login failed. Please try again.")),
        }
    }

    /// The local session ends even if the backend call fails; the cookie is
    /// useless to us either way.
    pub async fn logout(&self) -> Result<(), AdminError> {
        let result = self.api.logout().await;
        self.session.logout();
        match result {
            Ok(ack) => {
                self.notifier
                    .notify(Notice::success(ack.message.unwrap_or_else(|| "Logged out".to_string())));
                Ok(())
            }
            Err(err) => Err(self.fail(err.into(), "Logout failed")),
        }
    }

    pub async fn send_reset_code(&self) -> Result<(), AdminError> {
        self.api
            .send_reset_code()
            .await
            .map_err(|err| self.fail(err.into(), "Failed to send verification code"))?;
        self.notifier.notify(Notice::success("Verification code sent to your email"));
        Ok(())
    }

    pub async fn verify_code(&self, code: &VerificationCode) -> Result<(), AdminError> {
        self.api
            .verify_code(code)
            .await
            .map_err(|err| self.fail(err.into(), "Verification failed"))?;
        self.notifier.notify(Notice::success("Code verified successfully!"));
        Ok(())
    }

    pub async fn reset_password(&self, reset: &PasswordReset) -> Result<(), AdminError> {
        self.api
            .reset_password(reset)
            .await
            .map_err(|err| self.fail(err.into(), "Password reset failed. Please try again."))?;
        self.notifier.notify(Notice::success("Password reset successful!"));
        Ok(())
    }

    fn fail(&self, err: AdminError, fallback: &str) -> AdminError {
        tracing::warn!(error = %err, "{}", fallback);
        self.notifier.notify(Notice::error(err.notice_text(fallback)));
        err
    }
}
