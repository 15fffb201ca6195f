use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{output_success, prompt_value};
use crate::cli::Context;
use crate::editor::{Credentials, PasswordReset, VerificationCode};
use crate::error::AdminError;
use crate::session::SessionState;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Login as admin")]
    Login {
        #[arg(help = "Admin email")]
        email: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Logout and forget the stored session")]
    Logout,

    #[command(about = "Show current authentication status")]
    Status,

    #[command(about = "Email a password reset code to the admin account")]
    SendResetCode,

    #[command(about = "Verify the 6-digit reset code")]
    VerifyCode {
        #[arg(help = "Code from the email")]
        code: String,
    },

    #[command(about = "Set a new password after the code was verified")]
    ResetPassword {
        #[arg(long, help = "New password (will prompt if not provided)")]
        password: Option<String>,
        #[arg(long, help = "Confirmation (will prompt if not provided)")]
        confirm: Option<String>,
    },
}

pub async fn handle(cmd: AuthCommands, ctx: &Context) -> anyhow::Result<()> {
    let auth = &ctx.admin.auth;
    match cmd {
        AuthCommands::Login { email, password } => {
            let password = prompt_value("Password", password)?;
            let credentials = Credentials::new(email.clone(), password).map_err(AdminError::from)?;
            auth.login(&credentials).await.map_err(|e| ctx.fail(e))?;
            output_success(
                &ctx.format,
                &ctx.success_message("Logged in"),
                Some(json!({ "email": email })),
            )
        }
        AuthCommands::Logout => {
            auth.logout().await.map_err(|e| ctx.fail(e))?;
            output_success(&ctx.format, &ctx.success_message("Logged out"), None)
        }
        AuthCommands::Status => {
            let state = auth.verify().await;
            let message = match state {
                SessionState::Authenticated => "Logged in",
                _ => "Not logged in",
            };
            output_success(
                &ctx.format,
                message,
                Some(json!({
                    "state": state,
                    "api_url": ctx.client.base_url().as_str(),
                })),
            )
        }
        AuthCommands::SendResetCode => {
            auth.send_reset_code().await.map_err(|e| ctx.fail(e))?;
            output_success(&ctx.format, &ctx.success_message("Code sent"), None)
        }
        AuthCommands::VerifyCode { code } => {
            let code = VerificationCode::parse(&code).map_err(AdminError::from)?;
            auth.verify_code(&code).await.map_err(|e| ctx.fail(e))?;
            output_success(&ctx.format, &ctx.success_message("Code verified"), None)
        }
        AuthCommands::ResetPassword { password, confirm } => {
            let password = prompt_value("New password", password)?;
            let confirm = prompt_value("Confirm password", confirm)?;
            let reset = PasswordReset::new(password, confirm).map_err(AdminError::from)?;
            auth.reset_password(&reset).await.map_err(|e| ctx.fail(e))?;
            output_success(&ctx.format, &ctx.success_message("Password reset"), None)
        }
    }
}
