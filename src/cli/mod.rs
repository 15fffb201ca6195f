pub mod commands;
pub mod config;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::ApiClient;
use crate::app::Admin;
use crate::config::ClientConfig;
use crate::error::AdminError;
use crate::guard::{GuardOutcome, Route};
use crate::notify::{NoticeBuffer, NoticeLevel};
use crate::session::SessionState;

#[derive(Parser)]
#[command(name = "diginotes")]
#[command(about = "DigiNotes admin CLI - moderate users, documents and reviews")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(long, global = true, env = "DIGINOTES_API_URL", help = "Backend base URL")]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Login, logout and password reset")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "User moderation")]
    Users {
        #[command(subcommand)]
        cmd: commands::users::UsersCommands,
    },

    #[command(about = "Document catalog management")]
    Documents {
        #[command(subcommand)]
        cmd: commands::documents::DocumentsCommands,
    },

    #[command(about = "Review moderation")]
    Reviews {
        #[command(subcommand)]
        cmd: commands::reviews::ReviewsCommands,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// One CLI invocation: the wired application plus the notices it produced
pub struct Context {
    pub admin: Admin,
    pub client: Arc<ApiClient>,
    pub notices: Arc<NoticeBuffer>,
    pub format: OutputFormat,
}

impl Context {
    pub fn new(config: &ClientConfig, format: OutputFormat) -> anyhow::Result<Self> {
        let client = Arc::new(ApiClient::from_config(config)?);
        let notices = Arc::new(NoticeBuffer::new());
        let admin = Admin::new(client.clone(), config, notices.clone());
        Ok(Self {
            admin,
            client,
            notices,
            format,
        })
    }

    /// Enter a dashboard view. Fails when the stored cookie no longer holds a
    /// session.
    pub async fn require_route(&self, route: Route) -> anyhow::Result<()> {
        match self.admin.enter(&route).await {
            GuardOutcome::Mount(_) => Ok(()),
            GuardOutcome::Redirect(_) | GuardOutcome::Pending(_) => Err(anyhow::anyhow!(
                "Not logged in. Run `diginotes auth login <email>` first"
            )),
        }
    }

    /// Message of the latest success notice, or `default`
    pub fn success_message(&self, default: &str) -> String {
        self.notices
            .drain()
            .into_iter()
            .rev()
            .find(|n| n.level == NoticeLevel::Success)
            .map(|n| n.message)
            .unwrap_or_else(|| default.to_string())
    }

    /// Turn a controller error into a CLI error carrying the notice text
    pub fn fail(&self, err: AdminError) -> anyhow::Error {
        let text = self
            .notices
            .last()
            .filter(|n| n.level == NoticeLevel::Error)
            .map(|n| n.message)
            .unwrap_or_else(|| err.to_string());
        anyhow::Error::new(err).context(text)
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    let mut client_config = crate::config::config().clone();
    if let Some(url) = cli.api_url.as_deref().filter(|u| !u.trim().is_empty()) {
        client_config.api.base_url = url.trim().to_string();
    }

    let ctx = Context::new(&client_config, output_format)?;
    if let Some(saved) = config::load_session()? {
        ctx.client.restore_cookies(&saved.cookie);
    }

    let result = match cli.command {
        Commands::Auth { cmd } => commands::auth::handle(cmd, &ctx).await,
        Commands::Users { cmd } => commands::users::handle(cmd, &ctx).await,
        Commands::Documents { cmd } => commands::documents::handle(cmd, &ctx).await,
        Commands::Reviews { cmd } => commands::reviews::handle(cmd, &ctx).await,
    };

    finish(result, persist_session(&ctx), output_format)
}

/// Marks an error that `run` has already written to the output
#[derive(Debug, thiserror::Error)]
#[error("error already reported")]
pub struct ErrorReported;

/// Only the cookie outlives the process.
fn persist_session(ctx: &Context) -> anyhow::Result<()> {
    match (ctx.admin.session.state(), ctx.client.cookie_header()) {
        (SessionState::Anonymous, _) => config::clear_session(),
        (_, Some(cookie)) => config::save_session(&cookie),
        (_, None) => Ok(()),
    }
}

/// The command's own failure wins over a persistence failure. In JSON mode
/// the failure is written here and marked so it is not printed again.
fn finish(result: anyhow::Result<()>, persisted: anyhow::Result<()>, format: OutputFormat) -> anyhow::Result<()> {
    let err = match (result, persisted) {
        (Ok(()), Ok(())) => return Ok(()),
        (Err(err), Ok(())) | (Ok(()), Err(err)) => err,
        (Err(err), Err(persist)) => {
            tracing::warn!(error = %persist, "could not update the saved session");
            err
        }
    };

    match format {
        OutputFormat::Json => {
            let code = err.downcast_ref::<AdminError>().map(AdminError::error_code);
            utils::output_error(&format, &err.to_string(), code)?;
            Err(err.context(ErrorReported))
        }
        OutputFormat::Text => Err(err),
    }
}
