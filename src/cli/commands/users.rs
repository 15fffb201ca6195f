use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{output_collection, output_record, output_success};
use crate::cli::Context;
use crate::guard::Route;
use crate::models::User;

#[derive(Subcommand)]
pub enum UsersCommands {
    #[command(about = "List all users")]
    List,

    #[command(about = "Search users by name or registration number")]
    Search {
        #[arg(help = "Search text; blank lists everyone")]
        query: String,
    },

    #[command(about = "Show one user's details")]
    Show {
        #[arg(help = "User id")]
        id: String,
    },

    #[command(about = "Block or unblock a user")]
    ToggleBlock {
        #[arg(help = "User id")]
        id: String,
    },
}

fn row(user: &User) -> String {
    format!(
        "{:<26} {:<24} {:<14} {}",
        user.id,
        user.name,
        user.regd_no.as_deref().unwrap_or("-"),
        if user.block { "blocked" } else { "active" }
    )
}

pub async fn handle(cmd: UsersCommands, ctx: &Context) -> anyhow::Result<()> {
    ctx.require_route(Route::Users).await?;
    let users = &ctx.admin.users;

    match cmd {
        UsersCommands::List => {
            users.load().await.map_err(|e| ctx.fail(e))?;
            output_collection(&ctx.format, "users", &users.users(), "No users found", row)
        }
        UsersCommands::Search { query } => {
            users.search(&query).await.map_err(|e| ctx.fail(e))?;
            output_collection(&ctx.format, "users", &users.users(), "No users found", row)
        }
        UsersCommands::Show { id } => {
            let user = users.details(&id).await.map_err(|e| ctx.fail(e))?;
            let fields = [
                ("Name", user.name.clone()),
                ("Email", user.email.clone()),
                ("Regd No", user.regd_no.clone().unwrap_or_default()),
                ("DOB", user.formatted_dob()),
                ("Gender", user.gender.clone().unwrap_or_default()),
                ("Phone", user.phno.clone().unwrap_or_default()),
                ("Branch", user.branch.clone().unwrap_or_default()),
                ("Semester", user.semester_label()),
                ("Status", if user.block { "blocked" } else { "active" }.to_string()),
            ];
            output_record(&ctx.format, "user", serde_json::to_value(&user)?, &fields)
        }
        UsersCommands::ToggleBlock { id } => {
            // The cache has to hold the user for the toggle to patch it.
            users.load().await.map_err(|e| ctx.fail(e))?;
            let blocked = users.toggle_block(&id).await.map_err(|e| ctx.fail(e))?;
            let message = ctx
                .notices
                .drain()
                .pop()
                .map(|n| n.message)
                .unwrap_or_else(|| "User status updated".to_string());
            output_success(&ctx.format, &message, Some(json!({ "id": id, "block": blocked })))
        }
    }
}
