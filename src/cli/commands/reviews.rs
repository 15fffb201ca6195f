use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{confirm, output_collection, output_success};
use crate::cli::Context;
use crate::error::AdminError;
use crate::guard::Route;
use crate::models::{Rating, Review};

#[derive(Subcommand)]
pub enum ReviewsCommands {
    #[command(about = "List all reviews (no login needed)")]
    List,

    #[command(about = "List reviews with one star rating")]
    Filter {
        #[arg(help = "Rating 1-5, or 0 for all")]
        rating: u8,
    },

    #[command(about = "Show or hide a review")]
    Toggle {
        #[arg(help = "Review id")]
        id: String,
    },

    #[command(about = "Delete a review")]
    Delete {
        #[arg(help = "Review id")]
        id: String,
        #[arg(long, short, help = "Skip the confirmation prompt")]
        yes: bool,
    },
}

fn row(review: &Review) -> String {
    format!(
        "{:<26} {} {:<20} {:<7} {}",
        review.id,
        review.rating.stars(),
        review.author_name(),
        if review.is_visible { "shown" } else { "hidden" },
        review.content
    )
}

pub async fn handle(cmd: ReviewsCommands, ctx: &Context) -> anyhow::Result<()> {
    let reviews = &ctx.admin.reviews;

    match cmd {
        ReviewsCommands::List => {
            reviews.mount().await.map_err(|e| ctx.fail(e))?;
            output_collection(&ctx.format, "reviews", &reviews.reviews(), "No reviews found", row)
        }
        ReviewsCommands::Filter { rating } => {
            ctx.require_route(Route::Reviews).await?;
            let rating = Rating::selection(rating).map_err(AdminError::from)?;
            reviews.filter(rating).await.map_err(|e| ctx.fail(e))?;
            output_collection(&ctx.format, "reviews", &reviews.reviews(), "No reviews found", row)
        }
        ReviewsCommands::Toggle { id } => {
            ctx.require_route(Route::Reviews).await?;
            reviews.mount().await.map_err(|e| ctx.fail(e))?;
            let visible = reviews.toggle_visibility(&id).await.map_err(|e| ctx.fail(e))?;
            output_success(
                &ctx.format,
                &ctx.success_message("Review updated"),
                Some(json!({ "id": id, "isVisible": visible })),
            )
        }
        ReviewsCommands::Delete { id, yes } => {
            ctx.require_route(Route::Reviews).await?;
            reviews.mount().await.map_err(|e| ctx.fail(e))?;
            let pending = reviews.request_delete(&id).map_err(|e| ctx.fail(e))?;
            if !yes && !confirm(&pending.prompt())? {
                return output_success(&ctx.format, "Delete cancelled", Some(json!({ "deleted": false })));
            }
            reviews.confirm_delete(pending).await.map_err(|e| ctx.fail(e))?;
            output_success(
                &ctx.format,
                &ctx.success_message("Review deleted"),
                Some(json!({ "id": id, "deleted": true })),
            )
        }
    }
}
