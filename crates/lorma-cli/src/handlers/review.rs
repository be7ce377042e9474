//! Review command handler.

use anyhow::Result;

use lorma_core::{NewReview, Vote};

use crate::bootstrap::CliContext;
use crate::commands::ReviewCommand;
use crate::error::CliError;
use crate::presentation::print_separator;

pub async fn execute(ctx: &CliContext, command: ReviewCommand) -> Result<()> {
    match command {
        ReviewCommand::Add {
            restaurant,
            vote,
            comment,
        } => {
            let vote = Vote::try_from(vote).map_err(|e| CliError::Arguments(e.to_string()))?;
            let actor = ctx.login().await?;
            let review = ctx
                .app()
                .reviews()
                .add(
                    &actor,
                    NewReview {
                        restaurant,
                        vote,
                        comment,
                    },
                )
                .await?;
            println!(
                "✓ Review #{} for {}: {}",
                review.id, review.restaurant, review.vote
            );
            Ok(())
        }
        ReviewCommand::List { restaurant } => {
            let reviews = ctx.app().reviews().list(&restaurant).await?;
            if reviews.is_empty() {
                println!("{restaurant} has no reviews yet.");
                return Ok(());
            }
            println!("Reviews of {restaurant}:\n");
            for review in reviews {
                println!(
                    "#{:<5} {}  {}  by {}",
                    review.id,
                    review.vote,
                    review.date.format("%Y-%m-%d"),
                    review.author
                );
                if let Some(comment) = &review.comment {
                    println!("       {comment}");
                }
                print_separator(60);
            }
            Ok(())
        }
        ReviewCommand::Delete { id } => {
            let actor = ctx.login().await?;
            ctx.app().reviews().delete(&actor, id).await?;
            println!("✓ Deleted review #{id}.");
            Ok(())
        }
    }
}
