//! Menu command handler.
//!
//! Restaurants edit their own menu; anyone can read a menu.

use anyhow::Result;

use lorma_core::FoodUpdate;

use crate::bootstrap::CliContext;
use crate::commands::MenuCommand;
use crate::presentation::print_menu;
use crate::utils::input;

/// Execute a menu subcommand.
pub async fn execute(ctx: &CliContext, command: MenuCommand) -> Result<()> {
    match command {
        MenuCommand::List { restaurant } => {
            let menu = ctx.app().menu().list_menu(&restaurant).await?;
            println!("Menu of {restaurant}:\n");
            print_menu(&menu);
            Ok(())
        }
        MenuCommand::Add {
            name,
            price,
            food_type,
        } => {
            let actor = ctx.login().await?;
            let food = ctx
                .app()
                .menu()
                .add_food(&actor, &name, price, &food_type)
                .await?;
            println!(
                "✓ Added {} (ID: {}) at € {} to {}.",
                food.name, food.id, food.price, food.restaurant
            );
            Ok(())
        }
        MenuCommand::Update {
            id,
            name,
            price,
            food_type,
        } => {
            let update = FoodUpdate {
                name,
                price,
                food_type,
            };
            if update.is_empty() {
                println!("Nothing to update. Use --help to see available options.");
                return Ok(());
            }
            let actor = ctx.login().await?;
            let food = ctx.app().menu().update_food(&actor, id, update).await?;
            println!(
                "✓ Updated {} (ID: {}): € {}, {}.",
                food.name, food.id, food.price, food.food_type.name
            );
            Ok(())
        }
        MenuCommand::Remove { id, force } => {
            let actor = ctx.login().await?;
            if !force {
                let confirm =
                    input::prompt_confirmation(&format!("Remove item {id} from your menu?"))?;
                if !confirm {
                    println!("Remove operation cancelled.");
                    return Ok(());
                }
            }
            let food = ctx.app().menu().remove_food(&actor, id).await?;
            println!("✓ Removed {} from the menu of {}.", food.name, food.restaurant);
            Ok(())
        }
    }
}
