//! Food type command handler.

use anyhow::Result;

use crate::bootstrap::CliContext;
use crate::commands::FoodTypeCommand;
use crate::presentation::print_separator;

pub async fn execute(ctx: &CliContext, command: FoodTypeCommand) -> Result<()> {
    match command {
        FoodTypeCommand::Add { name, macro_type } => {
            let actor = ctx.login().await?;
            let food_type = ctx
                .app()
                .menu()
                .add_food_type(&actor, &name, macro_type)
                .await?;
            println!("✓ Added food type {} ({}).", food_type.name, food_type.macro_type);
            Ok(())
        }
        FoodTypeCommand::List => {
            let food_types = ctx.app().menu().list_food_types().await?;
            if food_types.is_empty() {
                println!("No food types yet.");
                return Ok(());
            }
            println!("{:<25} {:<6}", "Food type", "Kind");
            print_separator(32);
            for food_type in food_types {
                println!("{:<25} {:<6}", food_type.name, food_type.macro_type);
            }
            Ok(())
        }
    }
}
