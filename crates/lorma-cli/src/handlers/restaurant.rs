//! Restaurant command handler.

use anyhow::Result;

use lorma_core::{NewRestaurant, NewUser, Role};

use crate::bootstrap::CliContext;
use crate::commands::RestaurantCommand;
use crate::presentation::{display_restaurant, format_time, print_separator, truncate_string};
use crate::utils::input::prompt_new_password;

/// Execute a restaurant subcommand.
pub async fn execute(ctx: &CliContext, command: RestaurantCommand) -> Result<()> {
    match command {
        RestaurantCommand::Register {
            name,
            vat_id,
            opens,
            closes,
            owner,
            new_password,
            profile,
        } => {
            let restaurant = NewRestaurant {
                name,
                vat_id,
                opening_time: opens,
                closing_time: closes,
            };

            let restaurant = match owner {
                Some(username) => {
                    let password = match new_password {
                        Some(password) => password,
                        None => prompt_new_password(&format!("Password for {username}"))?,
                    };
                    let owner = NewUser {
                        username,
                        password,
                        profile: profile.into_profile(),
                        role: Role::Restaurant,
                    };
                    let (user, restaurant) = ctx
                        .app()
                        .restaurants()
                        .register_owner(owner, restaurant)
                        .await?;
                    println!("✓ Registered owner account {}.", user.username);
                    restaurant
                }
                None => {
                    let actor = ctx.login().await?;
                    ctx.app().restaurants().register(&actor, restaurant).await?
                }
            };

            println!(
                "✓ Registered restaurant {} (open {}-{}).",
                restaurant.name,
                format_time(restaurant.opening_time),
                format_time(restaurant.closing_time)
            );
            Ok(())
        }
        RestaurantCommand::List => {
            let restaurants = ctx.app().restaurants().list().await?;
            if restaurants.is_empty() {
                println!("No restaurants registered yet.");
                println!("Use 'lorma restaurant register' to add the first one.");
                return Ok(());
            }

            println!("Found {} restaurant(s):\n", restaurants.len());
            println!("{:<30} {:<20} {:<13}", "Name", "Owner", "Hours");
            print_separator(65);
            for restaurant in restaurants {
                println!(
                    "{:<30} {:<20} {:<13}",
                    truncate_string(&restaurant.name, 29),
                    truncate_string(&restaurant.owner, 19),
                    format!(
                        "{}-{}",
                        format_time(restaurant.opening_time),
                        format_time(restaurant.closing_time)
                    )
                );
            }
            Ok(())
        }
        RestaurantCommand::Show { name } => {
            let Some(restaurant) = ctx.app().restaurants().get(&name).await? else {
                println!("No restaurant named '{name}'.");
                println!("Use 'lorma restaurant list' to see all restaurants.");
                return Ok(());
            };
            let menu = ctx.app().menu().list_menu(&restaurant.name).await?;
            let reviews = ctx.app().reviews().list(&restaurant.name).await?;
            display_restaurant(&restaurant, &menu, &reviews);
            Ok(())
        }
        RestaurantCommand::Hours { opens, closes } => {
            let actor = ctx.login().await?;
            let restaurant = ctx
                .app()
                .restaurants()
                .update_hours(&actor, opens, closes)
                .await?;
            println!(
                "✓ {} is now open {}-{}.",
                restaurant.name,
                format_time(restaurant.opening_time),
                format_time(restaurant.closing_time)
            );
            Ok(())
        }
    }
}
