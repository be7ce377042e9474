//! User command handler.
//!
//! Registration, sign-in checks, account details and credit.

use anyhow::Result;

use lorma_core::{NewUser, Role};

use crate::bootstrap::CliContext;
use crate::commands::UserCommand;
use crate::presentation::{display_user, format_optional, print_separator, truncate_string};
use crate::utils::input::{prompt_new_password, prompt_password};

/// Execute a user subcommand.
pub async fn execute(ctx: &CliContext, command: UserCommand) -> Result<()> {
    match command {
        UserCommand::Register {
            username,
            role,
            new_password,
            profile,
        } => {
            // Signing in is only needed when an admin creates another admin.
            let actor = ctx.optional_login().await?;
            let password = match new_password {
                Some(password) => password,
                None => prompt_new_password(&format!("Password for {username}"))?,
            };
            let new_user = NewUser {
                username,
                password,
                profile: profile.into_profile(),
                role,
            };
            let user = ctx.app().auth().register(actor.as_ref(), new_user).await?;
            println!("✓ Registered {} as {}.", user.username, user.role);
            if let Some(credit) = user.credit {
                println!("  Starting credit: € {credit}");
            }
            if user.role == Role::Restaurant {
                println!(
                    "  Next: lorma restaurant register <name> -u {} --vat-id ... --opens HH:MM --closes HH:MM",
                    user.username
                );
            }
            Ok(())
        }
        UserCommand::Login => {
            let user = ctx.login().await?;
            println!("✓ Signed in as {} ({}).", user.username, user.role);
            Ok(())
        }
        UserCommand::Show { username } => {
            let actor = ctx.login().await?;
            let target = username.unwrap_or_else(|| actor.username.clone());
            let user = ctx.app().auth().show(&actor, &target).await?;
            display_user(&user);
            Ok(())
        }
        UserCommand::List { role } => {
            let actor = ctx.login().await?;
            let users = ctx.app().auth().list(&actor, role).await?;
            if users.is_empty() {
                println!("No accounts found.");
                return Ok(());
            }

            println!("Found {} account(s):\n", users.len());
            println!(
                "{:<20} {:<12} {:<25} {:>10}",
                "Username", "Role", "Name", "Credit"
            );
            print_separator(70);
            for user in users {
                println!(
                    "{:<20} {:<12} {:<25} {:>10}",
                    truncate_string(&user.username, 19),
                    user.role,
                    truncate_string(&user.profile.full_name(), 24),
                    format_optional(user.credit.as_ref(), "--")
                );
            }
            Ok(())
        }
        UserCommand::TopUp { amount } => {
            let actor = ctx.login().await?;
            let balance = ctx.app().auth().top_up(&actor, amount).await?;
            println!("✓ Added € {amount}. New balance: € {balance}");
            Ok(())
        }
        UserCommand::Passwd => {
            let actor = ctx.login().await?;
            let current = prompt_password("Current password")?;
            let new_password = prompt_new_password("New password")?;
            ctx.app()
                .auth()
                .change_password(&actor, &current, &new_password)
                .await?;
            println!("✓ Password changed for {}.", actor.username);
            Ok(())
        }
    }
}
