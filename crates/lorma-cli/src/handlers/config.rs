//! Config command handler.
//!
//! Handles the database location and the business settings.

use anyhow::Result;

use lorma_core::paths::{DATABASE_ENV_VAR, persist_env_value};
use lorma_core::{Settings, SettingsUpdate};

use crate::bootstrap::CliContext;
use crate::config_commands::{ConfigCommand, DatabaseCommand, SettingsCommand};
use crate::utils::input::prompt_confirmation;

/// Execute the config command.
///
/// Dispatches to the appropriate subcommand handler.
pub async fn execute(ctx: &CliContext, command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Database { command } => handle_database(ctx, command),
        ConfigCommand::Settings { command } => handle_settings(ctx, command).await,
    }
}

fn handle_database(ctx: &CliContext, command: DatabaseCommand) -> Result<()> {
    match command {
        DatabaseCommand::Show => {
            println!("Current database: {}", ctx.database_path.display());
            Ok(())
        }
        DatabaseCommand::Set { path } => {
            let path = std::path::absolute(&path)?;
            let env_file = persist_env_value(DATABASE_ENV_VAR, &path.to_string_lossy())?;
            println!(
                "✓ Database set to {} (saved in {})",
                path.display(),
                env_file.display()
            );
            Ok(())
        }
    }
}

async fn handle_settings(ctx: &CliContext, command: SettingsCommand) -> Result<()> {
    match command {
        SettingsCommand::Show => {
            let settings = ctx.app().settings().get().await?;
            print_settings(&settings);
            Ok(())
        }
        SettingsCommand::Set {
            shipping_rate,
            starting_credit,
            max_quantity,
        } => {
            let update = SettingsUpdate {
                shipping_rate: shipping_rate.map(Some),
                client_starting_credit: starting_credit.map(Some),
                max_quantity_per_item: max_quantity.map(Some),
            };
            if update.is_empty() {
                println!("No settings provided. Use --help to see available options.");
                return Ok(());
            }

            let actor = ctx.login().await?;
            let settings = ctx.app().settings().update(&actor, update).await?;
            println!("✓ Settings updated.");
            print_settings(&settings);
            Ok(())
        }
        SettingsCommand::Reset { force } => {
            let actor = ctx.login().await?;
            if !force && !prompt_confirmation("Reset all settings to their defaults?")? {
                println!("Settings left unchanged.");
                return Ok(());
            }
            let settings = ctx.app().settings().reset(&actor).await?;
            println!("✓ Settings reset to defaults.");
            print_settings(&settings);
            Ok(())
        }
    }
}

fn print_settings(settings: &Settings) {
    println!("Current settings:");
    println!(
        "  shipping_rate:          € {}",
        settings.effective_shipping_rate()
    );
    println!(
        "  client_starting_credit: € {}",
        settings.effective_client_starting_credit()
    );
    println!(
        "  max_quantity_per_item:  {}",
        settings.effective_max_quantity_per_item()
    );
}
