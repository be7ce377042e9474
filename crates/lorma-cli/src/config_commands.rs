//! Configuration management subcommands.
//!
//! This module defines the configuration-related commands for managing
//! the database location and the runtime business settings.

use clap::Subcommand;

use lorma_core::Money;

/// Configuration management commands.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// View or change the database location
    Database {
        #[command(subcommand)]
        command: DatabaseCommand,
    },
    /// View or change business settings (shipping rate, starting credit, ...)
    Settings {
        #[command(subcommand)]
        command: SettingsCommand,
    },
}

/// Database location command variants.
#[derive(Subcommand)]
pub enum DatabaseCommand {
    /// Show the database file in use
    Show,
    /// Store a database file path in the .env file
    Set {
        /// Path to the SQLite database file
        path: String,
    },
}

/// Settings command variants.
#[derive(Subcommand)]
pub enum SettingsCommand {
    /// Show all current settings
    Show,
    /// Update settings (admin only)
    Set {
        /// Delivery fee added to every order, in euro
        #[arg(long)]
        shipping_rate: Option<Money>,
        /// Credit given to newly registered clients, in euro
        #[arg(long)]
        starting_credit: Option<Money>,
        /// Highest quantity of one item per order (1-999)
        #[arg(long)]
        max_quantity: Option<u32>,
    },
    /// Reset all settings to defaults (admin only)
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}
