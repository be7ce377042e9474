//! Main CLI parser and top-level argument handling.
//!
//! This module defines the root CLI structure with global options.

use clap::Parser;

use crate::commands::Commands;

/// Command-line interface for the RistoranteLorMa delivery system.
///
/// Credentials are global so every subcommand that acts on behalf of a
/// user can sign in the same way.
#[derive(Parser)]
#[command(name = "lorma")]
#[command(about = "Order food from RistoranteLorMa restaurants")]
#[command(version)]
pub struct Cli {
    /// Username to sign in with
    #[arg(short = 'u', long = "user", env = "LORMA_USER", global = true)]
    pub user: Option<String>,

    /// Password to sign in with (prompted when missing)
    #[arg(
        short = 'p',
        long = "password",
        env = "LORMA_PASSWORD",
        global = true,
        hide_env_values = true
    )]
    pub password: Option<String>,

    /// Use this database file instead of the configured one
    #[arg(long = "database", global = true)]
    pub database: Option<String>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}
