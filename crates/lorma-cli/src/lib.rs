//! Command-line front end for RistoranteLorMa.
//!
//! The `lorma` binary parses arguments with `clap`, composes the
//! application in [`bootstrap`] and dispatches to thin [`handlers`] that
//! call into `AppCore`.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

#[cfg(test)]
use tempfile as _;
#[cfg(test)]
use tokio_test as _;

// Used by the binary only
use dotenvy as _;
use tokio as _;
use tracing_subscriber as _;

pub mod bootstrap;
pub mod commands;
pub mod config_commands;
pub mod error;
pub mod handlers;
pub mod parser;
pub mod presentation;
pub mod utils;

// Re-export primary types for convenient access
pub use bootstrap::{CliConfig, CliContext, Credentials, bootstrap};
pub use commands::{
    Commands, FoodTypeCommand, MenuCommand, OrderCommand, ProfileArgs, RestaurantCommand,
    ReviewCommand, UserCommand,
};
pub use config_commands::{ConfigCommand, DatabaseCommand, SettingsCommand};
pub use error::CliError;
pub use parser::Cli;
