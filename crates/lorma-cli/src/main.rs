//! CLI entry point - the composition root.
//!
//! This is the ONLY place where infrastructure is wired together via bootstrap.
//! Command dispatch routes to handlers which delegate to AppCore.

use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use lorma_cli::{CliConfig, CliError, Cli, Commands, Credentials, bootstrap, handlers};
use lorma_core::paths::env_file_path;

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Load `.env` from the data root first, then from the working directory.
/// Variables already set in the environment are never overwritten.
fn load_env_files() {
    if let Ok(path) = env_file_path() {
        if path.exists() {
            dotenvy::from_path(&path).ok();
        }
    }
    dotenvy::dotenv().ok();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let Some(command) = cli.command else {
        // No command provided - show help
        Cli::command().print_help()?;
        return Ok(());
    };

    let credentials = Credentials {
        user: cli.user,
        password: cli.password,
    };
    let config = match cli.database {
        Some(path) => CliConfig::with_database(path, credentials),
        None => CliConfig::with_defaults(credentials)?,
    };
    let ctx = bootstrap(config).await?;

    match command {
        Commands::Paths => handlers::paths::execute(&ctx),
        Commands::User { command } => handlers::user::execute(&ctx, command).await,
        Commands::Restaurant { command } => handlers::restaurant::execute(&ctx, command).await,
        Commands::FoodType { command } => handlers::food_type::execute(&ctx, command).await,
        Commands::Menu { command } => handlers::menu::execute(&ctx, command).await,
        Commands::Order { command } => handlers::order::execute(&ctx, command).await,
        Commands::Review { command } => handlers::review::execute(&ctx, command).await,
        Commands::Stats { json } => handlers::stats::execute(&ctx, json).await,
        Commands::Config { command } => handlers::config::execute(&ctx, command).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    load_env_files();

    // Parse CLI arguments after .env so LORMA_USER and friends are visible to clap
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let err = CliError::from_anyhow(err);
            eprintln!("Error: {err}");
            ExitCode::from(u8::try_from(err.exit_code()).unwrap_or(1))
        }
    }
}
