//! CLI bootstrap - the composition root.
//!
//! This module is the ONLY place where infrastructure is wired together
//! for the CLI adapter:
//! - Database pool and schema (via lorma-db)
//! - Repositories and core services (via `CoreFactory`)
//!
//! Command handlers receive the composed context and delegate work to
//! `AppCore`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::debug;

use lorma_core::paths::database_path;
use lorma_core::services::AppCore;
use lorma_core::User;
use lorma_db::{CoreFactory, setup_database};

use crate::error::CliError;
use crate::utils::input::{prompt_password, prompt_string};

/// Credentials given on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub user: Option<String>,
    pub password: Option<String>,
}

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// `SQLite` database file.
    pub database_path: PathBuf,
    /// Who the command runs as.
    pub credentials: Credentials,
}

impl CliConfig {
    /// Create config with the configured database location.
    pub fn with_defaults(credentials: Credentials) -> Result<Self> {
        Ok(Self {
            database_path: database_path()?,
            credentials,
        })
    }

    /// Create config for an explicit database file.
    pub fn with_database(database_path: impl Into<PathBuf>, credentials: Credentials) -> Self {
        Self {
            database_path: database_path.into(),
            credentials,
        }
    }
}

/// Fully composed application context for CLI commands.
pub struct CliContext {
    /// The core application facade.
    pub app: AppCore,
    /// Database file backing this context.
    pub database_path: PathBuf,
    credentials: Credentials,
}

impl CliContext {
    /// Build a context around an already composed core.
    pub const fn new(app: AppCore, database_path: PathBuf, credentials: Credentials) -> Self {
        Self {
            app,
            database_path,
            credentials,
        }
    }

    /// Access the AppCore.
    pub const fn app(&self) -> &AppCore {
        &self.app
    }

    /// Whether a username was supplied for this invocation.
    pub const fn has_user(&self) -> bool {
        self.credentials.user.is_some()
    }

    /// Sign in with the supplied credentials, prompting for what is missing.
    pub async fn login(&self) -> Result<User> {
        let username = match &self.credentials.user {
            Some(user) => user.clone(),
            None => prompt_string("Username")?,
        };
        if username.is_empty() {
            return Err(CliError::Arguments("a username is required, use --user".into()).into());
        }
        let password = match &self.credentials.password {
            Some(password) => password.clone(),
            None => prompt_password(&format!("Password for {username}"))?,
        };

        let user = self.app.auth().login(&username, &password).await?;
        debug!(username = %user.username, role = %user.role, "Signed in");
        Ok(user)
    }

    /// Sign in only when a username was supplied.
    pub async fn optional_login(&self) -> Result<Option<User>> {
        if self.has_user() {
            self.login().await.map(Some)
        } else {
            Ok(None)
        }
    }
}

/// Bootstrap the CLI application.
///
/// Opens (and if needed creates) the database, then assembles `AppCore`
/// over `SQLite` repositories.
pub async fn bootstrap(config: CliConfig) -> Result<CliContext> {
    let pool = setup_database(&config.database_path)
        .await
        .with_context(|| format!("opening database {}", config.database_path.display()))?;
    let app = CoreFactory::build_app_core(pool);
    Ok(CliContext::new(app, config.database_path, config.credentials))
}
