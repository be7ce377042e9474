//! CLI-specific error types and mappings.
//!
//! This module provides error types for the CLI adapter and mappings
//! from CoreError to exit codes and user-facing messages.

use lorma_core::{CoreError, PathError, RepositoryError};
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Core domain error.
    #[error("{0}")]
    Core(String),

    /// Argument parsing error.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// Wrong credentials or an action the user may not perform.
    #[error("{0}")]
    Permission(String),

    /// Input that the business rules reject.
    #[error("{0}")]
    Data(String),

    /// IO error (file not found, permission denied, etc.).
    #[error("IO error: {0}")]
    Io(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow Unix conventions:
    /// - 0: Success
    /// - 1: General error
    /// - 2: Misuse of shell command (invalid arguments)
    /// - 64-78: Reserved for specific error categories (see sysexits.h)
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Core(_) => 1,
            Self::Arguments(_) => 2,  // EX_USAGE
            Self::Data(_) => 65,      // EX_DATAERR
            Self::Database(_) => 73,  // EX_CANTCREAT (closest fit)
            Self::Io(_) => 74,        // EX_IOERR
            Self::Permission(_) => 77, // EX_NOPERM
            Self::Config(_) => 78,    // EX_CONFIG
        }
    }

    /// Classify an error bubbling out of a handler.
    ///
    /// Known error types anywhere in the chain decide the category; anything
    /// else is a general error.
    pub fn from_anyhow(err: anyhow::Error) -> Self {
        let err = match err.downcast::<Self>() {
            Ok(cli) => return cli,
            Err(err) => err,
        };
        let err = match err.downcast::<CoreError>() {
            Ok(core) => return core.into(),
            Err(err) => err,
        };
        let err = match err.downcast::<PathError>() {
            Ok(path) => return path.into(),
            Err(err) => err,
        };
        match err.downcast::<std::io::Error>() {
            Ok(io) => io.into(),
            Err(err) => Self::Core(format!("{err:#}")),
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Repository(RepositoryError::NotFound(what)) => {
                Self::Data(format!("Not found: {what}"))
            }
            CoreError::Repository(repo_err) => Self::Database(repo_err.to_string()),
            CoreError::Password(e) => Self::Database(e.to_string()),
            CoreError::Settings(e) => Self::Config(e.to_string()),
            CoreError::Path(e) => e.into(),
            err @ (CoreError::Authentication | CoreError::PermissionDenied(_)) => {
                Self::Permission(err.to_string())
            }
            err @ (CoreError::Validation(_)
            | CoreError::InsufficientCredit { .. }
            | CoreError::InvalidTransition(_)) => Self::Data(err.to_string()),
            CoreError::Internal(msg) => Self::Core(msg),
        }
    }
}

impl From<PathError> for CliError {
    fn from(err: PathError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
