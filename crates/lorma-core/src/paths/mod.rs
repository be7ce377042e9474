//! Path utilities for RistoranteLorMa data directories.
//!
//! This module provides the canonical path resolution for all components:
//! - Application data root
//! - Database location
//! - `.env` file for user overrides
//!
//! # Design
//!
//! - Returns `PathBuf` and `PathError` for clear error handling
//! - No interactive/terminal I/O - adapters handle user prompts separately

mod config;
mod database;
mod error;
mod platform;

#[cfg(test)]
mod test_utils;

pub use config::{env_file_path, persist_env_value};
pub use database::{DATABASE_ENV_VAR, database_path};
pub use error::PathError;
pub use platform::{DATA_DIR_ENV_VAR, data_root};
