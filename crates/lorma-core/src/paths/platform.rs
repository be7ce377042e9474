//! Data root resolution.

use std::env;
use std::fs;
use std::path::PathBuf;

use super::error::PathError;

/// Environment variable that overrides the data root.
pub const DATA_DIR_ENV_VAR: &str = "LORMA_DATA_DIR";

const APP_DIR_NAME: &str = "ristorante-lorma";

/// Get the root directory for application data (database, config).
///
/// Resolution order:
/// 1. `LORMA_DATA_DIR` environment variable
/// 2. System data directory (e.g., `~/.local/share/ristorante-lorma`)
///
/// The directory is created if it does not exist.
pub fn data_root() -> Result<PathBuf, PathError> {
    let root = match env::var(DATA_DIR_ENV_VAR) {
        Ok(path) if !path.trim().is_empty() => PathBuf::from(path),
        _ => dirs::data_local_dir()
            .ok_or(PathError::NoDataDir)?
            .join(APP_DIR_NAME),
    };

    if !root.exists() {
        fs::create_dir_all(&root).map_err(|e| PathError::CreateFailed {
            path: root.clone(),
            reason: e.to_string(),
        })?;
    }

    Ok(root)
}
