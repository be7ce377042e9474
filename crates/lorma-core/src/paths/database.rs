//! Database path resolution.

use std::env;
use std::fs;
use std::path::PathBuf;

use super::error::PathError;
use super::platform::data_root;

/// Environment variable that points at a specific database file.
pub const DATABASE_ENV_VAR: &str = "LORMA_DATABASE";

/// Get the path to the `SQLite` database file.
///
/// `LORMA_DATABASE` wins when set; otherwise `lorma.db` in the `data/`
/// subdirectory of the data root. The parent directory is created if needed.
pub fn database_path() -> Result<PathBuf, PathError> {
    let path = match env::var(DATABASE_ENV_VAR) {
        Ok(path) if !path.trim().is_empty() => PathBuf::from(path),
        _ => data_root()?.join("data").join("lorma.db"),
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| PathError::CreateFailed {
            path: parent.to_path_buf(),
            reason: e.to_string(),
        })?;
    }

    Ok(path)
}
