//! Configuration file utilities.
//!
//! The `.env` file in the data root stores user overrides such as
//! `LORMA_DATABASE`. It is loaded at startup by the CLI.

use std::fs;
use std::path::PathBuf;

use super::error::PathError;
use super::platform::data_root;

/// Location of the `.env` file that stores user overrides.
pub fn env_file_path() -> Result<PathBuf, PathError> {
    Ok(data_root()?.join(".env"))
}

/// Persist a key=value pair into the `.env` file.
///
/// If the key already exists, its value is updated in place.
/// Otherwise it is appended. Other lines are preserved.
pub fn persist_env_value(key: &str, value: &str) -> Result<PathBuf, PathError> {
    let env_path = env_file_path()?;
    let env_error = |e: std::io::Error| PathError::EnvFileError {
        path: env_path.clone(),
        reason: e.to_string(),
    };

    let existing = if env_path.exists() {
        fs::read_to_string(&env_path).map_err(env_error)?
    } else {
        String::new()
    };

    let mut updated = false;
    let mut output: Vec<String> = Vec::new();
    for line in existing.lines() {
        match line.split_once('=') {
            Some((lhs, _)) if lhs.trim() == key => {
                if !updated {
                    output.push(format!("{key}={value}"));
                    updated = true;
                }
            }
            _ => output.push(line.to_string()),
        }
    }
    if !updated {
        output.push(format!("{key}={value}"));
    }

    let mut content = output.join("\n");
    content.push('\n');
    fs::write(&env_path, content).map_err(env_error)?;

    Ok(env_path)
}
