//! `SQLite` implementation of the `SettingsRepository` trait.

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use lorma_core::{RepositoryError, Settings, SettingsRepository};

use super::row_mappers::{format_datetime, storage};

/// `SQLite` implementation of the `SettingsRepository` trait.
///
/// Stores settings as a JSON blob in a key-value table, so new settings need
/// no schema change.
pub struct SqliteSettingsRepository {
    pool: SqlitePool,
}

impl SqliteSettingsRepository {
    /// Create a new `SQLite` settings repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

const SETTINGS_KEY: &str = "app_settings";

#[async_trait]
impl SettingsRepository for SqliteSettingsRepository {
    async fn load(&self) -> Result<Settings, RepositoryError> {
        let row = sqlx::query("SELECT value FROM settings_kv WHERE key = ?")
            .bind(SETTINGS_KEY)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage)?;

        match row {
            Some(r) => {
                let json: String = r.try_get("value").map_err(storage)?;
                serde_json::from_str(&json)
                    .map_err(|e| RepositoryError::Serialization(e.to_string()))
            }
            None => Ok(Settings::with_defaults()),
        }
    }

    async fn save(&self, settings: &Settings) -> Result<(), RepositoryError> {
        let json = serde_json::to_string(settings)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;

        sqlx::query("INSERT OR REPLACE INTO settings_kv (key, value, updated_at) VALUES (?, ?, ?)")
            .bind(SETTINGS_KEY)
            .bind(&json)
            .bind(format_datetime(chrono::Utc::now()))
            .execute(&self.pool)
            .await
            .map_err(storage)?;

        Ok(())
    }
}
