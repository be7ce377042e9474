//! Settings service - orchestrates settings operations.

use crate::domain::{Role, User};
use crate::ports::{CoreError, SettingsRepository};
use crate::settings::{Settings, SettingsUpdate, validate_settings};
use std::sync::Arc;
use tracing::info;

/// Service for settings operations.
pub struct SettingsService {
    repo: Arc<dyn SettingsRepository>,
}

impl SettingsService {
    /// Create a new settings service.
    pub fn new(repo: Arc<dyn SettingsRepository>) -> Self {
        Self { repo }
    }

    /// Get current settings.
    pub async fn get(&self) -> Result<Settings, CoreError> {
        self.repo.load().await.map_err(CoreError::from)
    }

    /// Update settings with partial changes (admin only).
    pub async fn update(&self, actor: &User, update: SettingsUpdate) -> Result<Settings, CoreError> {
        require_admin(actor)?;
        let mut current = self.repo.load().await.map_err(CoreError::from)?;
        current.merge(&update);
        validate_settings(&current)?;
        self.repo.save(&current).await.map_err(CoreError::from)?;
        info!(by = %actor.username, "Updated settings");
        Ok(current)
    }

    /// Restore every setting to its default (admin only).
    pub async fn reset(&self, actor: &User) -> Result<Settings, CoreError> {
        require_admin(actor)?;
        let defaults = Settings::with_defaults();
        self.repo.save(&defaults).await.map_err(CoreError::from)?;
        info!(by = %actor.username, "Reset settings to defaults");
        Ok(defaults)
    }
}

fn require_admin(actor: &User) -> Result<(), CoreError> {
    if actor.is(Role::Admin) {
        Ok(())
    } else {
        Err(CoreError::denied("only admins can change settings"))
    }
}
