use std::path::PathBuf;

use crate::ai::AiSettings;
use crate::error::SettingsError;
use crate::profile::load_profile;

/// Source of the active profile's AI settings
#[async_trait::async_trait]
pub trait SettingsProvider: Send + Sync {
    /// Read a fresh settings snapshot
    async fn get_settings(&self) -> Result<AiSettings, SettingsError>;
}

/// Settings read from a profile file on every lookup
pub struct ProfileSettings {
    dir: PathBuf,
    profile: String,
}

impl ProfileSettings {
    pub fn new(dir: impl Into<PathBuf>, profile: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            profile: profile.into(),
        }
    }
}

#[async_trait::async_trait]
impl SettingsProvider for ProfileSettings {
    async fn get_settings(&self) -> Result<AiSettings, SettingsError> {
        load_profile(&self.dir, &self.profile).await
    }
}

/// Fixed settings, mostly useful for tests and one-off runs
pub struct StaticSettings(pub AiSettings);

#[async_trait::async_trait]
impl SettingsProvider for StaticSettings {
    async fn get_settings(&self) -> Result<AiSettings, SettingsError> {
        Ok(self.0.clone())
    }
}
