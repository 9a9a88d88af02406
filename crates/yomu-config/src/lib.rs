use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use self::explainer::ExplainerConfig;

pub mod ai;
pub mod error;
pub mod explainer;
pub mod profile;
pub mod provider;

pub use ai::{AiSettings, ExplainMode};
pub use error::SettingsError;
pub use provider::{ProfileSettings, SettingsProvider, StaticSettings};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub explainer: ExplainerConfig,

    /// Active profile name
    pub profile: String,
    /// Folder holding `<profile>.json` files
    pub profile_dir: PathBuf,
    /// Capacity of the input → event loop channel
    pub input_capacity: usize,
}

impl Config {
    pub fn new() -> Self {
        let profile = env::var("PROFILE").unwrap_or_else(|_| profile::MAIN_PROFILE.to_string());

        let profile_dir = env::var("PROFILE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("profiles"));

        let input_capacity = env::var("INPUT_CHANNEL_CAPACITY")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(64);

        Config {
            explainer: ExplainerConfig::new(),

            profile,
            profile_dir,
            input_capacity,
        }
    }

    /// Settings provider for the active profile
    pub fn settings_provider(&self) -> ProfileSettings {
        ProfileSettings::new(self.profile_dir.clone(), self.profile.clone())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
