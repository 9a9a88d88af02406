use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::ai::AiSettings;
use crate::error::SettingsError;

pub const MAIN_PROFILE: &str = "main";

/// Represents a user profile
#[derive(Debug, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub value: AiSettings,
}

fn profile_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}.json"))
}

async fn read_profile(path: &Path) -> Result<AiSettings, SettingsError> {
    let data = fs::read_to_string(path).await?;
    let profile: Profile = serde_json::from_str(&data)?;
    Ok(profile.value)
}

/// Create the profile folder and a default main profile if missing
pub async fn init_profiles(dir: &Path) -> Result<(), SettingsError> {
    fs::create_dir_all(dir).await?;

    let main_profile = profile_path(dir, MAIN_PROFILE);
    if fs::try_exists(&main_profile).await? {
        return Ok(());
    }

    let file = save_profile(dir, MAIN_PROFILE, AiSettings::default()).await?;
    tracing::info!("Created main profile at {}", file.display());

    Ok(())
}

/// Load a profile by name, falling back to main if the name is not found
pub async fn load_profile(dir: &Path, name: &str) -> Result<AiSettings, SettingsError> {
    let profile_file = profile_path(dir, name);
    if fs::try_exists(&profile_file).await? {
        return read_profile(&profile_file).await;
    }

    tracing::warn!("Profile {name} not found, falling back to {MAIN_PROFILE} profile");
    let main_file = profile_path(dir, MAIN_PROFILE);
    if fs::try_exists(&main_file).await? {
        read_profile(&main_file).await
    } else {
        Err(SettingsError::NotFound(name.to_string()))
    }
}

/// Write settings under the given profile name
pub async fn save_profile(
    dir: &Path,
    name: &str,
    settings: AiSettings,
) -> Result<PathBuf, SettingsError> {
    fs::create_dir_all(dir).await?;
    let profile = Profile {
        name: name.into(),
        value: settings,
    };
    let file = profile_path(dir, name);
    fs::write(&file, serde_json::to_string_pretty(&profile)?).await?;
    tracing::info!("Saved profile: {name}");
    Ok(file)
}
