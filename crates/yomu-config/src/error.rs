#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Profile not found: {0}")]
    NotFound(String),

    #[error("Invalid profile: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
