use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Transport settings for the completion client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplainerConfig {
    /// Hard wall-clock limit for one completion call
    pub timeout_seconds: u64,
}

impl ExplainerConfig {
    pub fn new() -> Self {
        let timeout_seconds = env::var("TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(20); // 20 seconds default

        Self { timeout_seconds }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for ExplainerConfig {
    fn default() -> Self {
        Self { timeout_seconds: 20 }
    }
}
