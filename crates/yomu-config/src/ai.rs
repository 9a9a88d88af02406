use std::fmt;

use serde::{Deserialize, Serialize};

fn default_mode() -> ExplainMode {
    ExplainMode::Auto
}

fn default_api_url() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

/// When an explanation request is sent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExplainMode {
    /// Request as soon as settings resolve
    Auto,
    /// Wait for the explain button
    Manual,
}

impl fmt::Display for ExplainMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str("auto"),
            Self::Manual => f.write_str("manual"),
        }
    }
}

/// Per-profile AI settings snapshot
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct AiSettings {
    #[serde(default = "default_mode")]
    pub mode: ExplainMode,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Extra style requirements appended to the prompt
    #[serde(default)]
    pub prompt: String,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            api_url: default_api_url(),
            api_key: String::new(),
            model: default_model(),
            prompt: String::new(),
        }
    }
}
