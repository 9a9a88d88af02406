use std::time::Duration;

pub mod client;
pub mod extract;
pub mod prompt;
pub mod stream;


pub use client::ChatCompletionClient;
pub use extract::try_parse;
pub use prompt::build_prompt;
pub use stream::StreamState;

/// Chat completion provider interface
#[async_trait::async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send the prompt and stream the growing answer into `on_partial`.
    ///
    /// `on_partial` receives the full accumulated text every time it grows.
    /// Returns the final text.
    async fn complete(
        &self,
        request: &CompletionRequest,
        on_partial: &mut (dyn for<'p> FnMut(&'p str) + Send),
    ) -> Result<String, ExplainError>;
}

#[derive(Debug, Clone, Default)]
pub struct CompletionRequest {
    pub api_url: String,
    pub api_key: String,
    /// Omitted from the request body when empty
    pub model: String,
    pub prompt: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ExplainError {
    #[error("AI endpoint URL is not configured")]
    ConfigMissing,

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}
