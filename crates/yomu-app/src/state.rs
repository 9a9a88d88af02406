use std::sync::Arc;

use tokio::sync::RwLock;
use yomu_config::Config;
use yomu_core::{ExplainSession, Pane};
use yomu_explainer::ChatCompletionClient;

pub struct AppState {
    pub config: Arc<RwLock<Config>>,
    pub session: Arc<ExplainSession>,
}

impl AppState {
    pub fn new(config: Config, pane: Box<dyn Pane>) -> Self {
        let settings = Arc::new(config.settings_provider());
        let client = Arc::new(ChatCompletionClient::with_timeout(config.explainer.timeout()));
        tracing::info!(
            "Using profile '{}' from {}",
            config.profile,
            config.profile_dir.display()
        );

        Self::with_session(config, ExplainSession::new(settings, client, pane))
    }

    pub fn with_session(config: Config, session: ExplainSession) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            session: Arc::new(session),
        }
    }
}
