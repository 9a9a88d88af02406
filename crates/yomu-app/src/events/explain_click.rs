use std::sync::Arc;

use tokio::task::JoinSet;
use yomu_core::ExplainSession;

pub fn handle_explain_click(session: Arc<ExplainSession>, requests: &mut JoinSet<()>) {
    tracing::debug!("[EVENT_LOOP] Explain clicked");

    requests.spawn(async move {
        session.on_explain_click().await;
    });
}
