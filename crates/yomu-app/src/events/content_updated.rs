use std::sync::Arc;

use tokio::task::JoinSet;
use yomu_core::ExplainSession;
use yomu_types::{ContentUpdate, LookupEvent};

pub fn handle_content_update(
    session: Arc<ExplainSession>,
    requests: &mut JoinSet<()>,
    update: ContentUpdate,
) {
    let event = LookupEvent::from(update);
    tracing::debug!(
        "[EVENT_LOOP] Lookup '{}' with {} modifiers",
        event.word,
        event.modifiers.len()
    );

    requests.spawn(async move {
        session.on_lookup(event).await;
    });
}
