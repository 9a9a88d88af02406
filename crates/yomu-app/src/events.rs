use std::sync::Arc;

use kanal::AsyncReceiver;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use yomu_types::AppEvent;

use crate::state::AppState;

pub mod content_updated;
pub mod explain_click;

use content_updated::handle_content_update;
use explain_click::handle_explain_click;

/// App's main loop
pub async fn event_loop(
    state: Arc<AppState>,
    input_rx: AsyncReceiver<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    // Lookups overlap, each runs in its own task
    let mut requests = JoinSet::new();

    tracing::info!("[EVENT_LOOP] Starting main loop, waiting for events");
    loop {
        let event = tokio::select! {
            event = input_rx.recv() => event?,
            _ = cancel.cancelled() => {
                tracing::info!("[EVENT_LOOP] Cancelled, aborting {} requests", requests.len());
                requests.shutdown().await;
                return Ok(());
            }
        };

        tracing::debug!(
            "[EVENT_LOOP] Event received: {:?}",
            std::mem::discriminant(&event)
        );
        if !handle_events(&state, &mut requests, event) {
            break;
        }

        while let Some(result) = requests.try_join_next() {
            if let Err(e) = result {
                tracing::error!("[EVENT_LOOP] Request task failed: {}", e);
            }
        }
    }

    tracing::info!("[EVENT_LOOP] Draining {} requests", requests.len());
    while let Some(result) = requests.join_next().await {
        if let Err(e) = result {
            tracing::error!("[EVENT_LOOP] Request task failed: {}", e);
        }
    }

    Ok(())
}

/// Returns `false` when the loop should stop
fn handle_events(state: &Arc<AppState>, requests: &mut JoinSet<()>, event: AppEvent) -> bool {
    match event {
        AppEvent::ContentUpdated(update) => {
            handle_content_update(state.session.clone(), requests, update);
        }
        AppEvent::ExplainClicked => {
            handle_explain_click(state.session.clone(), requests);
        }
        AppEvent::ContentCleared => {
            tracing::debug!("[EVENT_LOOP] Content cleared");
            state.session.clear();
        }
        AppEvent::Shutdown => {
            tracing::info!("[EVENT_LOOP] Shutdown requested");
            return false;
        }
    }

    true
}
