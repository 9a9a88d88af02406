use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use yomu_types::AppEvent;

use crate::events::event_loop;
use crate::io::watcher_io;
use crate::state::AppState;

/// Centralized channel management
pub struct ChannelSet {
    pub input: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
}

impl ChannelSet {
    pub fn new(input_capacity: usize) -> Self {
        Self {
            input: kanal::bounded_async(input_capacity.max(1)),
        }
    }

    pub fn sender(&self) -> AsyncSender<AppEvent> {
        self.input.0.clone()
    }
}

/// Application controller for task spawning and lifecycle
pub struct AppController {
    channels: ChannelSet,
    state: Arc<AppState>,
    cancel_token: CancellationToken,
}

impl AppController {
    pub async fn new(state: Arc<AppState>) -> Self {
        let capacity = state.config.read().await.input_capacity;

        Self {
            channels: ChannelSet::new(capacity),
            state,
            cancel_token: CancellationToken::new(),
        }
    }

    pub fn sender(&self) -> AsyncSender<AppEvent> {
        self.channels.sender()
    }

    /// Event loop only, input is fed through [`AppController::sender`]
    pub fn spawn_event_loop(&self, tasks: &mut JoinSet<anyhow::Result<()>>) {
        tasks.spawn(event_loop(
            self.state.clone(),
            self.channels.input.1.clone(),
            self.cancel_token.child_token(),
        ));
    }

    pub fn spawn_tasks(&self) -> JoinSet<anyhow::Result<()>> {
        let mut tasks = JoinSet::new();

        self.spawn_event_loop(&mut tasks);

        // Watcher IO
        tasks.spawn(watcher_io(
            self.channels.sender(),
            self.cancel_token.child_token(),
        ));

        tasks
    }

    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}
