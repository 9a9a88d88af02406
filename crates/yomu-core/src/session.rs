use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use yomu_config::{AiSettings, ExplainMode, SettingsProvider};
use yomu_explainer::{CompletionClient, CompletionRequest, ExplainError, build_prompt};
use yomu_types::{ExplainState, LookupEvent, PaneBody, PaneView};

use crate::pane::Pane;
use crate::render::render_text;
use crate::request::{RequestToken, RequestTracker};
use crate::trigger;

pub const LOADING_MESSAGE: &str = "Loading AI settings...";
pub const MANUAL_PROMPT: &str = "Press Explain for an AI explanation";
pub const REQUESTING_MESSAGE: &str = "Generating explanation...";
pub const SETTINGS_UNAVAILABLE: &str = "AI settings unavailable";
pub const EMPTY_RESPONSE: &str = "Empty response from AI";

struct PaneSlot {
    pane: Box<dyn Pane>,
    state: ExplainState,
}

/// Lookup the pane currently belongs to
struct ActiveLookup {
    token: RequestToken,
    event: LookupEvent,
    settings: Option<AiSettings>,
}

/// Explanation state for one display instance.
///
/// Tokens are only issued while holding the lookup lock, and pane writes
/// re-check the token while holding the pane lock. A continuation whose
/// token went stale never touches the pane again.
pub struct ExplainSession {
    tracker: RequestTracker,
    settings: Arc<dyn SettingsProvider>,
    client: Arc<dyn CompletionClient>,
    pane: Mutex<PaneSlot>,
    lookup: Mutex<Option<ActiveLookup>>,
}

impl ExplainSession {
    pub fn new(
        settings: Arc<dyn SettingsProvider>,
        client: Arc<dyn CompletionClient>,
        pane: Box<dyn Pane>,
    ) -> Self {
        Self {
            tracker: RequestTracker::new(),
            settings,
            client,
            pane: Mutex::new(PaneSlot {
                pane,
                state: ExplainState::Idle,
            }),
            lookup: Mutex::new(None),
        }
    }

    pub fn state(&self) -> ExplainState {
        self.lock_pane().state
    }

    /// Handle a dictionary content update
    pub async fn on_lookup(&self, event: LookupEvent) {
        let token = self.begin(event.clone());
        tracing::info!("[SESSION] Lookup {} for '{}'", token, event.word);

        if !trigger::is_eligible(&event) {
            tracing::debug!("[SESSION] Lookup {} not eligible for AI", token);
            self.publish(token, PaneView::cleared());
            return;
        }

        let loading = PaneView::status(ExplainState::SettingsLoading, LOADING_MESSAGE);
        if !self.publish(token, loading) {
            return;
        }

        let settings = match self.settings.get_settings().await {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("[SESSION] Settings fetch failed: {}", e);
                self.publish(token, PaneView::failed(SETTINGS_UNAVAILABLE, Some(e.to_string())));
                return;
            }
        };

        if !self.cache_settings(token, &settings) {
            tracing::debug!("[SESSION] Lookup {} superseded during settings fetch", token);
            return;
        }

        match settings.mode {
            ExplainMode::Manual => {
                let prompt = PaneView::status(ExplainState::AwaitingManualClick, MANUAL_PROMPT)
                    .with_button(true);
                self.publish(token, prompt);
            }
            ExplainMode::Auto => {
                if self.set_state(token, ExplainState::AutoRequested) {
                    self.run_request(token, &event, &settings).await;
                }
            }
        }
    }

    /// Handle the explain button. Re-runs the request for the current lookup.
    pub async fn on_explain_click(&self) {
        let Some((token, event, settings)) = self.begin_click() else {
            return;
        };

        tracing::info!("[SESSION] Explain clicked for '{}' ({})", event.word, token);
        self.run_request(token, &event, &settings).await;
    }

    /// Content cleared: drop the lookup and invalidate anything in flight
    pub fn clear(&self) {
        // Lock order is lookup then pane, so no lookup can start in between
        let mut lookup = self.lock_lookup();
        let token = self.tracker.next();
        *lookup = None;
        tracing::debug!("[SESSION] Cleared, current token {}", token);

        let mut slot = self.lock_pane();
        slot.state = ExplainState::Idle;
        slot.pane.show(PaneView::cleared());
    }

    async fn run_request(&self, token: RequestToken, event: &LookupEvent, settings: &AiSettings) {
        let requesting = PaneView::status(ExplainState::Requesting, REQUESTING_MESSAGE);
        if !self.publish(token, requesting) {
            return;
        }

        let request = CompletionRequest {
            api_url: settings.api_url.clone(),
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
            prompt: build_prompt(&settings.prompt, &event.word, &event.context),
        };

        let word = event.word.as_str();
        let mut on_partial = |text: &str| {
            if !self.tracker.is_current(token) {
                return;
            }
            let view = PaneView::status(ExplainState::Streaming, REQUESTING_MESSAGE)
                .with_body(render_text(text, word));
            self.publish(token, view);
        };

        match self.client.complete(&request, &mut on_partial).await {
            Ok(text) => self.finalize(token, &text, word),
            Err(e) => self.fail(token, e),
        }
    }

    fn finalize(&self, token: RequestToken, text: &str, word: &str) {
        if text.trim().is_empty() {
            tracing::warn!("[SESSION] Request {} returned no text", token);
            self.publish(token, PaneView::failed(EMPTY_RESPONSE, None).with_button(true));
            return;
        }

        let body = render_text(text, word);
        let state = match body {
            PaneBody::Sections(_) => ExplainState::Rendered,
            _ => ExplainState::RawFallback,
        };

        let view = PaneView {
            state,
            ..PaneView::default()
        }
        .with_body(body)
        .with_button(true);

        if self.publish(token, view) {
            tracing::info!("[SESSION] Request {} finished as {:?}", token, state);
        }
    }

    fn fail(&self, token: RequestToken, error: ExplainError) {
        tracing::warn!("[SESSION] Request {} failed: {}", token, error);

        let (message, detail) = match error {
            ExplainError::ConfigMissing => ("AI endpoint URL is not configured".to_string(), None),
            ExplainError::Http { status, body } => (
                format!("AI request failed (HTTP {status})"),
                Some(body).filter(|b| !b.trim().is_empty()),
            ),
            ExplainError::Timeout(_) => ("AI request timed out".to_string(), None),
            ExplainError::Network(e) => ("Network error".to_string(), Some(e.to_string())),
        };

        self.publish(token, PaneView::failed(message, detail).with_button(true));
    }

    /// New lookup becomes the current one
    fn begin(&self, event: LookupEvent) -> RequestToken {
        let mut lookup = self.lock_lookup();
        let token = self.tracker.next();
        *lookup = Some(ActiveLookup {
            token,
            event,
            settings: None,
        });
        token
    }

    /// New token for the current lookup, if a click may start a request
    fn begin_click(&self) -> Option<(RequestToken, LookupEvent, AiSettings)> {
        let mut lookup = self.lock_lookup();

        let Some(active) = lookup.as_mut() else {
            tracing::debug!("[SESSION] Explain clicked without a lookup");
            return None;
        };
        if !self.tracker.is_current(active.token) {
            return None;
        }
        if !trigger::is_eligible(&active.event) {
            tracing::debug!("[SESSION] Explain clicked for a non-eligible lookup");
            return None;
        }
        let Some(settings) = active.settings.clone() else {
            tracing::debug!("[SESSION] Explain clicked before settings loaded");
            return None;
        };

        active.token = self.tracker.next();
        Some((active.token, active.event.clone(), settings))
    }

    fn cache_settings(&self, token: RequestToken, settings: &AiSettings) -> bool {
        let mut lookup = self.lock_lookup();
        match lookup.as_mut() {
            Some(active) if active.token == token && self.tracker.is_current(token) => {
                active.settings = Some(settings.clone());
                true
            }
            _ => false,
        }
    }

    /// Show a view if `token` is still current
    fn publish(&self, token: RequestToken, view: PaneView) -> bool {
        let mut slot = self.lock_pane();
        if !self.tracker.is_current(token) {
            tracing::debug!("[SESSION] Dropping update for stale request {}", token);
            return false;
        }

        slot.state = view.state;
        slot.pane.show(view);
        true
    }

    fn set_state(&self, token: RequestToken, state: ExplainState) -> bool {
        let mut slot = self.lock_pane();
        if !self.tracker.is_current(token) {
            return false;
        }

        slot.state = state;
        true
    }

    fn lock_pane(&self) -> MutexGuard<'_, PaneSlot> {
        self.pane.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_lookup(&self) -> MutexGuard<'_, Option<ActiveLookup>> {
        self.lookup.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
