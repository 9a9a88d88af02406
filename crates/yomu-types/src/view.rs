/// Explanation lifecycle as seen by the result pane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExplainState {
    #[default]
    Idle,
    SettingsLoading,
    AutoRequested,
    AwaitingManualClick,
    Requesting,
    Streaming,
    Rendered,
    RawFallback,
    Failed,
}

/// Structured explanation ready for any UI layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionTree {
    pub header: String,
    pub badge: Option<String>,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Section {
    Text { label: &'static str, body: String },
    Examples(Vec<ExampleEntry>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExampleEntry {
    pub text: Option<String>,
    pub explain: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PaneBody {
    #[default]
    Empty,
    Sections(SectionTree),
    Raw(String),
}

/// Full pane content. Every write replaces the previous view.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PaneView {
    pub state: ExplainState,
    pub status: Option<String>,
    pub detail: Option<String>,
    pub body: PaneBody,
    pub show_explain_button: bool,
}

impl PaneView {
    pub fn cleared() -> Self {
        Self::default()
    }

    pub fn status(state: ExplainState, message: impl Into<String>) -> Self {
        Self {
            state,
            status: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn failed(message: impl Into<String>, detail: Option<String>) -> Self {
        Self {
            state: ExplainState::Failed,
            status: Some(message.into()),
            detail,
            ..Self::default()
        }
    }

    pub fn with_body(mut self, body: PaneBody) -> Self {
        self.body = body;
        self
    }

    pub fn with_button(mut self, show: bool) -> Self {
        self.show_explain_button = show;
        self
    }
}
