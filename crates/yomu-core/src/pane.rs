use std::sync::{Arc, Mutex, PoisonError};

use yomu_types::PaneView;

/// The single visible result pane of a display instance
pub trait Pane: Send {
    /// Replace everything currently shown
    fn show(&mut self, view: PaneView);
}

/// Pane that keeps every view it was given
#[derive(Clone, Default)]
pub struct MemoryPane {
    views: Arc<Mutex<Vec<PaneView>>>,
}

impl MemoryPane {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn views(&self) -> Vec<PaneView> {
        self.views
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn latest(&self) -> Option<PaneView> {
        self.views
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

impl Pane for MemoryPane {
    fn show(&mut self, view: PaneView) {
        self.views
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(view);
    }
}
