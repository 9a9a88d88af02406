use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identity of one explanation request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Issues request tokens. Only the newest token is current.
#[derive(Debug, Default)]
pub struct RequestTracker {
    current: AtomicU64,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new token, making every earlier one stale
    pub fn next(&self) -> RequestToken {
        RequestToken(self.current.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        self.current.load(Ordering::SeqCst) == token.0
    }
}
