pub mod pane;
pub mod render;
pub mod request;
pub mod session;
pub mod trigger;


pub use pane::{MemoryPane, Pane};
pub use request::{RequestToken, RequestTracker};
pub use session::ExplainSession;
