//! Generation session with actor pattern
//!
//! SessionManager owns the session state and processes messages via channels.
//! The reveal loop runs as a separate task that reports back through the same
//! channel, so all mutation stays in one place.

mod manager;
mod messages;
mod reveal;
mod state;

pub use manager::SessionManager;
pub use messages::{RevealUpdate, SessionCommand, SessionError, SessionEvent, SessionResult};
pub use reveal::{RevealItem, RevealPlan, run_reveal};
pub use state::{INTENT_PREVIEW_CHARS, SessionPhase, SessionSnapshot, SessionState, validate_submission};
