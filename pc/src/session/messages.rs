//! Session manager messages
//!
//! Commands, events and errors for the actor pattern.

use thiserror::Error;
use tokio::sync::oneshot;

use crate::domain::{Platform, StepKind};
use crate::export::ExportRecord;

use super::state::{SessionPhase, SessionSnapshot};

/// Errors from session operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Item not found: {0}")]
    NotFound(String),

    #[error("Busy: {0}")]
    Busy(String),

    #[error("Template error: {0}")]
    Template(String),

    #[error("Channel error")]
    ChannelError,
}

/// Response from session operations
pub type SessionResult<T> = Result<T, SessionError>;

/// Progress reported by a running reveal task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevealUpdate {
    StepStarted { item_id: String, index: usize },
    StepCompleted { item_id: String, index: usize },
    ItemDone { item_id: String },
    Finished,
}

/// Commands sent to the session actor
#[derive(Debug)]
pub enum SessionCommand {
    Submit {
        intent: String,
        platforms: Vec<Platform>,
        reply: oneshot::Sender<SessionResult<Vec<String>>>,
    },
    Approve {
        id: String,
        reply: oneshot::Sender<SessionResult<()>>,
    },
    Edit {
        id: String,
        text: String,
        reply: oneshot::Sender<SessionResult<()>>,
    },
    Regenerate {
        id: String,
        reply: oneshot::Sender<SessionResult<()>>,
    },
    ApproveAll {
        reply: oneshot::Sender<SessionResult<usize>>,
    },
    Reset {
        reply: oneshot::Sender<SessionResult<()>>,
    },
    Snapshot {
        reply: oneshot::Sender<SessionSnapshot>,
    },
    Export {
        reply: oneshot::Sender<Vec<ExportRecord>>,
    },

    /// Internal: sent by the reveal task, tagged with the epoch it was started under
    Reveal { epoch: u64, update: RevealUpdate },

    // Shutdown
    Shutdown,
}

/// Event broadcast whenever session state changes
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    PhaseChanged { phase: SessionPhase },
    ItemsCreated { ids: Vec<String> },
    StepStarted { item_id: String, index: usize, kind: StepKind },
    StepCompleted { item_id: String, index: usize, kind: StepKind },
    ItemReady { item_id: String },
    /// Approve, edit, approve-all or a regeneration restart touched this item
    ItemUpdated { item_id: String },
    RevealFinished,
    SessionReset,
}
