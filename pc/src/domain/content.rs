//! GeneratedContent domain type
//!
//! One per-platform draft plus its reasoning steps and review lifecycle.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::platform::Platform;
use super::reasoning::{ReasoningStep, StepStatus};

/// Review lifecycle of a draft
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ContentStatus {
    /// Reasoning reveal in progress
    #[default]
    Generating,
    /// Reveal finished, awaiting review
    Ready,
    /// User approved
    Approved,
    /// User edited the draft
    Modified,
}

impl std::fmt::Display for ContentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Generating => write!(f, "generating"),
            Self::Ready => write!(f, "ready"),
            Self::Approved => write!(f, "approved"),
            Self::Modified => write!(f, "modified"),
        }
    }
}

/// A generated draft for one platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedContent {
    /// Unique per generation, stable across edits and regenerations
    pub id: String,
    pub platform: Platform,
    /// Original generated text
    pub content: String,
    /// Length of `content` in chars
    pub character_count: usize,
    /// Hashtags found in `content`
    pub hashtags: Vec<String>,
    pub is_edited: bool,
    pub edited_content: Option<String>,
    pub reasoning: Vec<ReasoningStep>,
    /// Sampled in [0.85, 0.97)
    pub confidence: f64,
    pub status: ContentStatus,
}

impl GeneratedContent {
    /// The text currently shown to the user; an edit always wins
    pub fn displayed_content(&self) -> &str {
        match (&self.edited_content, self.is_edited) {
            (Some(edited), true) => edited,
            _ => &self.content,
        }
    }

    /// Length of the displayed text in chars
    pub fn displayed_length(&self) -> usize {
        self.displayed_content().chars().count()
    }

    /// Whether the displayed text exceeds the platform's limit
    pub fn is_over_limit(&self) -> bool {
        self.displayed_length() > self.platform.config().max_length
    }

    /// Confidence as a rounded percentage
    pub fn confidence_percent(&self) -> u32 {
        (self.confidence * 100.0).round() as u32
    }

    /// Number of reasoning steps already complete
    pub fn completed_steps(&self) -> usize {
        self.reasoning
            .iter()
            .filter(|s| s.status == StepStatus::Complete)
            .count()
    }

    /// Reveal progress as a rounded percentage
    pub fn progress_percent(&self) -> u32 {
        if self.reasoning.is_empty() {
            return 100;
        }
        ((self.completed_steps() as f64 / self.reasoning.len() as f64) * 100.0).round() as u32
    }

    pub fn is_generating(&self) -> bool {
        self.status == ContentStatus::Generating
    }

    /// Approve the draft
    pub fn approve(&mut self) {
        debug!(%self.id, ?self.status, "GeneratedContent::approve: called");
        self.status = ContentStatus::Approved;
    }

    /// Store a user edit; the original text is left alone
    pub fn edit(&mut self, text: impl Into<String>) {
        let text = text.into();
        debug!(%self.id, len = text.len(), "GeneratedContent::edit: called");
        self.is_edited = true;
        self.edited_content = Some(text);
        self.status = ContentStatus::Modified;
    }

    /// Mark the reveal finished; a status the user already changed is kept
    pub fn mark_ready(&mut self) {
        debug!(%self.id, ?self.status, "GeneratedContent::mark_ready: called");
        if self.status == ContentStatus::Generating {
            self.status = ContentStatus::Ready;
        } else {
            debug!(%self.id, "GeneratedContent::mark_ready: status changed during reveal, keeping it");
        }
    }

    /// Replace everything but the id with a fresh draft
    pub fn replace_with(&mut self, fresh: GeneratedContent) {
        debug!(%self.id, fresh_id = %fresh.id, "GeneratedContent::replace_with: called");
        let id = std::mem::take(&mut self.id);
        *self = GeneratedContent { id, ..fresh };
    }
}
