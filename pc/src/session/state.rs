//! Session state owned by the actor
//!
//! Every mutation here is synchronous; the actor decides when to call them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{
    ContentStatus, GeneratedContent, Platform, is_well_ordered, mark_complete_through, mark_processing,
};
use crate::generator::truncate_chars;

use super::messages::{SessionError, SessionResult};

/// Characters of the intent shown in progress headers
pub const INTENT_PREVIEW_CHARS: usize = 80;

/// Session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Waiting for an intent
    #[default]
    Input,
    /// Initial reveal running
    Generating,
    /// Drafts ready for review
    Review,
    /// Never entered by the manager; see `SessionSnapshot::is_complete`
    Complete,
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Input => write!(f, "input"),
            Self::Generating => write!(f, "generating"),
            Self::Review => write!(f, "review"),
            Self::Complete => write!(f, "complete"),
        }
    }
}

/// Trim the intent and de-duplicate platforms, rejecting empty submissions
pub fn validate_submission(intent: &str, platforms: &[Platform]) -> SessionResult<(String, Vec<Platform>)> {
    debug!(intent_len = intent.len(), ?platforms, "validate_submission: called");
    let intent = intent.trim();
    if intent.is_empty() {
        return Err(SessionError::InvalidInput("intent is empty".to_string()));
    }
    if platforms.is_empty() {
        return Err(SessionError::InvalidInput("no platforms selected".to_string()));
    }

    let mut unique = Vec::with_capacity(platforms.len());
    for platform in platforms {
        if !unique.contains(platform) {
            unique.push(*platform);
        }
    }
    Ok((intent.to_string(), unique))
}

/// Mutable session state
#[derive(Debug, Default)]
pub struct SessionState {
    pub phase: SessionPhase,
    pub intent: String,
    pub items: Vec<GeneratedContent>,
    pub created_at: Option<DateTime<Utc>>,
}

impl SessionState {
    /// Replace the session with freshly drafted items and enter `Generating`
    pub fn begin(&mut self, intent: String, items: Vec<GeneratedContent>) -> Vec<String> {
        debug!(%intent, count = items.len(), "SessionState::begin: called");
        let ids = items.iter().map(|i| i.id.clone()).collect();
        *self = SessionState {
            phase: SessionPhase::Generating,
            intent,
            items,
            created_at: Some(Utc::now()),
        };
        ids
    }

    pub fn item(&self, id: &str) -> Option<&GeneratedContent> {
        self.items.iter().find(|i| i.id == id)
    }

    fn item_mut(&mut self, id: &str) -> SessionResult<&mut GeneratedContent> {
        self.items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| SessionError::NotFound(id.to_string()))
    }

    /// Approve one item; items still generating cannot be approved
    pub fn approve(&mut self, id: &str) -> SessionResult<()> {
        debug!(%id, "SessionState::approve: called");
        let item = self.item_mut(id)?;
        if item.is_generating() {
            return Err(SessionError::Busy(format!("{} is still generating", id)));
        }
        item.approve();
        Ok(())
    }

    pub fn edit(&mut self, id: &str, text: String) -> SessionResult<()> {
        debug!(%id, "SessionState::edit: called");
        self.item_mut(id)?.edit(text);
        Ok(())
    }

    /// Replace an item's draft, keeping its id; the item returns to `Generating`
    pub fn restart_item(&mut self, id: &str, fresh: GeneratedContent) -> SessionResult<()> {
        debug!(%id, "SessionState::restart_item: called");
        self.item_mut(id)?.replace_with(fresh);
        Ok(())
    }

    /// Approve every item regardless of status; returns how many were touched
    pub fn approve_all(&mut self) -> usize {
        debug!(count = self.items.len(), "SessionState::approve_all: called");
        for item in self.items.iter_mut() {
            item.approve();
        }
        self.items.len()
    }

    pub fn step_started(&mut self, id: &str, index: usize) -> bool {
        match self.item_mut(id) {
            Ok(item) if index < item.reasoning.len() => {
                mark_processing(&mut item.reasoning, index);
                true
            }
            _ => false,
        }
    }

    pub fn step_completed(&mut self, id: &str, index: usize) -> bool {
        match self.item_mut(id) {
            Ok(item) if index < item.reasoning.len() => {
                mark_complete_through(&mut item.reasoning, index);
                true
            }
            _ => false,
        }
    }

    pub fn item_done(&mut self, id: &str) -> bool {
        match self.item_mut(id) {
            Ok(item) => {
                item.mark_ready();
                true
            }
            Err(_) => false,
        }
    }

    /// Leave `Generating` once the initial reveal is over; returns whether the phase changed
    pub fn finish_reveal(&mut self) -> bool {
        debug!(?self.phase, "SessionState::finish_reveal: called");
        if self.phase == SessionPhase::Generating {
            self.phase = SessionPhase::Review;
            true
        } else {
            false
        }
    }

    pub fn snapshot(&self, revealing: bool) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            intent: self.intent.clone(),
            items: self.items.clone(),
            revealing,
            created_at: self.created_at,
        }
    }
}

/// Read-only copy of the session handed to presentation code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub intent: String,
    pub items: Vec<GeneratedContent>,
    /// A reveal task is in flight
    pub revealing: bool,
    pub created_at: Option<DateTime<Utc>>,
}

impl SessionSnapshot {
    pub fn item(&self, id: &str) -> Option<&GeneratedContent> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn approved_count(&self) -> usize {
        self.items
            .iter()
            .filter(|i| i.status == ContentStatus::Approved)
            .count()
    }

    pub fn all_approved(&self) -> bool {
        !self.items.is_empty() && self.approved_count() == self.items.len()
    }

    /// Review with everything approved
    pub fn is_complete(&self) -> bool {
        matches!(self.phase, SessionPhase::Review | SessionPhase::Complete) && self.all_approved()
    }

    /// Intent cut to 80 chars with `...` when longer
    pub fn intent_preview(&self) -> String {
        let head = truncate_chars(&self.intent, INTENT_PREVIEW_CHARS);
        if head.len() < self.intent.len() {
            format!("{}...", head)
        } else {
            head.to_string()
        }
    }

    /// Every item's steps are in reveal order
    pub fn steps_well_ordered(&self) -> bool {
        self.items.iter().all(|i| is_well_ordered(&i.reasoning))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StepStatus;
    use crate::generator::{Sampler, SeededRandom, TemplateEngine, draft};

    fn items(platforms: &[Platform]) -> Vec<GeneratedContent> {
        let engine = TemplateEngine::embedded_only();
        let mut sampler = Sampler::new(Box::new(SeededRandom::new(3)), 0.85..0.97, 0..1);
        platforms
            .iter()
            .map(|p| draft(&engine, &mut sampler, *p, "Test intent").unwrap())
            .collect()
    }

    fn started(platforms: &[Platform]) -> (SessionState, Vec<String>) {
        let mut state = SessionState::default();
        let ids = state.begin("Test intent".to_string(), items(platforms));
        (state, ids)
    }

    #[test]
    fn test_validate_submission_rejects_empty() {
        assert!(matches!(
            validate_submission("   ", &[Platform::Blog]),
            Err(SessionError::InvalidInput(_))
        ));
        assert!(matches!(
            validate_submission("hi", &[]),
            Err(SessionError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_validate_submission_trims_and_dedupes() {
        let (intent, platforms) =
            validate_submission("  hello  ", &[Platform::Blog, Platform::Twitter, Platform::Blog]).unwrap();
        assert_eq!(intent, "hello");
        assert_eq!(platforms, vec![Platform::Blog, Platform::Twitter]);
    }

    #[test]
    fn test_begin_sets_generating() {
        let (state, ids) = started(&[Platform::Twitter, Platform::Blog]);
        assert_eq!(state.phase, SessionPhase::Generating);
        assert_eq!(ids.len(), 2);
        assert_eq!(state.items[0].platform, Platform::Twitter);
        assert_eq!(state.items[1].platform, Platform::Blog);
        assert!(state.created_at.is_some());
    }

    #[test]
    fn test_approve_rejects_generating_item() {
        let (mut state, ids) = started(&[Platform::Twitter]);
        assert!(matches!(state.approve(&ids[0]), Err(SessionError::Busy(_))));

        state.item_done(&ids[0]);
        state.approve(&ids[0]).unwrap();
        assert_eq!(state.items[0].status, ContentStatus::Approved);

        // Idempotent
        let before = state.items[0].clone();
        state.approve(&ids[0]).unwrap();
        assert_eq!(state.items[0], before);
    }

    #[test]
    fn test_unknown_id_is_not_found_and_harmless() {
        let (mut state, _) = started(&[Platform::Twitter, Platform::Blog]);
        let before = state.items.clone();
        assert_eq!(
            state.approve("nope"),
            Err(SessionError::NotFound("nope".to_string()))
        );
        assert!(matches!(state.edit("nope", "x".to_string()), Err(SessionError::NotFound(_))));
        assert_eq!(state.items, before);
    }

    #[test]
    fn test_edit_approve_edit_keeps_latest_text() {
        let (mut state, ids) = started(&[Platform::Linkedin]);
        state.item_done(&ids[0]);
        state.edit(&ids[0], "first".to_string()).unwrap();
        state.approve(&ids[0]).unwrap();
        state.edit(&ids[0], "second".to_string()).unwrap();

        let item = state.item(&ids[0]).unwrap();
        assert!(item.is_edited);
        assert_eq!(item.edited_content.as_deref(), Some("second"));
        assert_eq!(item.displayed_content(), "second");
        assert_eq!(item.status, ContentStatus::Modified);
    }

    #[test]
    fn test_approve_all_is_unconditional() {
        let (mut state, ids) = started(&[Platform::Twitter, Platform::Blog]);
        state.item_done(&ids[1]);
        assert_eq!(state.approve_all(), 2);
        assert!(state.items.iter().all(|i| i.status == ContentStatus::Approved));
        assert!(state.snapshot(false).all_approved());
    }

    #[test]
    fn test_step_progression() {
        let (mut state, ids) = started(&[Platform::Instagram]);
        assert!(state.step_started(&ids[0], 0));
        assert_eq!(state.items[0].reasoning[0].status, StepStatus::Processing);
        assert!(state.step_completed(&ids[0], 0));
        assert!(state.step_started(&ids[0], 1));
        let snapshot = state.snapshot(true);
        assert!(snapshot.steps_well_ordered());
        assert_eq!(snapshot.items[0].reasoning[0].status, StepStatus::Complete);
        assert_eq!(snapshot.items[0].reasoning[1].status, StepStatus::Processing);
        assert_eq!(snapshot.items[0].reasoning[2].status, StepStatus::Pending);

        assert!(!state.step_started(&ids[0], 9));
        assert!(!state.step_started("nope", 0));
    }

    #[test]
    fn test_finish_reveal_only_from_generating() {
        let (mut state, _) = started(&[Platform::Blog]);
        assert!(state.finish_reveal());
        assert_eq!(state.phase, SessionPhase::Review);
        assert!(!state.finish_reveal());
        assert_eq!(state.phase, SessionPhase::Review);
    }

    #[test]
    fn test_intent_preview() {
        let mut snapshot = SessionState::default().snapshot(false);
        snapshot.intent = "short".to_string();
        assert_eq!(snapshot.intent_preview(), "short");

        snapshot.intent = "z".repeat(90);
        assert_eq!(snapshot.intent_preview(), format!("{}...", "z".repeat(80)));
    }

    #[test]
    fn test_is_complete() {
        let (mut state, _) = started(&[Platform::Blog]);
        state.approve_all();
        assert!(!state.snapshot(false).is_complete());
        state.finish_reveal();
        assert!(state.snapshot(false).is_complete());
    }
}
