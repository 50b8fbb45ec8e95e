//! SessionManager - actor that owns the generation session
//!
//! Processes commands via channels so the session has exactly one mutator.

use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::domain::{GeneratedContent, Platform};
use crate::export::{ExportRecord, export_records};
use crate::generator::{Sampler, SeededRandom, TemplateEngine, draft};

use super::messages::{RevealUpdate, SessionCommand, SessionError, SessionEvent, SessionResult};
use super::reveal::{RevealItem, RevealPlan, run_reveal};
use super::state::{SessionPhase, SessionSnapshot, SessionState, validate_submission};

/// Command channel capacity
const COMMAND_CAPACITY: usize = 256;

/// Event channel capacity
const EVENT_CAPACITY: usize = 256;

/// Handle to send commands to the session actor
#[derive(Clone)]
pub struct SessionManager {
    tx: mpsc::Sender<SessionCommand>,
    /// Broadcast sender for state change notifications
    event_tx: broadcast::Sender<SessionEvent>,
}

impl SessionManager {
    /// Spawn a new session actor; must be called inside a tokio runtime
    pub fn spawn(engine: TemplateEngine, sampler: Sampler) -> Self {
        debug!("SessionManager::spawn: called");
        let (tx, rx) = mpsc::channel(COMMAND_CAPACITY);
        let (event_tx, _) = broadcast::channel(EVENT_CAPACITY);

        let actor = SessionActor {
            state: SessionState::default(),
            engine,
            sampler,
            epoch: 0,
            reveal: None,
            self_tx: tx.downgrade(),
            event_tx: event_tx.clone(),
        };
        tokio::spawn(actor_loop(actor, rx));

        info!("SessionManager spawned");
        Self { tx, event_tx }
    }

    /// Spawn with the engine and sampler described by a config
    pub fn from_config(config: &Config) -> Self {
        debug!("SessionManager::from_config: called");
        let engine = TemplateEngine::new(config.templates.dir.as_ref());
        let source = SeededRandom::from_seed_opt(config.generation.seed);
        let sampler = Sampler::from_config(Box::new(source), &config.generation, &config.reveal);
        Self::spawn(engine, sampler)
    }

    /// Subscribe to state change events
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.event_tx.subscribe()
    }

    async fn request<T>(&self, make: impl FnOnce(oneshot::Sender<T>) -> SessionCommand) -> SessionResult<T> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(make(reply_tx))
            .await
            .map_err(|_| SessionError::ChannelError)?;
        reply_rx.await.map_err(|_| SessionError::ChannelError)
    }

    /// Start generating drafts; returns item ids once the reveal is under way
    pub async fn submit(&self, intent: &str, platforms: &[Platform]) -> SessionResult<Vec<String>> {
        debug!(intent_len = intent.len(), ?platforms, "submit: called");
        let intent = intent.to_string();
        let platforms = platforms.to_vec();
        self.request(|reply| SessionCommand::Submit {
            intent,
            platforms,
            reply,
        })
        .await?
    }

    /// Approve one item
    pub async fn approve(&self, id: &str) -> SessionResult<()> {
        debug!(%id, "approve: called");
        let id = id.to_string();
        self.request(|reply| SessionCommand::Approve { id, reply }).await?
    }

    /// Replace the displayed text of one item
    pub async fn edit(&self, id: &str, text: &str) -> SessionResult<()> {
        debug!(%id, text_len = text.len(), "edit: called");
        let id = id.to_string();
        let text = text.to_string();
        self.request(|reply| SessionCommand::Edit { id, text, reply }).await?
    }

    /// Redraft one item and reveal it again
    pub async fn regenerate(&self, id: &str) -> SessionResult<()> {
        debug!(%id, "regenerate: called");
        let id = id.to_string();
        self.request(|reply| SessionCommand::Regenerate { id, reply }).await?
    }

    /// Approve every item; returns how many items there were
    pub async fn approve_all(&self) -> SessionResult<usize> {
        debug!("approve_all: called");
        self.request(|reply| SessionCommand::ApproveAll { reply }).await?
    }

    /// Discard the session and any reveal in flight
    pub async fn reset(&self) -> SessionResult<()> {
        debug!("reset: called");
        self.request(|reply| SessionCommand::Reset { reply }).await?
    }

    /// Consistent copy of the current session
    pub async fn snapshot(&self) -> SessionResult<SessionSnapshot> {
        self.request(|reply| SessionCommand::Snapshot { reply }).await
    }

    /// Export records in item order
    pub async fn export(&self) -> SessionResult<Vec<ExportRecord>> {
        debug!("export: called");
        self.request(|reply| SessionCommand::Export { reply }).await
    }

    /// Wait until no reveal is in flight
    pub async fn wait_for_idle(&self) -> SessionResult<SessionSnapshot> {
        debug!("wait_for_idle: called");
        // Subscribe before looking so a finish between the two is not missed
        let mut events = self.subscribe();
        loop {
            let snapshot = self.snapshot().await?;
            if !snapshot.revealing {
                return Ok(snapshot);
            }
            loop {
                match events.recv().await {
                    Ok(SessionEvent::RevealFinished) | Ok(SessionEvent::SessionReset) => break,
                    Ok(_) => continue,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        debug!(skipped, "wait_for_idle: lagged, re-checking");
                        break;
                    }
                    Err(broadcast::error::RecvError::Closed) => return Err(SessionError::ChannelError),
                }
            }
        }
    }

    /// Stop the actor
    pub async fn shutdown(&self) -> SessionResult<()> {
        debug!("shutdown: called");
        self.tx
            .send(SessionCommand::Shutdown)
            .await
            .map_err(|_| SessionError::ChannelError)
    }
}

/// The reveal task currently allowed to touch state
struct ActiveReveal {
    epoch: u64,
    handle: JoinHandle<()>,
}

struct SessionActor {
    state: SessionState,
    engine: TemplateEngine,
    sampler: Sampler,
    /// Bumped on every submit, regenerate and reset
    epoch: u64,
    reveal: Option<ActiveReveal>,
    self_tx: mpsc::WeakSender<SessionCommand>,
    event_tx: broadcast::Sender<SessionEvent>,
}

impl SessionActor {
    fn emit(&self, event: SessionEvent) {
        // No subscribers is fine
        let _ = self.event_tx.send(event);
    }

    fn is_revealing(&self) -> bool {
        self.reveal.is_some()
    }

    /// Invalidate and abort whatever reveal is running
    fn cancel_reveal(&mut self) {
        self.epoch += 1;
        if let Some(active) = self.reveal.take() {
            debug!(epoch = active.epoch, "cancel_reveal: aborting reveal task");
            active.handle.abort();
        }
    }

    fn draft_all(&mut self, intent: &str, platforms: &[Platform]) -> SessionResult<Vec<GeneratedContent>> {
        platforms
            .iter()
            .map(|p| {
                draft(&self.engine, &mut self.sampler, *p, intent).map_err(|e| SessionError::Template(e.to_string()))
            })
            .collect()
    }

    /// Sample delays and spawn a reveal for the given items under a new epoch
    fn start_reveal(&mut self, item_ids: Vec<String>) {
        self.cancel_reveal();
        let epoch = self.epoch;

        let items = item_ids
            .into_iter()
            .map(|item_id| {
                let steps = self.state.item(&item_id).map(|i| i.reasoning.len()).unwrap_or(0);
                let delays = (0..steps).map(|_| self.sampler.step_delay()).collect();
                RevealItem { item_id, delays }
            })
            .collect();
        let plan = RevealPlan { epoch, items };

        let Some(tx) = self.self_tx.upgrade() else {
            warn!("start_reveal: command channel closed, not starting reveal");
            return;
        };
        info!(epoch, total_delay = ?plan.total_delay(), "Starting reveal");
        let handle = tokio::spawn(run_reveal(tx, plan));
        self.reveal = Some(ActiveReveal { epoch, handle });
    }

    fn submit(&mut self, intent: String, platforms: Vec<Platform>) -> SessionResult<Vec<String>> {
        let (intent, platforms) = validate_submission(&intent, &platforms)?;
        if self.is_revealing() {
            return Err(SessionError::Busy("a generation is already running".to_string()));
        }

        let items = self.draft_all(&intent, &platforms)?;
        let ids = self.state.begin(intent, items);
        info!(count = ids.len(), "Session started");

        self.emit(SessionEvent::PhaseChanged {
            phase: SessionPhase::Generating,
        });
        self.emit(SessionEvent::ItemsCreated { ids: ids.clone() });
        self.start_reveal(ids.clone());
        Ok(ids)
    }

    fn regenerate(&mut self, id: String) -> SessionResult<()> {
        let platform = self
            .state
            .item(&id)
            .map(|i| i.platform)
            .ok_or_else(|| SessionError::NotFound(id.clone()))?;
        if self.is_revealing() {
            return Err(SessionError::Busy("a generation is already running".to_string()));
        }

        let intent = self.state.intent.clone();
        let fresh = draft(&self.engine, &mut self.sampler, platform, &intent)
            .map_err(|e| SessionError::Template(e.to_string()))?;
        self.state.restart_item(&id, fresh)?;
        info!(%id, %platform, "Regenerating item");

        self.emit(SessionEvent::ItemUpdated { item_id: id.clone() });
        self.start_reveal(vec![id]);
        Ok(())
    }

    fn reset(&mut self) {
        self.cancel_reveal();
        self.state = SessionState::default();
        info!("Session reset");
        self.emit(SessionEvent::PhaseChanged {
            phase: SessionPhase::Input,
        });
        self.emit(SessionEvent::SessionReset);
    }

    fn apply_reveal(&mut self, epoch: u64, update: RevealUpdate) {
        let current = self.reveal.as_ref().map(|r| r.epoch);
        if current != Some(epoch) {
            debug!(epoch, ?current, ?update, "apply_reveal: stale update dropped");
            return;
        }

        match update {
            RevealUpdate::StepStarted { item_id, index } => {
                if self.state.step_started(&item_id, index) {
                    let kind = self.state.item(&item_id).map(|i| i.reasoning[index].kind);
                    if let Some(kind) = kind {
                        self.emit(SessionEvent::StepStarted { item_id, index, kind });
                    }
                }
            }
            RevealUpdate::StepCompleted { item_id, index } => {
                if self.state.step_completed(&item_id, index) {
                    let kind = self.state.item(&item_id).map(|i| i.reasoning[index].kind);
                    if let Some(kind) = kind {
                        self.emit(SessionEvent::StepCompleted { item_id, index, kind });
                    }
                }
            }
            RevealUpdate::ItemDone { item_id } => {
                if self.state.item_done(&item_id) {
                    self.emit(SessionEvent::ItemReady { item_id });
                }
            }
            RevealUpdate::Finished => {
                self.reveal = None;
                if self.state.finish_reveal() {
                    self.emit(SessionEvent::PhaseChanged {
                        phase: self.state.phase,
                    });
                }
                info!(epoch, "Reveal finished");
                self.emit(SessionEvent::RevealFinished);
            }
        }
    }
}

/// The actor loop that owns the session and processes commands
async fn actor_loop(mut actor: SessionActor, mut rx: mpsc::Receiver<SessionCommand>) {
    debug!("SessionManager actor started");

    while let Some(cmd) = rx.recv().await {
        match cmd {
            SessionCommand::Submit {
                intent,
                platforms,
                reply,
            } => {
                debug!(?platforms, "actor_loop: Submit command");
                let _ = reply.send(actor.submit(intent, platforms));
            }

            SessionCommand::Approve { id, reply } => {
                debug!(%id, "actor_loop: Approve command");
                let result = actor.state.approve(&id);
                if result.is_ok() {
                    actor.emit(SessionEvent::ItemUpdated { item_id: id });
                }
                let _ = reply.send(result);
            }

            SessionCommand::Edit { id, text, reply } => {
                debug!(%id, "actor_loop: Edit command");
                let result = actor.state.edit(&id, text);
                if result.is_ok() {
                    actor.emit(SessionEvent::ItemUpdated { item_id: id });
                }
                let _ = reply.send(result);
            }

            SessionCommand::Regenerate { id, reply } => {
                debug!(%id, "actor_loop: Regenerate command");
                let _ = reply.send(actor.regenerate(id));
            }

            SessionCommand::ApproveAll { reply } => {
                debug!("actor_loop: ApproveAll command");
                let count = actor.state.approve_all();
                let ids: Vec<String> = actor.state.items.iter().map(|i| i.id.clone()).collect();
                for item_id in ids {
                    actor.emit(SessionEvent::ItemUpdated { item_id });
                }
                let _ = reply.send(Ok(count));
            }

            SessionCommand::Reset { reply } => {
                debug!("actor_loop: Reset command");
                actor.reset();
                let _ = reply.send(Ok(()));
            }

            SessionCommand::Snapshot { reply } => {
                let _ = reply.send(actor.state.snapshot(actor.is_revealing()));
            }

            SessionCommand::Export { reply } => {
                debug!("actor_loop: Export command");
                let _ = reply.send(export_records(&actor.state.items));
            }

            SessionCommand::Reveal { epoch, update } => {
                actor.apply_reveal(epoch, update);
            }

            SessionCommand::Shutdown => {
                info!("SessionManager shutting down");
                actor.cancel_reveal();
                break;
            }
        }
    }

    debug!("SessionManager actor stopped");
}
