//! postcraft - turn one content intent into platform-ready drafts
//!
//! A single intent is adapted into drafts for Twitter/X, LinkedIn, Instagram
//! and a blog post. Each draft carries a short list of reasoning steps that
//! are revealed one at a time while the draft "generates", after which the
//! drafts can be approved, edited, regenerated and exported as JSON.
//!
//! # Modules
//!
//! - [`domain`] - Platforms, drafts and reasoning steps
//! - [`generator`] - Template rendering and confidence/timing sampling
//! - [`session`] - Session actor driving the reveal and review operations
//! - [`export`] - JSON export of reviewed drafts
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface
//! - [`repl`] - Interactive review loop

pub mod cli;
pub mod config;
pub mod domain;
pub mod export;
pub mod generator;
pub mod render;
pub mod repl;
pub mod session;

// Re-export commonly used types
pub use config::Config;
pub use domain::{ContentStatus, GeneratedContent, Platform, PlatformConfig, ReasoningStep, StepKind, StepStatus};
pub use export::{ExportRecord, export_json, export_records, write_export};
pub use generator::{Sampler, SeededRandom, TemplateEngine, build_steps, draft};
pub use session::{SessionError, SessionEvent, SessionManager, SessionPhase, SessionSnapshot};
