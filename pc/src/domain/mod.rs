//! Domain types for postcraft
//!
//! Platforms, generated drafts and the reasoning steps revealed while they
//! "generate".

mod content;
mod id;
mod platform;
mod reasoning;

pub use content::{ContentStatus, GeneratedContent};
pub use id::generate_id;
pub use platform::{Platform, PlatformConfig, PlatformError};
pub use reasoning::{ReasoningStep, StepKind, StepStatus, is_well_ordered, mark_complete_through, mark_processing};
