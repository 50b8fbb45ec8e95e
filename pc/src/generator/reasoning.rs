//! Reasoning Step Factory
//!
//! Builds the four fixed steps shown while a draft is revealed.

use tracing::debug;

use crate::domain::{Platform, ReasoningStep, StepKind};

/// Build the ordered reasoning steps for a platform, all pending
///
/// Step text depends on the platform only, never on the intent.
pub fn build_steps(platform: Platform, intent: &str) -> Vec<ReasoningStep> {
    debug!(%platform, intent_len = intent.len(), "build_steps: called");
    let config = platform.config();

    vec![
        ReasoningStep::new(
            platform,
            StepKind::Analysis,
            "Analyzing Intent",
            "Understanding core message and key themes from your input",
            strings(&[
                "Identified primary topic and angle",
                "Extracted key value propositions",
                "Detected emotional tone signals",
            ]),
        ),
        ReasoningStep::new(
            platform,
            StepKind::Adaptation,
            format!("Adapting for {}", config.name),
            format!("Restructuring content for {} delivery", config.tone.to_lowercase()),
            strings(config.constraints),
        ),
        ReasoningStep::new(
            platform,
            StepKind::Optimization,
            "Optimizing Engagement",
            "Enhancing hooks, calls-to-action, and platform-specific elements",
            strings(&[
                "Strengthened opening hook",
                "Added strategic formatting",
                "Optimized for algorithm visibility",
            ]),
        ),
        ReasoningStep::new(
            platform,
            StepKind::Validation,
            "Validating Output",
            format!("Ensuring compliance with {} best practices", config.name),
            vec![
                format!("Character count: within {} limit", config.max_length),
                "Tone alignment verified".to_string(),
                "Accessibility check passed".to_string(),
            ],
        ),
    ]
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
