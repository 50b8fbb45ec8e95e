//! ReasoningStep domain type
//!
//! One of four fixed presentational stages revealed while a draft "generates".

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::platform::Platform;

/// Kind of reasoning step, always revealed in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Analysis,
    Adaptation,
    Optimization,
    Validation,
}

impl StepKind {
    /// The fixed reveal order
    pub const ORDER: [StepKind; 4] = [Self::Analysis, Self::Adaptation, Self::Optimization, Self::Validation];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Analysis => "analysis",
            Self::Adaptation => "adaptation",
            Self::Optimization => "optimization",
            Self::Validation => "validation",
        }
    }
}

impl std::fmt::Display for StepKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Step status; moves forward only within one generation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    #[default]
    Pending,
    Processing,
    Complete,
}

impl std::fmt::Display for StepStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Processing => write!(f, "processing"),
            Self::Complete => write!(f, "complete"),
        }
    }
}

/// A single simulated reasoning stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasoningStep {
    /// `{platform}-{kind}`
    pub id: String,
    pub kind: StepKind,
    pub title: String,
    pub description: String,
    pub status: StepStatus,
    #[serde(default)]
    pub insights: Option<Vec<String>>,
}

impl ReasoningStep {
    pub fn new(
        platform: Platform,
        kind: StepKind,
        title: impl Into<String>,
        description: impl Into<String>,
        insights: Vec<String>,
    ) -> Self {
        Self {
            id: format!("{}-{}", platform, kind),
            kind,
            title: title.into(),
            description: description.into(),
            status: StepStatus::Pending,
            insights: if insights.is_empty() { None } else { Some(insights) },
        }
    }
}

/// Mark `index` processing, everything before it complete and everything after pending
pub fn mark_processing(steps: &mut [ReasoningStep], index: usize) {
    debug!(index, "mark_processing: called");
    for (i, step) in steps.iter_mut().enumerate() {
        step.status = if i < index {
            StepStatus::Complete
        } else if i == index {
            StepStatus::Processing
        } else {
            StepStatus::Pending
        };
    }
}

/// Mark `index` and everything before it complete, everything after pending
pub fn mark_complete_through(steps: &mut [ReasoningStep], index: usize) {
    debug!(index, "mark_complete_through: called");
    for (i, step) in steps.iter_mut().enumerate() {
        step.status = if i <= index {
            StepStatus::Complete
        } else {
            StepStatus::Pending
        };
    }
}

/// True when statuses never go back up the order: complete* processing? pending*
pub fn is_well_ordered(steps: &[ReasoningStep]) -> bool {
    steps.windows(2).all(|pair| {
        let (a, b) = (pair[0].status, pair[1].status);
        a >= b && !(a == StepStatus::Processing && b == StepStatus::Processing)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn four_steps() -> Vec<ReasoningStep> {
        StepKind::ORDER
            .iter()
            .map(|kind| ReasoningStep::new(Platform::Blog, *kind, "t", "d", vec![]))
            .collect()
    }

    fn statuses(steps: &[ReasoningStep]) -> Vec<StepStatus> {
        steps.iter().map(|s| s.status).collect()
    }

    #[test]
    fn test_step_id_format() {
        let step = ReasoningStep::new(Platform::Twitter, StepKind::Adaptation, "t", "d", vec![]);
        assert_eq!(step.id, "twitter-adaptation");
        assert!(step.insights.is_none());
    }

    #[test]
    fn test_mark_processing() {
        let mut steps = four_steps();
        mark_processing(&mut steps, 2);
        assert_eq!(
            statuses(&steps),
            vec![
                StepStatus::Complete,
                StepStatus::Complete,
                StepStatus::Processing,
                StepStatus::Pending
            ]
        );
        assert!(is_well_ordered(&steps));
    }

    #[test]
    fn test_mark_complete_through() {
        let mut steps = four_steps();
        mark_complete_through(&mut steps, 1);
        assert_eq!(
            statuses(&steps),
            vec![
                StepStatus::Complete,
                StepStatus::Complete,
                StepStatus::Pending,
                StepStatus::Pending
            ]
        );
    }

    #[test]
    fn test_is_well_ordered_rejects_reopened_step() {
        let mut steps = four_steps();
        steps[0].status = StepStatus::Pending;
        steps[1].status = StepStatus::Complete;
        assert!(!is_well_ordered(&steps));
    }
}
