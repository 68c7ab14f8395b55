//! Mutable run state threaded through every stage of a design run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::artifact::Artifact;

/// Default iteration ceiling when the caller does not configure one.
pub const DEFAULT_MAX_ITERATIONS: u32 = 5;

/// Opaque run identifier, used to key preview files and log spans.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct RunId(Uuid);

impl RunId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Short collision-resistant token used in published filenames.
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Binary outcome of a validation pass.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Unset,
    Approved,
    Rejected,
}

impl Default for Verdict {
    fn default() -> Self {
        Self::Unset
    }
}

impl Verdict {
    pub fn is_approved(self) -> bool {
        matches!(self, Self::Approved)
    }
}

/// Verdict plus free-form feedback from one validation pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Validation {
    pub verdict: Verdict,
    pub feedback: String,
}

impl Validation {
    pub fn approved(feedback: impl Into<String>) -> Self {
        Self {
            verdict: Verdict::Approved,
            feedback: feedback.into(),
        }
    }

    pub fn rejected(feedback: impl Into<String>) -> Self {
        Self {
            verdict: Verdict::Rejected,
            feedback: feedback.into(),
        }
    }
}

/// The single mutable record owned by one run for its whole duration.
///
/// `iteration_count` is monotonic non-decreasing; the artifact is replaced
/// wholesale by each generation pass; only `validation_feedback` carries
/// forward between iterations, as prompt input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    #[serde(rename = "runId")]
    pub run_id: RunId,
    pub requirements: String,
    pub artifact: Artifact,
    pub verdict: Verdict,
    #[serde(rename = "validationFeedback")]
    pub validation_feedback: String,
    #[serde(rename = "iterationCount")]
    pub iteration_count: u32,
    #[serde(rename = "maxIterations")]
    pub max_iterations: u32,
    #[serde(rename = "previewUrl", skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
    /// Presence is fatal for this run.
    #[serde(rename = "errorMessage", skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(rename = "startedAt")]
    pub started_at: DateTime<Utc>,
}

impl RunState {
    pub fn new(requirements: impl Into<String>, max_iterations: u32) -> Self {
        Self {
            run_id: RunId::new(),
            requirements: requirements.into(),
            artifact: Artifact::default(),
            verdict: Verdict::Unset,
            validation_feedback: String::new(),
            iteration_count: 0,
            max_iterations: max_iterations.max(1),
            preview_url: None,
            error_message: None,
            started_at: Utc::now(),
        }
    }

    /// Feedback to thread into the next generation prompt, if any.
    pub fn carried_feedback(&self) -> Option<&str> {
        if self.validation_feedback.trim().is_empty() {
            None
        } else {
            Some(self.validation_feedback.as_str())
        }
    }

    /// Whether the iteration ceiling has been reached.
    pub fn at_ceiling(&self) -> bool {
        self.iteration_count >= self.max_iterations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_id_short_is_eight_chars() {
        let id = RunId::new();
        assert_eq!(id.short().len(), 8);
    }

    #[test]
    fn test_max_iterations_floor_is_one() {
        let state = RunState::new("x", 0);
        assert_eq!(state.max_iterations, 1);
    }

    #[test]
    fn test_carried_feedback_skips_blank() {
        let mut state = RunState::new("x", 5);
        assert!(state.carried_feedback().is_none());
        state.validation_feedback = "  ".to_string();
        assert!(state.carried_feedback().is_none());
        state.validation_feedback = "add a submit button".to_string();
        assert_eq!(state.carried_feedback(), Some("add a submit button"));
    }

    #[test]
    fn test_ceiling() {
        let mut state = RunState::new("x", 2);
        assert!(!state.at_ceiling());
        state.iteration_count = 2;
        assert!(state.at_ceiling());
    }
}
