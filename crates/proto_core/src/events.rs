//! Progress events and the final outcome of a design run.

use serde::{Deserialize, Serialize};

use crate::artifact::Artifact;
use crate::state::{RunId, Verdict};

/// Workflow step a progress event refers to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    Designer,
    Judge,
    Finalize,
}

/// Final result handed back to the caller when a run terminates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DesignOutcome {
    pub success: bool,
    #[serde(rename = "runId")]
    pub run_id: RunId,
    #[serde(rename = "previewUrl", skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
    #[serde(rename = "iterationCount")]
    pub iteration_count: u32,
    pub approved: bool,
    #[serde(rename = "validationFeedback")]
    pub validation_feedback: String,
    pub artifact: Artifact,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// One event in the finite progress stream of a run.
///
/// The stream always terminates with exactly one `Complete` or `Error`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DesignEvent {
    Start {
        #[serde(rename = "runId")]
        run_id: RunId,
        requirements: String,
    },
    Progress {
        step: Step,
        #[serde(rename = "iterationCount")]
        iteration_count: u32,
        #[serde(skip_serializing_if = "Option::is_none")]
        verdict: Option<Verdict>,
        #[serde(skip_serializing_if = "Option::is_none")]
        feedback: Option<String>,
    },
    Complete {
        outcome: DesignOutcome,
    },
    Error {
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization_shape() {
        let event = DesignEvent::Progress {
            step: Step::Judge,
            iteration_count: 2,
            verdict: Some(Verdict::Rejected),
            feedback: Some("missing submit button".to_string()),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "progress");
        assert_eq!(json["step"], "judge");
        assert_eq!(json["iterationCount"], 2);
        assert_eq!(json["verdict"], "rejected");
    }

    #[test]
    fn test_start_event_carries_run_id() {
        let event = DesignEvent::Start {
            run_id: RunId::new(),
            requirements: "a landing page".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "start");
        assert!(json["runId"].is_string());
    }
}
