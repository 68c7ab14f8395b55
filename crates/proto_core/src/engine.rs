//! The design-validate state machine.
//!
//! An explicit phase enum with a pure transition function drives the
//! generate → validate → (loop | finalize) cycle. There is no phase in
//! which a run can remain indefinitely: the iteration ceiling is an
//! unconditional escape hatch out of the cycle.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::artifact::Artifact;
use crate::error::EngineResult;
use crate::events::{DesignEvent, DesignOutcome, Step};
use crate::state::{RunId, RunState, Validation, Verdict, DEFAULT_MAX_ITERATIONS};

/// Produces a fresh artifact from requirements and prior feedback.
///
/// Infallible by contract: implementations substitute a fallback artifact
/// on upstream failure so the workflow never stalls.
#[async_trait]
pub trait GenerationStage: Send + Sync {
    async fn generate(&self, requirements: &str, prior_feedback: Option<&str>) -> Artifact;
}

/// Judges an artifact against the original requirements.
///
/// Infallible by contract: upstream failures become deterministic
/// rejections with explanatory feedback.
#[async_trait]
pub trait ValidationStage: Send + Sync {
    async fn validate(&self, requirements: &str, artifact: &Artifact, iteration: u32)
        -> Validation;
}

/// A successfully published prototype.
#[derive(Debug, Clone)]
pub struct Published {
    pub url: String,
    pub filename: String,
}

/// Materializes the final artifact and exposes it over the preview server.
///
/// Unlike the stages, publishing may fail fatally (disk, ports).
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, run_id: &RunId, artifact: &Artifact) -> EngineResult<Published>;
}

/// Phases of a design run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Start,
    Generating,
    Validating,
    Finalizing,
    Done,
}

/// Transition taken after a validation pass.
///
/// Pure so the termination policy can be tested without any stage in play:
/// finalize on approval or once the ceiling is reached, otherwise loop.
pub fn after_validation(verdict: Verdict, iteration_count: u32, max_iterations: u32) -> Phase {
    if verdict.is_approved() || iteration_count >= max_iterations {
        Phase::Finalizing
    } else {
        Phase::Generating
    }
}

/// Options for one run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub max_iterations: u32,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

/// The workflow engine: owns the stage implementations and drives runs.
///
/// Stateless between runs; each run exclusively owns its [`RunState`].
/// Multiple runs may execute concurrently, sharing only the publisher's
/// preview resources.
pub struct DesignEngine {
    generator: Arc<dyn GenerationStage>,
    validator: Arc<dyn ValidationStage>,
    publisher: Arc<dyn Publisher>,
}

impl DesignEngine {
    pub fn new(
        generator: Arc<dyn GenerationStage>,
        validator: Arc<dyn ValidationStage>,
        publisher: Arc<dyn Publisher>,
    ) -> Self {
        Self {
            generator,
            validator,
            publisher,
        }
    }

    /// Run a design to completion and return the outcome.
    pub async fn run(&self, requirements: &str, options: RunOptions) -> DesignOutcome {
        self.run_inner(requirements, options, None).await
    }

    /// Run a design, streaming progress events.
    ///
    /// The stream is finite and terminates with exactly one `Complete` or
    /// `Error` event; it is not restartable mid-stream.
    pub fn stream(
        self: &Arc<Self>,
        requirements: impl Into<String>,
        options: RunOptions,
    ) -> mpsc::UnboundedReceiver<DesignEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        let engine = Arc::clone(self);
        let requirements = requirements.into();
        tokio::spawn(async move {
            engine.run_inner(&requirements, options, Some(tx)).await;
        });
        rx
    }

    async fn run_inner(
        &self,
        requirements: &str,
        options: RunOptions,
        events: Option<mpsc::UnboundedSender<DesignEvent>>,
    ) -> DesignOutcome {
        let mut state = RunState::new(requirements, options.max_iterations);
        let emit = |event: DesignEvent| {
            if let Some(tx) = &events {
                // A dropped receiver only loses progress reporting.
                let _ = tx.send(event);
            }
        };

        info!(run_id = %state.run_id, max_iterations = state.max_iterations, "starting design run");
        emit(DesignEvent::Start {
            run_id: state.run_id.clone(),
            requirements: state.requirements.clone(),
        });

        let mut phase = Phase::Start;
        loop {
            phase = match phase {
                Phase::Start => Phase::Generating,

                Phase::Generating => {
                    let feedback = state.carried_feedback().map(str::to_owned);
                    let artifact = self
                        .generator
                        .generate(&state.requirements, feedback.as_deref())
                        .await;
                    state.iteration_count += 1;
                    state.artifact = artifact;
                    debug!(run_id = %state.run_id, iteration = state.iteration_count, "generated artifact");
                    emit(DesignEvent::Progress {
                        step: Step::Designer,
                        iteration_count: state.iteration_count,
                        verdict: None,
                        feedback: None,
                    });
                    Phase::Validating
                }

                Phase::Validating => {
                    let validation = self
                        .validator
                        .validate(&state.requirements, &state.artifact, state.iteration_count)
                        .await;
                    state.verdict = validation.verdict;
                    state.validation_feedback = validation.feedback;
                    info!(
                        run_id = %state.run_id,
                        iteration = state.iteration_count,
                        verdict = ?state.verdict,
                        "validation verdict"
                    );
                    emit(DesignEvent::Progress {
                        step: Step::Judge,
                        iteration_count: state.iteration_count,
                        verdict: Some(state.verdict),
                        feedback: Some(state.validation_feedback.clone()),
                    });
                    after_validation(state.verdict, state.iteration_count, state.max_iterations)
                }

                Phase::Finalizing => {
                    match self.publisher.publish(&state.run_id, &state.artifact).await {
                        Ok(published) => {
                            info!(run_id = %state.run_id, url = %published.url, "prototype published");
                            state.preview_url = Some(published.url);
                        }
                        Err(e) => {
                            error!(run_id = %state.run_id, error = %e, "publishing failed");
                            state.error_message = Some(e.to_string());
                        }
                    }
                    emit(DesignEvent::Progress {
                        step: Step::Finalize,
                        iteration_count: state.iteration_count,
                        verdict: Some(state.verdict),
                        feedback: None,
                    });
                    Phase::Done
                }

                Phase::Done => break,
            };
        }

        if !state.verdict.is_approved() {
            warn!(run_id = %state.run_id, "run finished without approval");
        }

        let outcome = DesignOutcome {
            success: state.error_message.is_none(),
            run_id: state.run_id.clone(),
            preview_url: state.preview_url.clone(),
            iteration_count: state.iteration_count,
            approved: state.verdict.is_approved(),
            validation_feedback: state.validation_feedback.clone(),
            artifact: state.artifact.clone(),
            error: state.error_message.clone(),
        };

        match &outcome.error {
            Some(message) => emit(DesignEvent::Error {
                message: message.clone(),
            }),
            None => emit(DesignEvent::Complete {
                outcome: outcome.clone(),
            }),
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct StubGenerator {
        calls: AtomicU32,
    }

    impl StubGenerator {
        fn new() -> Self {
            Self {
                calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl GenerationStage for StubGenerator {
        async fn generate(&self, _requirements: &str, _feedback: Option<&str>) -> Artifact {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Artifact::new("<div>stub</div>", ".x { color: red; }", "")
        }
    }

    struct AlwaysReject;

    #[async_trait]
    impl ValidationStage for AlwaysReject {
        async fn validate(&self, _r: &str, _a: &Artifact, _i: u32) -> Validation {
            Validation::rejected("not good enough")
        }
    }

    struct ApproveAt {
        iteration: u32,
    }

    #[async_trait]
    impl ValidationStage for ApproveAt {
        async fn validate(&self, _r: &str, _a: &Artifact, iteration: u32) -> Validation {
            if iteration >= self.iteration {
                Validation::approved("looks complete")
            } else {
                Validation::rejected("needs another pass")
            }
        }
    }

    struct StubPublisher {
        fail: bool,
    }

    #[async_trait]
    impl Publisher for StubPublisher {
        async fn publish(&self, run_id: &RunId, _artifact: &Artifact) -> EngineResult<Published> {
            if self.fail {
                Err(EngineError::PublishFailed("disk full".to_string()))
            } else {
                let filename = format!("prototype_{}.html", run_id.short());
                Ok(Published {
                    url: format!("http://localhost:8000/{}", filename),
                    filename,
                })
            }
        }
    }

    fn engine(
        generator: Arc<StubGenerator>,
        validator: Arc<dyn ValidationStage>,
        fail_publish: bool,
    ) -> DesignEngine {
        DesignEngine::new(
            generator,
            validator,
            Arc::new(StubPublisher { fail: fail_publish }),
        )
    }

    #[test]
    fn test_after_validation_transitions() {
        assert_eq!(after_validation(Verdict::Approved, 1, 5), Phase::Finalizing);
        assert_eq!(after_validation(Verdict::Rejected, 1, 5), Phase::Generating);
        assert_eq!(after_validation(Verdict::Rejected, 5, 5), Phase::Finalizing);
        // ceiling wins even with an unset verdict
        assert_eq!(after_validation(Verdict::Unset, 7, 5), Phase::Finalizing);
    }

    #[tokio::test]
    async fn test_always_reject_terminates_at_ceiling() {
        let generator = Arc::new(StubGenerator::new());
        let engine = engine(generator.clone(), Arc::new(AlwaysReject), false);

        let outcome = engine
            .run("anything", RunOptions { max_iterations: 4 })
            .await;

        assert_eq!(outcome.iteration_count, 4);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 4);
        assert!(!outcome.approved);
        // an exhausted run still publishes whatever artifact exists
        assert!(outcome.success);
        assert!(outcome.preview_url.is_some());
    }

    #[tokio::test]
    async fn test_single_iteration_reject_still_finalizes() {
        let generator = Arc::new(StubGenerator::new());
        let engine = engine(generator.clone(), Arc::new(AlwaysReject), false);

        let outcome = engine
            .run("anything", RunOptions { max_iterations: 1 })
            .await;

        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
        assert!(!outcome.approved);
        assert!(outcome.preview_url.is_some());
    }

    #[tokio::test]
    async fn test_approval_short_circuits_the_loop() {
        let generator = Arc::new(StubGenerator::new());
        let engine = engine(generator.clone(), Arc::new(ApproveAt { iteration: 2 }), false);

        let outcome = engine
            .run("anything", RunOptions { max_iterations: 5 })
            .await;

        assert!(outcome.approved);
        assert_eq!(outcome.iteration_count, 2);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_publish_failure_is_fatal_for_the_run() {
        let generator = Arc::new(StubGenerator::new());
        let engine = engine(generator, Arc::new(ApproveAt { iteration: 1 }), true);

        let outcome = engine.run("anything", RunOptions::default()).await;

        assert!(!outcome.success);
        assert!(outcome.error.as_deref().unwrap().contains("disk full"));
        assert!(outcome.preview_url.is_none());
    }

    #[tokio::test]
    async fn test_stream_terminates_with_complete() {
        let generator = Arc::new(StubGenerator::new());
        let engine = Arc::new(engine(generator, Arc::new(ApproveAt { iteration: 1 }), false));

        let mut rx = engine.stream("anything", RunOptions::default());
        let mut saw_start = false;
        let mut last = None;
        while let Some(event) = rx.recv().await {
            if matches!(event, DesignEvent::Start { .. }) {
                saw_start = true;
            }
            last = Some(event);
        }
        assert!(saw_start);
        assert!(matches!(last, Some(DesignEvent::Complete { .. })));
    }

    #[tokio::test]
    async fn test_stream_terminates_with_error_on_publish_failure() {
        let generator = Arc::new(StubGenerator::new());
        let engine = Arc::new(engine(generator, Arc::new(AlwaysReject), true));

        let mut rx = engine.stream("anything", RunOptions { max_iterations: 1 });
        let mut last = None;
        while let Some(event) = rx.recv().await {
            last = Some(event);
        }
        assert!(matches!(last, Some(DesignEvent::Error { .. })));
    }
}
