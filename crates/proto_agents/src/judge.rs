//! Validation stage: judges an artifact against the requirements.
//!
//! Two strategies: render the artifact and show the judge model a
//! screenshot (preferred), or hand it the raw source (fallback when
//! rendering is unavailable or fails). Structural errors from the syntax
//! checker force rejection regardless of the model's opinion.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use proto_core::{
    check_artifact, Artifact, CheckMode, SyntaxReport, Validation, ValidationStage,
};
use proto_llm::{ChatMessage, CompletionBackend, CompletionRequest};

use crate::prompts::{
    parse_verdict, text_judge_prompt, vision_judge_prompt, TEXT_JUDGE_SYSTEM_PROMPT,
    VISION_JUDGE_SYSTEM_PROMPT,
};
use crate::renderer::RenderError;

/// Sampling temperature for judging.
const JUDGE_TEMPERATURE: f32 = 0.3;

/// Title used for the temporary render document.
const RENDER_TITLE: &str = "Prototype Preview";

/// Screenshot capability the judge degrades on.
#[async_trait]
pub trait Renderer: Send + Sync {
    async fn capture_document(&self, document: String) -> Result<Vec<u8>, RenderError>;
}

#[async_trait]
impl Renderer for crate::renderer::PageRenderer {
    async fn capture_document(&self, document: String) -> Result<Vec<u8>, RenderError> {
        crate::renderer::PageRenderer::capture_document(self, document).await
    }
}

/// The judge stage.
pub struct JudgeStage {
    backend: Arc<dyn CompletionBackend>,
    model: String,
    max_tokens: u32,
    renderer: Option<Arc<dyn Renderer>>,
}

impl JudgeStage {
    /// `renderer: None` means the render path is never attempted.
    pub fn new(
        backend: Arc<dyn CompletionBackend>,
        model: impl Into<String>,
        max_tokens: u32,
        renderer: Option<Arc<dyn Renderer>>,
    ) -> Self {
        Self {
            backend,
            model: model.into(),
            // The judge needs far fewer tokens than the designer.
            max_tokens: max_tokens.min(2000),
            renderer,
        }
    }

    async fn judge_vision(
        &self,
        requirements: &str,
        png: &[u8],
        iteration: u32,
    ) -> Validation {
        let request = CompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(VISION_JUDGE_SYSTEM_PROMPT),
                ChatMessage::user_with_image(vision_judge_prompt(requirements, iteration), png),
            ],
            temperature: JUDGE_TEMPERATURE,
            max_tokens: self.max_tokens,
        };
        self.complete_to_validation(request).await
    }

    async fn judge_text(
        &self,
        requirements: &str,
        artifact: &Artifact,
        iteration: u32,
    ) -> Validation {
        let request = CompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(TEXT_JUDGE_SYSTEM_PROMPT),
                ChatMessage::user(text_judge_prompt(
                    requirements,
                    &artifact.markup,
                    &artifact.style,
                    &artifact.behavior,
                    iteration,
                )),
            ],
            temperature: JUDGE_TEMPERATURE,
            max_tokens: self.max_tokens,
        };
        self.complete_to_validation(request).await
    }

    /// A service failure never escapes as an error: it becomes a
    /// deterministic rejection with explanatory feedback.
    async fn complete_to_validation(&self, request: CompletionRequest) -> Validation {
        match self.backend.complete(request).await {
            Ok(response) => Validation {
                verdict: parse_verdict(&response.content),
                feedback: response.content,
            },
            Err(e) => {
                warn!(error = %e, "judging service failed, rejecting deterministically");
                Validation::rejected(format!(
                    "validation could not be performed ({}); retrying on the next iteration",
                    e
                ))
            }
        }
    }

    fn apply_syntax_override(validation: Validation, report: &SyntaxReport) -> Validation {
        if report.is_valid {
            return validation;
        }
        Validation::rejected(format!(
            "structural errors: {}\n\n{}",
            report.error_summary(),
            validation.feedback
        ))
    }
}

#[async_trait]
impl ValidationStage for JudgeStage {
    async fn validate(
        &self,
        requirements: &str,
        artifact: &Artifact,
        iteration: u32,
    ) -> Validation {
        let report = check_artifact(artifact, CheckMode::Fragment);
        if !report.warnings.is_empty() {
            debug!(warnings = ?report.warnings, "syntax warnings");
        }

        let validation = match &self.renderer {
            Some(renderer) => {
                match renderer
                    .capture_document(artifact.to_document(RENDER_TITLE))
                    .await
                {
                    Ok(png) => {
                        info!(iteration, "judging rendered screenshot");
                        self.judge_vision(requirements, &png, iteration).await
                    }
                    Err(e) => {
                        warn!(iteration, error = %e, "render failed, falling back to text judging");
                        self.judge_text(requirements, artifact, iteration).await
                    }
                }
            }
            None => {
                debug!(iteration, "render path disabled, judging text");
                self.judge_text(requirements, artifact, iteration).await
            }
        };

        Self::apply_syntax_override(validation, &report)
    }
}
