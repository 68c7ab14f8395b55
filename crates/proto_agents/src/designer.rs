//! Generation stage: turns requirements plus reviewer feedback into a
//! fresh artifact via one completion call.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use proto_core::{classify_requirements, extract_artifact, Artifact, GenerationStage};
use proto_llm::{ChatMessage, CompletionBackend, CompletionRequest};

/// Sampling temperature for generation.
const DESIGNER_TEMPERATURE: f32 = 0.7;

/// Fixed response substituted when the completion service fails, so the
/// workflow keeps moving instead of stalling. The page itself tells the
/// user what happened.
const FALLBACK_RESPONSE: &str = r#"```html
<div class="container">
    <h1>Prototype generation failed</h1>
    <p>The prototype could not be generated due to a technical problem. Please try again later.</p>
    <button onclick="location.reload()">Reload</button>
</div>
```

```css
.container {
    max-width: 800px;
    margin: 50px auto;
    padding: 20px;
    text-align: center;
    font-family: Arial, sans-serif;
}

h1 {
    color: #e74c3c;
    margin-bottom: 20px;
}

button {
    background-color: #3498db;
    color: white;
    padding: 10px 20px;
    border: none;
    border-radius: 5px;
    cursor: pointer;
    font-size: 16px;
}

button:hover {
    background-color: #2980b9;
}
```

```javascript
console.log('prototype generation failed, fallback page served');
```"#;

/// The designer stage.
pub struct DesignerStage {
    backend: Arc<dyn CompletionBackend>,
    model: String,
    max_tokens: u32,
}

impl DesignerStage {
    pub fn new(backend: Arc<dyn CompletionBackend>, model: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            backend,
            model: model.into(),
            max_tokens,
        }
    }

    /// The artifact served when generation is unavailable.
    pub fn fallback_artifact() -> Artifact {
        extract_artifact(FALLBACK_RESPONSE)
    }
}

#[async_trait]
impl GenerationStage for DesignerStage {
    async fn generate(&self, requirements: &str, prior_feedback: Option<&str>) -> Artifact {
        let profile = classify_requirements(requirements);
        let request = CompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(crate::prompts::DESIGNER_SYSTEM_PROMPT),
                ChatMessage::user(crate::prompts::designer_prompt(
                    requirements,
                    &profile,
                    prior_feedback,
                )),
            ],
            temperature: DESIGNER_TEMPERATURE,
            max_tokens: self.max_tokens,
        };

        let response = match self.backend.complete(request).await {
            Ok(response) => {
                debug!(
                    prompt_tokens = response.usage.prompt_tokens,
                    completion_tokens = response.usage.completion_tokens,
                    "designer completion"
                );
                response.content
            }
            Err(e) => {
                warn!(error = %e, "generation service failed, using fallback artifact");
                FALLBACK_RESPONSE.to_string()
            }
        };

        extract_artifact(&response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proto_llm::{CompletionResponse, LlmError, LlmResult, Usage};
    use std::sync::Mutex;

    struct RecordingBackend {
        response: LlmResult<String>,
        prompts: Mutex<Vec<String>>,
    }

    impl RecordingBackend {
        fn ok(content: &str) -> Self {
            Self {
                response: Ok(content.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                response: Err(LlmError::Network("connection refused".to_string())),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CompletionBackend for RecordingBackend {
        async fn complete(&self, request: CompletionRequest) -> LlmResult<CompletionResponse> {
            let rendered = request
                .messages
                .iter()
                .map(|m| serde_json::to_string(m).unwrap())
                .collect::<Vec<_>>()
                .join("\n");
            self.prompts.lock().unwrap().push(rendered);
            match &self.response {
                Ok(content) => Ok(CompletionResponse {
                    content: content.clone(),
                    usage: Usage::default(),
                }),
                Err(_) => Err(LlmError::Network("connection refused".to_string())),
            }
        }
    }

    #[tokio::test]
    async fn test_generate_extracts_artifact() {
        let backend = Arc::new(RecordingBackend::ok(
            "```html\n<div>ok</div>\n```\n```css\ndiv { color: blue; }\n```\n```js\nlet a = 1;\n```",
        ));
        let stage = DesignerStage::new(backend, "test-model", 4000);

        let artifact = stage.generate("a widget", None).await;
        assert_eq!(artifact.markup, "<div>ok</div>");
        assert_eq!(artifact.behavior, "let a = 1;");
    }

    #[tokio::test]
    async fn test_service_failure_yields_fallback_artifact() {
        let backend = Arc::new(RecordingBackend::failing());
        let stage = DesignerStage::new(backend, "test-model", 4000);

        let artifact = stage.generate("anything at all", None).await;
        assert_eq!(artifact, DesignerStage::fallback_artifact());
        // the fallback carries markup so the syntax checker lets it through
        assert!(artifact.markup.contains("generation failed"));
    }

    #[tokio::test]
    async fn test_feedback_reaches_the_prompt() {
        let backend = Arc::new(RecordingBackend::ok("```html\n<p>x</p>\n```"));
        let stage = DesignerStage::new(backend.clone(), "test-model", 4000);

        stage.generate("a form", Some("add a cancel button")).await;
        let prompts = backend.prompts.lock().unwrap();
        assert!(prompts[0].contains("add a cancel button"));
    }

    #[tokio::test]
    async fn test_empty_requirements_still_produce_an_artifact() {
        let backend = Arc::new(RecordingBackend::failing());
        let stage = DesignerStage::new(backend, "test-model", 4000);

        let artifact = stage.generate("", None).await;
        assert!(!artifact.markup.is_empty());
    }
}
