//! Environment-driven engine configuration.
//!
//! Every knob has a default so the engine can start with nothing but an
//! API key in the environment.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{EngineError, EngineResult};
use crate::state::DEFAULT_MAX_ITERATIONS;

/// Configuration for one engine instance.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// API key for the completion services.
    pub api_key: String,
    /// OpenAI-compatible base URL.
    pub base_url: String,
    /// Model used by the generation stage.
    pub designer_model: String,
    /// Model used by the judging stage (text- or vision-capable).
    pub judge_model: String,
    /// Max tokens per completion.
    pub max_output_tokens: u32,
    /// Iteration ceiling.
    pub max_iterations: u32,
    /// Preferred preview-server port.
    pub preview_port: u16,
    /// Directory published prototypes are written to.
    pub output_dir: PathBuf,
    /// When true, skip the render path entirely and judge text-only.
    pub disable_renderer: bool,
    /// Upper bound on every completion call.
    pub request_timeout: Duration,
    /// Upper bound on the renderer load/capture sequence.
    pub render_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://dashscope.aliyuncs.com/compatible-mode/v1".to_string(),
            designer_model: "qwen-coder-plus-latest".to_string(),
            judge_model: "qwen-vl-plus".to_string(),
            max_output_tokens: 4000,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            preview_port: 8000,
            output_dir: PathBuf::from("outputs"),
            disable_renderer: false,
            request_timeout: Duration::from_secs(120),
            render_timeout: Duration::from_secs(30),
        }
    }
}

impl EngineConfig {
    /// Load configuration from the environment.
    ///
    /// `PROTO_API_KEY` wins over the legacy `DASHSCOPE_API_KEY`; a missing
    /// key is an error because both stages need the completion service.
    pub fn from_env() -> EngineResult<Self> {
        let api_key = env::var("PROTO_API_KEY")
            .or_else(|_| env::var("DASHSCOPE_API_KEY"))
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                EngineError::InvalidConfig(
                    "no API key; set PROTO_API_KEY or DASHSCOPE_API_KEY".to_string(),
                )
            })?;

        let mut config = Self {
            api_key,
            ..Self::default()
        };

        if let Ok(url) = env::var("PROTO_BASE_URL") {
            if !url.is_empty() {
                config.base_url = url;
            }
        }
        if let Ok(model) = env::var("PROTO_DESIGNER_MODEL") {
            if !model.is_empty() {
                config.designer_model = model;
            }
        }
        if let Ok(model) = env::var("PROTO_JUDGE_MODEL") {
            if !model.is_empty() {
                config.judge_model = model;
            }
        }
        if let Some(tokens) = parse_env("PROTO_MAX_OUTPUT_TOKENS")? {
            config.max_output_tokens = tokens;
        }
        if let Some(limit) = parse_env::<u32>("PROTO_ITERATION_LIMIT")? {
            if limit == 0 {
                return Err(EngineError::InvalidConfig(
                    "PROTO_ITERATION_LIMIT must be greater than zero".to_string(),
                ));
            }
            config.max_iterations = limit;
        }
        if let Some(port) = parse_env("PROTO_PREVIEW_PORT")? {
            config.preview_port = port;
        }
        if let Ok(dir) = env::var("PROTO_OUTPUT_DIR") {
            if !dir.is_empty() {
                config.output_dir = PathBuf::from(dir);
            }
        }
        config.disable_renderer = env::var("PROTO_DISABLE_RENDERER")
            .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);
        if let Some(secs) = parse_env::<u64>("PROTO_REQUEST_TIMEOUT_SECS")? {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_env::<u64>("PROTO_RENDER_TIMEOUT_SECS")? {
            config.render_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> EngineResult<Option<T>> {
    match env::var(name) {
        Ok(raw) if !raw.is_empty() => raw.parse().map(Some).map_err(|_| {
            EngineError::InvalidConfig(format!("{} has an invalid value: {}", name, raw))
        }),
        _ => Ok(None),
    }
}
