//! Design command - run one design from requirements to a published
//! prototype.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use tracing::warn;

use proto_agents::{DesignerStage, JudgeStage, PageRenderer, Renderer};
use proto_core::{DesignEngine, DesignEvent, EngineConfig, RunOptions};
use proto_llm::{CompletionBackend, LlmClient};
use proto_server::{PreviewPublisher, PreviewRegistry};

#[derive(Args)]
pub struct DesignArgs {
    /// Natural-language requirements for the prototype
    requirements: String,

    /// Iteration ceiling (overrides PROTO_ITERATION_LIMIT)
    #[arg(short = 'n', long)]
    max_iterations: Option<u32>,

    /// Emit progress events as JSON lines instead of human output
    #[arg(long)]
    stream: bool,

    /// Output directory for published prototypes
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Preferred preview-server port
    #[arg(short, long)]
    port: Option<u16>,

    /// Exit after publishing instead of keeping the preview server up
    #[arg(long)]
    no_wait: bool,
}

pub async fn execute(args: DesignArgs) -> Result<()> {
    let mut config = EngineConfig::from_env().context("loading configuration")?;
    if let Some(limit) = args.max_iterations {
        anyhow::ensure!(limit > 0, "invalid argument: --max-iterations must be greater than zero");
        config.max_iterations = limit;
    }
    if let Some(dir) = args.output_dir {
        config.output_dir = dir;
    }
    if let Some(port) = args.port {
        config.preview_port = port;
    }

    let engine = build_engine(&config)?;
    let options = RunOptions {
        max_iterations: config.max_iterations,
    };

    if args.stream {
        return stream_run(&engine, &args.requirements, options).await;
    }

    println!("🎨 Designing prototype ({} iterations max)...", config.max_iterations);
    let outcome = engine.run(&args.requirements, options).await;

    if let Some(error) = &outcome.error {
        anyhow::bail!("run failed: {}", error);
    }

    if outcome.approved {
        println!("✅ Approved after {} iteration(s)", outcome.iteration_count);
    } else {
        println!(
            "⚠️  Iteration ceiling reached after {} iteration(s); publishing the last version",
            outcome.iteration_count
        );
        if !outcome.validation_feedback.is_empty() {
            println!("   Last feedback: {}", outcome.validation_feedback);
        }
    }

    if let Some(url) = &outcome.preview_url {
        println!("🌐 Preview: {}", url);
        if !args.no_wait {
            println!("   Press Ctrl-C to stop the preview server");
            tokio::signal::ctrl_c().await?;
        }
    }

    Ok(())
}

async fn stream_run(
    engine: &Arc<DesignEngine>,
    requirements: &str,
    options: RunOptions,
) -> Result<()> {
    let mut rx = engine.stream(requirements, options);
    let mut failed = None;
    while let Some(event) = rx.recv().await {
        println!("{}", serde_json::to_string(&event)?);
        if let DesignEvent::Error { message } = &event {
            failed = Some(message.clone());
        }
    }
    match failed {
        Some(message) => anyhow::bail!("run failed: {}", message),
        None => Ok(()),
    }
}

fn build_engine(config: &EngineConfig) -> Result<Arc<DesignEngine>> {
    let backend: Arc<dyn CompletionBackend> = Arc::new(
        LlmClient::new(&config.base_url, &config.api_key, config.request_timeout)
            .context("configuration: completion client")?,
    );

    let generator = Arc::new(DesignerStage::new(
        backend.clone(),
        &config.designer_model,
        config.max_output_tokens,
    ));

    let renderer: Option<Arc<dyn Renderer>> = if config.disable_renderer {
        None
    } else if PageRenderer::is_available() {
        Some(Arc::new(PageRenderer::new(config.render_timeout)))
    } else {
        warn!("no headless browser found, judging falls back to text-only");
        None
    };

    let validator = Arc::new(JudgeStage::new(
        backend,
        &config.judge_model,
        config.max_output_tokens,
        renderer,
    ));

    let publisher = Arc::new(PreviewPublisher::new(
        Arc::new(PreviewRegistry::new()),
        &config.output_dir,
        config.preview_port,
    ));

    Ok(Arc::new(DesignEngine::new(generator, validator, publisher)))
}
