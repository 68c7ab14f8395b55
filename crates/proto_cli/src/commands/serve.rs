//! Serve command - run the preview server without a design run.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use proto_server::PreviewRegistry;

use super::list::resolve_output_dir;

#[derive(Args)]
pub struct ServeArgs {
    /// Output directory to serve (defaults to PROTO_OUTPUT_DIR or "outputs")
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Preferred port (scans forward when taken, 0 for ephemeral)
    #[arg(short, long, default_value_t = 8000)]
    port: u16,
}

pub async fn execute(args: ServeArgs) -> Result<()> {
    let output_dir = resolve_output_dir(args.output_dir);
    let registry = PreviewRegistry::new();

    let handle = registry.ensure_started(&output_dir, args.port).await?;
    println!("🌐 Serving {} at {}", handle.output_dir.display(), handle.url);
    println!("   Press Ctrl-C to stop");

    tokio::signal::ctrl_c().await?;
    registry.stop(&output_dir);
    Ok(())
}
