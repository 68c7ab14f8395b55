//! List command - show published prototypes.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Args;

use proto_server::{PreviewPublisher, PreviewRegistry};

#[derive(Args)]
pub struct ListArgs {
    /// Output directory to list (defaults to PROTO_OUTPUT_DIR or "outputs")
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
}

pub async fn execute(args: ListArgs) -> Result<()> {
    let output_dir = resolve_output_dir(args.output_dir);
    let publisher = PreviewPublisher::new(Arc::new(PreviewRegistry::new()), &output_dir, 0);

    let prototypes = publisher.list_prototypes()?;
    if prototypes.is_empty() {
        println!("No prototypes in {}", output_dir.display());
        return Ok(());
    }

    println!("Prototypes in {}:", output_dir.display());
    for entry in prototypes {
        println!(
            "  {}  {:>8} bytes  {}",
            entry.filename,
            entry.size,
            entry.modified.format("%Y-%m-%d %H:%M:%S")
        );
    }
    Ok(())
}

/// CLI flag wins, then the environment, then the default.
pub fn resolve_output_dir(flag: Option<PathBuf>) -> PathBuf {
    flag.or_else(|| {
        std::env::var("PROTO_OUTPUT_DIR")
            .ok()
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    })
    .unwrap_or_else(|| PathBuf::from("outputs"))
}
