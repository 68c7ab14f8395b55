//! CLI command definitions.
//!
//! Each subcommand maps to one workflow: run a design, list published
//! prototypes, or serve the output directory.

use clap::{Parser, Subcommand};

pub mod design;
pub mod list;
pub mod serve;

/// protoforge - iterative LLM-driven prototype designer
#[derive(Parser)]
#[command(name = "protoforge")]
#[command(version, about = "protoforge - iterative LLM-driven prototype designer")]
#[command(long_about = r#"
protoforge turns natural-language requirements into working web
prototypes. A designer model generates the code, a judge model reviews
it (against a rendered screenshot where a headless browser is
available), and the loop repeats until the judge approves or the
iteration ceiling is reached. The result is published to a local
preview server.

WORKFLOWS:
  design   → Run a design from requirements to a published prototype
  list     → List previously published prototypes
  serve    → Serve the output directory without running a design

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid configuration or arguments
  3 - Run finished with a fatal error

Configuration is environment-driven; PROTO_API_KEY (or the legacy
DASHSCOPE_API_KEY) is required for the design workflow.
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a design from requirements to a published prototype
    Design(design::DesignArgs),

    /// List published prototypes in the output directory
    List(list::ListArgs),

    /// Serve the output directory over the preview server
    Serve(serve::ServeArgs),
}
