//! # proto_core
//!
//! Core design-validate workflow engine for protoforge.
//!
//! The engine alternates between a generation stage (requirements plus
//! prior feedback → artifact) and a validation stage (artifact judged
//! against the requirements), looping until approval or an iteration
//! ceiling, then hands the artifact to a publisher.
//!
//! # Architecture
//!
//! - **Artifact**: the three-part code bundle (markup/style/behavior) with
//!   a tolerant fenced-block extractor
//! - **Syntax checker**: deterministic structural sanity checks
//! - **Engine**: explicit phase machine over `GenerationStage`,
//!   `ValidationStage` and `Publisher` trait objects
//! - **Events**: finite progress stream terminating in complete or error

pub mod artifact;
pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod state;
pub mod syntax;

pub use artifact::{extract_artifact, Artifact};
pub use classify::{classify_requirements, PrototypeKind, RequirementProfile, StylePreference};
pub use config::EngineConfig;
pub use engine::{
    after_validation, DesignEngine, GenerationStage, Phase, Published, Publisher, RunOptions,
    ValidationStage,
};
pub use error::{EngineError, EngineResult};
pub use events::{DesignEvent, DesignOutcome, Step};
pub use state::{RunId, RunState, Validation, Verdict, DEFAULT_MAX_ITERATIONS};
pub use syntax::{check_artifact, CheckMode, SyntaxReport};
