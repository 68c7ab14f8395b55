//! Designer and judge stages for the protoforge workflow.
//!
//! [`DesignerStage`] implements generation, [`JudgeStage`] implements
//! validation with a render-and-inspect path that degrades to text-only
//! review, and [`PageRenderer`] drives the headless browser that the
//! render path depends on.

pub mod designer;
pub mod judge;
pub mod prompts;
pub mod renderer;

pub use designer::DesignerStage;
pub use judge::{JudgeStage, Renderer};
pub use prompts::parse_verdict;
pub use renderer::{PageRenderer, RenderError};
