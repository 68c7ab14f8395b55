//! Preview server and prototype publishing.
//!
//! [`PreviewRegistry`] runs one static file server per output directory;
//! [`PreviewPublisher`] writes finished prototypes into that directory and
//! hands back their preview URLs.

pub mod error;
pub mod preview;
pub mod publish;

pub use error::{ServerError, ServerResult};
pub use preview::{PreviewHandle, PreviewRegistry};
pub use publish::{PreviewPublisher, PrototypeEntry};
