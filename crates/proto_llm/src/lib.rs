//! # proto_llm
//!
//! OpenAI-compatible chat completion client for protoforge.
//!
//! Two logical services are consumed through the same endpoint: a
//! code-generation model and a judging model (text- or vision-capable).
//! The [`CompletionBackend`] trait is the seam stages depend on.

pub mod client;
pub mod error;

pub use client::{
    ChatMessage, CompletionBackend, CompletionRequest, CompletionResponse, Content, ContentPart,
    ImageUrl, LlmClient, Role, Usage,
};
pub use error::{LlmError, LlmResult};
