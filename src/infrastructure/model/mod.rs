//! Chat model access.
//!
//! The agent only needs "send this conversation, get the assistant's text
//! back", so the seam is a single [`ChatModel`] trait. [`ChatClient`] speaks
//! the OpenAI chat-completions dialect, which Ollama also serves.

mod client;
mod error;

pub use client::{Backend, ChatClient};
pub use error::ModelError;

use crate::domain::types::ChatMessage;
use async_trait::async_trait;

#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Backend name used in logs and errors.
    fn label(&self) -> &str;

    /// Returns the assistant's reply to `conversation`.
    async fn reply(&self, conversation: &[ChatMessage]) -> Result<String, ModelError>;
}
