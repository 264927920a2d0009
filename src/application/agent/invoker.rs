use super::errors::AgentError;
use async_trait::async_trait;
use serde_json::Value;

/// Raw payload returned by an agent run.
///
/// Agent frameworks hand back their answer in different places; each variant
/// records where the text was found so the parser can probe them in order.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentResponse {
    Content(String),
    Text(String),
    FinalOutput(String),
    /// An arbitrary JSON document; probed for `content`, `text` and
    /// `final_output` string fields before being rendered as JSON text.
    Structured(Value),
    /// A payload with no textual rendering.
    Unreadable(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentInvocation {
    pub instructions: String,
    pub prompt: String,
}

impl AgentInvocation {
    pub fn new(instructions: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            instructions: instructions.into(),
            prompt: prompt.into(),
        }
    }
}

/// Runs an agent to completion for a single prompt.
#[async_trait]
pub trait AgentInvoker: Send + Sync {
    async fn invoke(&self, invocation: AgentInvocation) -> Result<AgentResponse, AgentError>;
}
