use crate::infrastructure::model::ModelError;
use thiserror::Error;

/// Errors that end an agent run. Tool failures never do; they are reported
/// back to the model as unsuccessful steps.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("invalid agent response: {0}")]
    InvalidResponse(String),
    #[error("agent exceeded the maximum of {max_steps} tool calls")]
    StepLimit { max_steps: usize },
}
