use super::errors::AgentError;
use super::invoker::{AgentInvocation, AgentInvoker, AgentResponse};
use super::runtime::{
    AgentStep, Reply, TOOL_RESULT_INSTRUCTION, ToolRuntime, opening_request, read_reply,
    system_prompt,
};
use crate::domain::types::ChatMessage;
use crate::infrastructure::model::ChatModel;
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Tool-calling agent over a chat model.
pub struct ToolAgent {
    model: Arc<dyn ChatModel>,
    runtime: ToolRuntime,
    max_steps: usize,
}

#[derive(Debug, Clone)]
pub struct AgentOutcome {
    pub response: String,
    pub steps: Vec<AgentStep>,
}

impl ToolAgent {
    pub fn new(model: Arc<dyn ChatModel>, runtime: ToolRuntime, max_steps: usize) -> Self {
        Self {
            model,
            runtime,
            max_steps,
        }
    }

    pub async fn run(&self, instructions: &str, prompt: String) -> Result<AgentOutcome, AgentError> {
        info!(model = self.model.label(), "Agent run started");

        let catalogue = self.runtime.build_catalogue().await;
        let mut conversation = vec![
            ChatMessage::system(system_prompt(instructions, &catalogue)),
            ChatMessage::user(opening_request(prompt, &catalogue)),
        ];
        let mut steps: Vec<AgentStep> = Vec::new();

        loop {
            debug!(
                turn = steps.len() + 1,
                messages = conversation.len(),
                "Submitting agent turn to model"
            );
            let text = self.model.reply(&conversation).await?;
            let reply = read_reply(&text)?;
            conversation.push(ChatMessage::assistant(text));

            let (tool, input) = match reply {
                Reply::Answer(response) => {
                    info!(steps = steps.len(), "Agent returned final response");
                    return Ok(AgentOutcome { response, steps });
                }
                Reply::UseTool { tool, input } => (tool, input),
            };

            if steps.len() >= self.max_steps {
                warn!(max_steps = self.max_steps, "Agent exceeded max tool interactions");
                return Err(AgentError::StepLimit {
                    max_steps: self.max_steps,
                });
            }

            info!(tool = %tool, "Agent requested tool execution");
            let step = self.runtime.execute(&tool, input, &catalogue).await;
            conversation.push(ChatMessage::user(
                json!({
                    "tool_result": &step,
                    "instruction": TOOL_RESULT_INSTRUCTION,
                })
                .to_string(),
            ));
            steps.push(step);
        }
    }
}

#[async_trait]
impl AgentInvoker for ToolAgent {
    async fn invoke(&self, invocation: AgentInvocation) -> Result<AgentResponse, AgentError> {
        let outcome = self
            .run(&invocation.instructions, invocation.prompt)
            .await?;

        let trace: Vec<String> = outcome
            .steps
            .iter()
            .map(|step| format!("{}:{}", step.tool, if step.success { "ok" } else { "failed" }))
            .collect();
        info!(steps = outcome.steps.len(), trace = ?trace, "Agent run finished");

        Ok(AgentResponse::FinalOutput(outcome.response))
    }
}
