//! # Scout
//!
//! The baseball-facing façade: renders the prompt for a player, runs the
//! agent and turns whatever comes back into a [`PlayerInfo`].

mod database;
mod prompts;

pub use database::{supabase_server, supabase_server_from_env};
pub use prompts::{PLAYER_NAME_PLACEHOLDER, PromptError, PromptSet, render};

use crate::application::agent::{AgentError, AgentInvocation, AgentInvoker, ToolAgent, ToolRuntime};
use crate::application::parser::parse_agent_response;
use crate::application::tooling::{LocalTool, ServerManager, WebSearchTool};
use crate::config::AppConfig;
use crate::domain::player::PlayerInfo;
use crate::infrastructure::model::ChatClient;
use std::sync::Arc;
use tracing::{info, warn};

pub struct BaseballAgent {
    name: String,
    prompts: PromptSet,
    invoker: Arc<dyn AgentInvoker>,
}

impl BaseballAgent {
    pub fn new(name: impl Into<String>, prompts: PromptSet, invoker: Arc<dyn AgentInvoker>) -> Self {
        Self {
            name: name.into(),
            prompts,
            invoker,
        }
    }

    /// Runs one lookup. Only agent failures surface as errors; any answer at
    /// all is coerced into a record.
    pub async fn query_player(&self, player_name: &str) -> Result<PlayerInfo, AgentError> {
        info!(agent = %self.name, player = player_name, "Querying agent for player");
        let invocation = AgentInvocation::new(
            self.prompts.instructions.clone(),
            self.prompts.user_prompt(player_name),
        );
        let response = self.invoker.invoke(invocation).await?;
        Ok(parse_agent_response(&response, player_name))
    }
}

/// Wires the production agent: configured model, `web_search`, and every MCP
/// server from the config plus Supabase when its credentials are present.
pub fn build_agent(config: &AppConfig) -> Result<BaseballAgent, PromptError> {
    let prompts = PromptSet::load(&config.agent.prompts_dir)?;
    let model = Arc::new(ChatClient::from_settings(&config.model));

    let mut servers = config.servers.clone();
    if let Some(supabase) = supabase_server_from_env() {
        if servers.iter().any(|server| server.name == supabase.name) {
            warn!(server = %supabase.name, "Configured server shadows the Supabase bridge");
        } else {
            servers.push(supabase);
        }
    }
    let server_count = servers.len();

    let local: Vec<Arc<dyn LocalTool>> =
        vec![Arc::new(WebSearchTool::from_settings(&config.web_search))];
    let runtime = ToolRuntime::new(local, Arc::new(ServerManager::new(servers)));
    let agent = ToolAgent::new(model, runtime, config.model.max_steps);

    info!(
        agent = %config.agent.name,
        mcp_servers = server_count,
        "Baseball agent ready"
    );
    Ok(BaseballAgent::new(
        config.agent.name.clone(),
        prompts,
        Arc::new(agent),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::agent::AgentResponse;
    use async_trait::async_trait;
    use serde_json::json;
    use tokio::sync::Mutex;

    struct RecordingInvoker {
        reply: Result<AgentResponse, String>,
        seen: Mutex<Vec<AgentInvocation>>,
    }

    #[async_trait]
    impl AgentInvoker for RecordingInvoker {
        async fn invoke(&self, invocation: AgentInvocation) -> Result<AgentResponse, AgentError> {
            self.seen.lock().await.push(invocation);
            self.reply.clone().map_err(AgentError::InvalidResponse)
        }
    }

    fn agent_with(reply: Result<AgentResponse, String>) -> (BaseballAgent, Arc<RecordingInvoker>) {
        let invoker = Arc::new(RecordingInvoker {
            reply,
            seen: Mutex::new(Vec::new()),
        });
        let prompts = PromptSet {
            instructions: "You are a scout.".into(),
            user_template: "Profile {player_name} as {{...}}".into(),
        };
        (
            BaseballAgent::new("Scout", prompts, invoker.clone()),
            invoker,
        )
    }

    #[tokio::test]
    async fn renders_prompts_and_parses_reply() {
        let reply = AgentResponse::FinalOutput(
            json!({
                "history": "Two-way star.",
                "simple_information": {"team": "LAD"},
                "statistics": {},
                "games": []
            })
            .to_string(),
        );
        let (agent, invoker) = agent_with(Ok(reply));

        let info = agent.query_player("Shohei Ohtani").await.expect("lookup");

        assert_eq!(info.history, "Two-way star.");
        assert_eq!(info.basic_information["team"], "LAD");
        let seen = invoker.seen.lock().await;
        assert_eq!(
            seen[0],
            AgentInvocation::new("You are a scout.", "Profile Shohei Ohtani as {...}")
        );
    }

    #[tokio::test]
    async fn agent_failures_propagate() {
        let (agent, _) = agent_with(Err("model offline".into()));

        let err = agent.query_player("Nobody").await.expect_err("fails");

        assert!(err.to_string().contains("model offline"));
    }
}
