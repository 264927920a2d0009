use super::{ToolCatalogue, ToolRuntime};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

pub(crate) const LIST_TOOLS: &str = "list_tools";

/// One tool call made during a run, fed back to the model verbatim.
#[derive(Debug, Clone, Serialize)]
pub struct AgentStep {
    pub tool: String,
    pub input: Value,
    pub success: bool,
    pub output: Value,
    pub message: Option<String>,
}

impl AgentStep {
    fn failed(tool: &str, input: Value, message: String) -> Self {
        Self {
            tool: tool.to_string(),
            input,
            success: false,
            output: Value::Null,
            message: Some(message),
        }
    }
}

impl ToolRuntime {
    /// Runs the requested tool. Every failure becomes an unsuccessful step.
    pub(crate) async fn execute(
        &self,
        requested: &str,
        input: Value,
        catalogue: &ToolCatalogue,
    ) -> AgentStep {
        if requested.eq_ignore_ascii_case(LIST_TOOLS) {
            debug!("Agent requested tool catalogue via list_tools");
            return AgentStep {
                tool: LIST_TOOLS.to_string(),
                input,
                success: true,
                output: serde_json::to_value(catalogue).unwrap_or(Value::Null),
                message: Some(format!("{} tools available.", catalogue.tools.len())),
            };
        }

        let Some(entry) = catalogue.find(requested) else {
            warn!(requested_tool = requested, "Unknown tool requested by agent");
            return AgentStep::failed(requested, input, format!("unknown tool requested: {requested}"));
        };
        let arguments = match &input {
            Value::Null => Value::Object(Map::new()),
            other => other.clone(),
        };

        let result = match (entry.server.as_deref(), self.local_tool(&entry.name)) {
            (Some(server), _) => {
                debug!(tool = %entry.name, server, "Dispatching tool via MCP");
                self.bridge.invoke_tool(server, &entry.name, arguments).await
            }
            (None, Some(tool)) => {
                debug!(tool = %entry.name, "Running local tool");
                tool.call(arguments).await
            }
            (None, None) => {
                let message = format!("unknown tool requested: {}", entry.name);
                return AgentStep::failed(&entry.name, input, message);
            }
        };

        match result {
            Ok(output) => {
                let success = !output
                    .get("isError")
                    .and_then(Value::as_bool)
                    .unwrap_or(false);
                info!(tool = %entry.name, success, "Tool executed");
                AgentStep {
                    tool: entry.name.clone(),
                    input,
                    success,
                    message: summary(&output),
                    output,
                }
            }
            Err(err) => {
                warn!(tool = %entry.name, %err, "Tool call failed, reporting back to model");
                let message = format!("failed to execute tool '{}': {err}", entry.name);
                AgentStep::failed(&entry.name, input, message)
            }
        }
    }
}

/// First non-blank text block of an MCP result, else its structured error.
fn summary(result: &Value) -> Option<String> {
    if let Some(blocks) = result.get("content").and_then(Value::as_array) {
        for block in blocks {
            let is_text = block
                .get("type")
                .and_then(Value::as_str)
                .is_some_and(|kind| kind.eq_ignore_ascii_case("text"));
            let text = block
                .get("text")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|text| is_text && !text.is_empty());
            if let Some(text) = text {
                return Some(text.to_string());
            }
        }
    }

    result
        .pointer("/structuredContent/error/message")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|message| !message.is_empty())
        .map(str::to_string)
}
