mod catalogue;
mod execution;
mod instructions;
mod reply;

use std::sync::Arc;

pub(crate) use catalogue::ToolCatalogue;
pub use execution::AgentStep;
pub(crate) use instructions::{TOOL_RESULT_INSTRUCTION, opening_request, system_prompt};
pub(crate) use reply::{Reply, read_reply};

use crate::application::tooling::{LocalTool, ToolServerInterface};

/// Tools available to the agent: in-process tools plus whatever the MCP
/// servers behind `bridge` expose.
pub struct ToolRuntime {
    local: Vec<Arc<dyn LocalTool>>,
    bridge: Arc<dyn ToolServerInterface>,
}

impl ToolRuntime {
    pub fn new(local: Vec<Arc<dyn LocalTool>>, bridge: Arc<dyn ToolServerInterface>) -> Self {
        Self { local, bridge }
    }

    fn local_tool(&self, name: &str) -> Option<&dyn LocalTool> {
        self.local
            .iter()
            .map(|tool| tool.as_ref())
            .find(|tool| tool.name().eq_ignore_ascii_case(name))
    }
}
