use async_trait::async_trait;
use serde_json::Value;

use super::error::ToolCallError;

#[derive(Debug, Clone, PartialEq)]
pub struct ServerToolInfo {
    pub name: String,
    pub description: Option<String>,
    pub input_schema: Option<Value>,
}

/// Access to tools hosted by external MCP servers.
#[async_trait]
pub trait ToolServerInterface: Send + Sync {
    /// Names of every server this bridge can reach.
    fn server_names(&self) -> Vec<String>;

    async fn invoke_tool(
        &self,
        server: &str,
        tool: &str,
        arguments: Value,
    ) -> Result<Value, ToolCallError>;

    async fn server_instructions(&self, server: &str) -> Option<String>;

    async fn list_tools(&self, server: &str) -> Result<Vec<ServerToolInfo>, ToolCallError>;
}

/// Tool implemented in-process rather than behind an MCP server.
///
/// Results use the MCP `tools/call` result shape (`content` blocks plus
/// `isError`) so both kinds are reported to the model the same way.
#[async_trait]
pub trait LocalTool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn input_schema(&self) -> Value;

    async fn call(&self, arguments: Value) -> Result<Value, ToolCallError>;
}
