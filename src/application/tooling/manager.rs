use super::error::ToolCallError;
use super::interface::{ServerToolInfo, ToolServerInterface};
use super::process::McpProcess;
use crate::config::ServerConfig;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Registry of MCP server processes, started lazily on first use and shared
/// by every agent run.
pub struct ServerManager {
    configs: HashMap<String, ServerConfig>,
    instances: Mutex<HashMap<String, Arc<McpProcess>>>,
}

impl ServerManager {
    pub fn new(configs: Vec<ServerConfig>) -> Self {
        let configs = configs
            .into_iter()
            .map(|cfg| (cfg.name.clone(), cfg))
            .collect();
        Self {
            configs,
            instances: Mutex::new(HashMap::new()),
        }
    }

    async fn ensure_process(&self, server: &str) -> Result<Arc<McpProcess>, ToolCallError> {
        if server.is_empty() {
            return Err(ToolCallError::UnknownServer {
                server: server.to_string(),
            });
        }

        let process = {
            let mut instances = self.instances.lock().await;
            if let Some(existing) = instances.get(server) {
                existing.clone()
            } else {
                let config = self.configs.get(server).cloned().ok_or_else(|| {
                    ToolCallError::UnknownServer {
                        server: server.to_string(),
                    }
                })?;
                debug!(server, "Registering MCP server process");
                let process = Arc::new(McpProcess::new(config));
                instances.insert(server.to_string(), process.clone());
                process
            }
        };

        process.ensure_running().await?;
        Ok(process)
    }
}

#[async_trait]
impl ToolServerInterface for ServerManager {
    fn server_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.configs.keys().cloned().collect();
        names.sort();
        names
    }

    async fn invoke_tool(
        &self,
        server: &str,
        tool: &str,
        arguments: Value,
    ) -> Result<Value, ToolCallError> {
        let process = self.ensure_process(server).await?;
        process.call_tool(tool, arguments).await
    }

    async fn server_instructions(&self, server: &str) -> Option<String> {
        match self.ensure_process(server).await {
            Ok(process) => process.instructions().await,
            Err(err) => {
                warn!(server, %err, "Failed to fetch server instructions");
                None
            }
        }
    }

    async fn list_tools(&self, server: &str) -> Result<Vec<ServerToolInfo>, ToolCallError> {
        let process = self.ensure_process(server).await?;
        Ok(process.tools().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::{Duration, Instant};

    #[tokio::test]
    async fn unknown_server_is_not_configured() {
        let manager = ServerManager::new(vec![ServerConfig::new("stats", "stats-mcp")]);

        let err = manager
            .invoke_tool("missing", "lookup", json!({}))
            .await
            .expect_err("unknown server");
        assert!(matches!(err, ToolCallError::UnknownServer { server } if server == "missing"));

        assert!(manager.server_instructions("").await.is_none());
        assert_eq!(manager.server_names(), vec!["stats".to_string()]);
    }

    #[tokio::test]
    async fn spawn_failure_is_reported() {
        let manager = ServerManager::new(vec![ServerConfig::new(
            "broken",
            "/nonexistent/scout-test-mcp-binary",
        )]);

        let err = manager.list_tools("broken").await.expect_err("spawn fails");
        assert!(matches!(err, ToolCallError::Spawn { server, .. } if server == "broken"));
    }

    #[tokio::test]
    async fn silent_server_times_out_and_is_stopped() {
        let manager = ServerManager::new(vec![
            ServerConfig::new("silent", "sleep")
                .with_args(["30"])
                .with_timeout(Duration::from_millis(200)),
        ]);

        let started = Instant::now();
        let err = manager.list_tools("silent").await.expect_err("no handshake reply");

        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(matches!(
            err,
            ToolCallError::Timeout { ref server, ref method, .. }
                if server == "silent" && method == "initialize"
        ));
        assert!(manager.server_instructions("silent").await.is_none());
    }
}
