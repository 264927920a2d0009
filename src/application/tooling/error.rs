use std::io;
use std::time::Duration;
use thiserror::Error;

/// Failure reaching a tool, whether in-process or behind an MCP server.
#[derive(Debug, Error)]
pub enum ToolCallError {
    #[error("no MCP server named '{server}'")]
    UnknownServer { server: String },
    #[error("could not start MCP server '{server}': {source}")]
    Spawn {
        server: String,
        #[source]
        source: io::Error,
    },
    #[error("stdio with MCP server '{server}' failed: {source}")]
    Io {
        server: String,
        #[source]
        source: io::Error,
    },
    #[error("MCP server '{server}' is not connected")]
    Disconnected { server: String },
    #[error("could not encode message for MCP server '{server}': {source}")]
    Encode {
        server: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("MCP server '{server}' answered with error {code}: {message}")]
    Remote {
        server: String,
        code: i64,
        message: String,
    },
    #[error("MCP server '{server}' did not answer '{method}' within {after:?}")]
    Timeout {
        server: String,
        method: String,
        after: Duration,
    },
    #[error("MCP server '{server}' exited")]
    Exited { server: String },
    #[error("tool '{tool}' failed: {message}")]
    Local { tool: String, message: String },
}

impl ToolCallError {
    pub fn local(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Local {
            tool: tool.into(),
            message: message.into(),
        }
    }
}
