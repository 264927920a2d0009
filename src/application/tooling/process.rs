use super::error::ToolCallError;
use super::interface::ServerToolInfo;
use super::rpc::{self, Inbound, METHOD_NOT_FOUND};
use crate::config::ServerConfig;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::io;
use std::process::Stdio;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::{Mutex, oneshot};
use tokio::time::timeout;
use tracing::{debug, info, warn};

type Responder = oneshot::Sender<Result<Value, ToolCallError>>;

/// One MCP server child process. Requests from concurrent agent runs are
/// multiplexed over its stdio by request id.
#[derive(Clone)]
pub struct McpProcess {
    inner: Arc<Connection>,
}

struct Connection {
    server: ServerConfig,
    startup: Mutex<()>,
    child: Mutex<Option<Child>>,
    writer: Mutex<Option<BufWriter<ChildStdin>>>,
    pending: Mutex<HashMap<String, Responder>>,
    next_id: AtomicU64,
    instructions: Mutex<Option<String>>,
    tools: Mutex<HashMap<String, ServerToolInfo>>,
}

impl McpProcess {
    pub fn new(server: ServerConfig) -> Self {
        Self {
            inner: Arc::new(Connection {
                server,
                startup: Mutex::new(()),
                child: Mutex::new(None),
                writer: Mutex::new(None),
                pending: Mutex::new(HashMap::new()),
                next_id: AtomicU64::new(1),
                instructions: Mutex::new(None),
                tools: Mutex::new(HashMap::new()),
            }),
        }
    }

    pub(super) async fn ensure_running(&self) -> Result<(), ToolCallError> {
        self.inner.ensure_running().await
    }

    pub(super) async fn call_tool(
        &self,
        tool: &str,
        arguments: Value,
    ) -> Result<Value, ToolCallError> {
        self.ensure_running().await?;
        let arguments = match arguments {
            Value::Null => json!({}),
            other => other,
        };
        self.inner
            .request("tools/call", json!({ "name": tool, "arguments": arguments }))
            .await
    }

    pub(super) async fn instructions(&self) -> Option<String> {
        self.inner.instructions.lock().await.clone()
    }

    /// Cached tool catalogue, sorted by name.
    pub(super) async fn tools(&self) -> Vec<ServerToolInfo> {
        let cache = self.inner.tools.lock().await;
        let mut tools: Vec<ServerToolInfo> = cache.values().cloned().collect();
        tools.sort_by(|a, b| a.name.cmp(&b.name));
        tools
    }
}

impl Connection {
    async fn ensure_running(self: &Arc<Self>) -> Result<(), ToolCallError> {
        // Held through the handshake so callers never see a half-started server.
        let _startup = self.startup.lock().await;
        if self.child.lock().await.is_some() {
            return Ok(());
        }

        let (child, stdout) = self.spawn().await?;
        *self.child.lock().await = Some(child);

        let reader = Arc::clone(self);
        tokio::spawn(async move { reader.read_loop(stdout).await });

        let handshake = match timeout(self.server.timeout, self.handshake()).await {
            Ok(result) => result,
            Err(_) => Err(self.timed_out("initialize")),
        };
        match handshake {
            Ok(()) => {
                info!(server = %self.server.name, "MCP server initialised");
                Ok(())
            }
            Err(err) => {
                warn!(server = %self.server.name, %err, "MCP server initialisation failed");
                self.shutdown().await;
                Err(err)
            }
        }
    }

    async fn spawn(&self) -> Result<(Child, ChildStdout), ToolCallError> {
        let mut command = Command::new(&self.server.command);
        command
            .args(&self.server.args)
            .envs(&self.server.env)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);
        if let Some(dir) = &self.server.workdir {
            command.current_dir(dir);
        }

        debug!(
            server = %self.server.name,
            command = %self.server.command.display(),
            "Spawning MCP server"
        );
        let mut child = command.spawn().map_err(|source| ToolCallError::Spawn {
            server: self.server.name.clone(),
            source,
        })?;

        let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
            return Err(self.io_error(io::Error::other("child stdio was not piped")));
        };
        *self.writer.lock().await = Some(BufWriter::new(stdin));

        Ok((child, stdout))
    }

    async fn handshake(&self) -> Result<(), ToolCallError> {
        let init = self.request("initialize", rpc::initialize_params()).await?;
        if let Some(text) = init.get("instructions").and_then(Value::as_str) {
            *self.instructions.lock().await = Some(text.to_string());
        }
        self.write(&rpc::notification("notifications/initialized", json!({})))
            .await?;
        self.refresh_tools().await
    }

    async fn refresh_tools(&self) -> Result<(), ToolCallError> {
        let listing = self.request("tools/list", json!({})).await?;
        let catalogue: HashMap<String, ServerToolInfo> = listing
            .get("tools")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(|entry| {
                let name = entry.get("name")?.as_str()?.to_string();
                let info = ServerToolInfo {
                    name: name.clone(),
                    description: entry
                        .get("description")
                        .and_then(Value::as_str)
                        .map(str::to_string),
                    input_schema: entry.get("inputSchema").cloned(),
                };
                Some((name, info))
            })
            .collect();

        debug!(server = %self.server.name, tools = catalogue.len(), "Tool catalogue refreshed");
        *self.tools.lock().await = catalogue;
        Ok(())
    }

    async fn read_loop(self: Arc<Self>, stdout: ChildStdout) {
        let mut lines = BufReader::new(stdout).lines();
        while let Ok(Some(raw)) = lines.next_line().await {
            let line = raw.trim();
            // Some servers log to stdout with ANSI colour codes.
            if line.is_empty() || line.starts_with('\u{1b}') {
                continue;
            }
            match serde_json::from_str::<Value>(line) {
                Ok(message) => self.dispatch(Inbound::classify(message)).await,
                Err(source) => warn!(
                    server = %self.server.name,
                    line,
                    %source,
                    "Received invalid JSON from MCP server"
                ),
            }
        }

        debug!(server = %self.server.name, "MCP server stdout closed");
        self.shutdown().await;
    }

    async fn dispatch(self: &Arc<Self>, inbound: Inbound) {
        let outcome = match inbound {
            Inbound::Response { key, outcome } => {
                self.resolve(key, outcome).await;
                Ok(())
            }
            Inbound::Request { id, method } if method == "ping" => {
                self.write(&rpc::result(id, json!({}))).await
            }
            Inbound::Request { id, method } => {
                warn!(server = %self.server.name, method, "Server sent unsupported request");
                let message = format!("client does not implement method '{method}'");
                self.write(&rpc::error(id, METHOD_NOT_FOUND, message)).await
            }
            Inbound::Notification { method } if method == "notifications/tools/list_changed" => {
                // The reply arrives on this loop, so refresh off it.
                let connection = Arc::clone(self);
                tokio::spawn(async move {
                    if let Err(err) = connection.refresh_tools().await {
                        warn!(server = %connection.server.name, %err, "Tool catalogue refresh failed");
                    }
                });
                Ok(())
            }
            Inbound::Notification { method } => {
                debug!(server = %self.server.name, method, "Ignoring server notification");
                Ok(())
            }
            Inbound::Ignored => Ok(()),
        };

        if let Err(err) = outcome {
            warn!(server = %self.server.name, %err, "Failed to handle message from MCP server");
        }
    }

    async fn resolve(&self, key: String, outcome: Result<Value, (i64, String)>) {
        let Some(responder) = self.pending.lock().await.remove(&key) else {
            debug!(server = %self.server.name, response_id = key, "Response for unknown request");
            return;
        };
        let result = outcome.map_err(|(code, message)| ToolCallError::Remote {
            server: self.server.name.clone(),
            code,
            message,
        });
        let _ = responder.send(result);
    }

    /// Sends one request and waits at most `server.timeout` for the reply.
    /// A server that misses the deadline is shut down.
    async fn request(&self, method: &str, params: Value) -> Result<Value, ToolCallError> {
        let id = format!("req-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        let (tx, rx) = oneshot::channel();
        self.pending.lock().await.insert(id.clone(), tx);

        if let Err(err) = self.write(&rpc::request(&id, method, params)).await {
            self.pending.lock().await.remove(&id);
            return Err(err);
        }

        match timeout(self.server.timeout, rx).await {
            Ok(Ok(reply)) => reply,
            Ok(Err(_)) => Err(ToolCallError::Exited {
                server: self.server.name.clone(),
            }),
            Err(_) => {
                self.pending.lock().await.remove(&id);
                warn!(
                    server = %self.server.name,
                    method,
                    timeout = ?self.server.timeout,
                    "MCP request timed out, stopping server"
                );
                self.shutdown().await;
                Err(self.timed_out(method))
            }
        }
    }

    async fn write(&self, message: &Value) -> Result<(), ToolCallError> {
        let mut encoded = serde_json::to_vec(message).map_err(|source| ToolCallError::Encode {
            server: self.server.name.clone(),
            source,
        })?;
        encoded.push(b'\n');

        let mut writer = self.writer.lock().await;
        let stream = writer.as_mut().ok_or_else(|| ToolCallError::Disconnected {
            server: self.server.name.clone(),
        })?;
        stream
            .write_all(&encoded)
            .await
            .map_err(|err| self.io_error(err))?;
        stream.flush().await.map_err(|err| self.io_error(err))
    }

    async fn shutdown(&self) {
        self.writer.lock().await.take();

        if let Some(mut child) = self.child.lock().await.take() {
            if let Err(err) = child.kill().await {
                debug!(server = %self.server.name, %err, "MCP server already exited");
            }
        }

        for (_, responder) in self.pending.lock().await.drain() {
            let _ = responder.send(Err(ToolCallError::Exited {
                server: self.server.name.clone(),
            }));
        }
        self.tools.lock().await.clear();
        self.instructions.lock().await.take();
    }

    fn timed_out(&self, method: &str) -> ToolCallError {
        ToolCallError::Timeout {
            server: self.server.name.clone(),
            method: method.to_string(),
            after: self.server.timeout,
        }
    }

    fn io_error(&self, source: io::Error) -> ToolCallError {
        ToolCallError::Io {
            server: self.server.name.clone(),
            source,
        }
    }
}
