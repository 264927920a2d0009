use super::ToolRuntime;
use crate::application::tooling::{LocalTool, ServerToolInfo};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

/// Tools offered to the model for one run. Serialized into the opening
/// request and returned by `list_tools`.
#[derive(Debug, Clone, Default, Serialize)]
pub(crate) struct ToolCatalogue {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<CatalogueEntry>,
    #[serde(rename = "servers", skip_serializing_if = "Vec::is_empty")]
    pub guidance: Vec<ServerGuidance>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct CatalogueEntry {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Hosting MCP server; absent for in-process tools.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_schema: Option<Value>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ServerGuidance {
    pub name: String,
    pub instruction: String,
}

impl CatalogueEntry {
    fn local(tool: &dyn LocalTool) -> Self {
        Self {
            name: tool.name().to_string(),
            description: Some(tool.description().to_string()),
            server: None,
            input_schema: Some(tool.input_schema()),
        }
    }

    fn hosted(server: &str, info: ServerToolInfo) -> Self {
        Self {
            name: info.name,
            description: info.description,
            server: Some(server.to_string()),
            input_schema: info.input_schema,
        }
    }
}

impl ToolCatalogue {
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty() && self.guidance.is_empty()
    }

    /// Case-insensitive lookup.
    pub fn find(&self, name: &str) -> Option<&CatalogueEntry> {
        self.tools
            .iter()
            .find(|entry| entry.name.eq_ignore_ascii_case(name))
    }

    /// First registration of a name wins.
    fn add(&mut self, entry: CatalogueEntry) -> bool {
        if self.find(&entry.name).is_some() {
            return false;
        }
        self.tools.push(entry);
        true
    }
}

impl ToolRuntime {
    /// Local tools first, then each reachable server's tools. A server that
    /// fails to start or list its tools is left out of this run.
    pub(crate) async fn build_catalogue(&self) -> ToolCatalogue {
        let mut catalogue = ToolCatalogue::default();
        for tool in &self.local {
            catalogue.add(CatalogueEntry::local(tool.as_ref()));
        }

        for server in self.bridge.server_names() {
            let hosted = match self.bridge.list_tools(&server).await {
                Ok(hosted) => hosted,
                Err(err) => {
                    warn!(server = %server, %err, "MCP server unavailable, skipping its tools");
                    continue;
                }
            };

            if let Some(instruction) = self.bridge.server_instructions(&server).await {
                catalogue.guidance.push(ServerGuidance {
                    name: server.clone(),
                    instruction,
                });
            }
            for info in hosted {
                let name = info.name.clone();
                if !catalogue.add(CatalogueEntry::hosted(&server, info)) {
                    warn!(server = %server, tool = %name, "Duplicate tool name ignored");
                }
            }
        }

        debug!(
            tools = catalogue.tools.len(),
            servers = catalogue.guidance.len(),
            "Tool catalogue built"
        );
        catalogue
    }
}
