//! `web_search` tool backed by a Brave-compatible search API.

use super::error::ToolCallError;
use super::interface::LocalTool;
use crate::config::{WebSearchSettings, secret_from_env};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, info};

pub const WEB_SEARCH_TOOL: &str = "web_search";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    web: Option<WebResults>,
}

#[derive(Deserialize)]
struct WebResults {
    #[serde(default)]
    results: Vec<SearchHit>,
}

pub struct WebSearchTool {
    http: Client,
    endpoint: String,
    api_key: Option<String>,
    max_results: usize,
}

impl WebSearchTool {
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>, max_results: usize) -> Self {
        Self {
            http: Client::new(),
            endpoint: endpoint.into(),
            api_key,
            max_results: max_results.max(1),
        }
    }

    pub fn from_settings(settings: &WebSearchSettings) -> Self {
        let api_key = secret_from_env(WEB_SEARCH_TOOL, settings.api_key.as_deref());
        Self::new(settings.endpoint.clone(), api_key, settings.max_results)
    }

    pub async fn search(&self, query: &str, count: usize) -> Result<Vec<SearchHit>, ToolCallError> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ToolCallError::local(WEB_SEARCH_TOOL, "search API key is not configured"))?;

        debug!(query, count, "Running web search");
        let count = count.to_string();
        let response: SearchResponse = self
            .http
            .get(&self.endpoint)
            .query(&[("q", query), ("count", count.as_str())])
            .header("Accept", "application/json")
            .header("X-Subscription-Token", api_key)
            .send()
            .await
            .map_err(|err| ToolCallError::local(WEB_SEARCH_TOOL, err.to_string()))?
            .error_for_status()
            .map_err(|err| ToolCallError::local(WEB_SEARCH_TOOL, err.to_string()))?
            .json()
            .await
            .map_err(|err| ToolCallError::local(WEB_SEARCH_TOOL, err.to_string()))?;

        let hits = response.web.map(|web| web.results).unwrap_or_default();
        info!(query, results = hits.len(), "Web search completed");
        Ok(hits)
    }

    fn requested_count(&self, arguments: &Value) -> usize {
        arguments
            .get("count")
            .and_then(Value::as_u64)
            .map(|count| usize::try_from(count).unwrap_or(usize::MAX))
            .unwrap_or(self.max_results)
            .clamp(1, self.max_results)
    }
}

#[async_trait]
impl LocalTool for WebSearchTool {
    fn name(&self) -> &str {
        WEB_SEARCH_TOOL
    }

    fn description(&self) -> &str {
        "Search the web for current information. Returns title, url and snippet for each hit."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": { "type": "string", "description": "Search terms" },
                "count": { "type": "integer", "minimum": 1, "maximum": self.max_results }
            },
            "required": ["query"]
        })
    }

    async fn call(&self, arguments: Value) -> Result<Value, ToolCallError> {
        let query = match &arguments {
            Value::String(text) => text.trim(),
            other => other.get("query").and_then(Value::as_str).unwrap_or("").trim(),
        };
        if query.is_empty() {
            return Err(ToolCallError::local(
                WEB_SEARCH_TOOL,
                "missing required 'query' argument",
            ));
        }

        let hits = self.search(query, self.requested_count(&arguments)).await?;
        Ok(render_hits(query, &hits))
    }
}

/// Formats hits as an MCP-style tool result.
fn render_hits(query: &str, hits: &[SearchHit]) -> Value {
    let text = if hits.is_empty() {
        format!("No results found for \"{query}\".")
    } else {
        hits.iter()
            .enumerate()
            .map(|(index, hit)| {
                format!("{}. {}\n{}\n{}", index + 1, hit.title, hit.url, hit.description)
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    };

    json!({
        "content": [{ "type": "text", "text": text }],
        "structuredContent": { "query": query, "results": hits },
        "isError": false
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tool(api_key: Option<&str>) -> WebSearchTool {
        WebSearchTool::new("http://127.0.0.1:9/search", api_key.map(String::from), 5)
    }

    #[tokio::test]
    async fn missing_key_is_a_tool_failure() {
        let err = tool(None)
            .call(json!({"query": "Shohei Ohtani"}))
            .await
            .expect_err("no key configured");
        assert!(matches!(err, ToolCallError::Local { ref tool, .. } if tool == WEB_SEARCH_TOOL));
        assert!(err.to_string().contains("API key"));
    }

    #[tokio::test]
    async fn missing_query_is_rejected_before_any_request() {
        let err = tool(Some("token"))
            .call(json!({"count": 3}))
            .await
            .expect_err("query required");
        assert!(err.to_string().contains("query"));
    }

    #[test]
    fn count_is_clamped_to_configured_maximum() {
        let search = tool(Some("token"));
        assert_eq!(search.requested_count(&json!({"count": 50})), 5);
        assert_eq!(search.requested_count(&json!({"count": 0})), 1);
        assert_eq!(search.requested_count(&json!({})), 5);
    }

    #[test]
    fn decodes_brave_payload() {
        let payload = json!({
            "web": {
                "results": [
                    {"title": "Shohei Ohtani Stats", "url": "https://example.com/ohtani", "description": "54 HR"},
                    {"title": "No snippet", "url": "https://example.com/other"}
                ]
            }
        });

        let response: SearchResponse = serde_json::from_value(payload).expect("decode");
        let hits = response.web.expect("web section").results;
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[1].description, "");
    }

    #[test]
    fn renders_numbered_text_block() {
        let hits = vec![SearchHit {
            title: "Ohtani".into(),
            url: "https://example.com".into(),
            description: "Dodgers DH".into(),
        }];

        let rendered = render_hits("ohtani", &hits);

        assert_eq!(rendered["isError"], json!(false));
        assert_eq!(
            rendered["content"][0]["text"],
            json!("1. Ohtani\nhttps://example.com\nDodgers DH")
        );
        assert_eq!(rendered["structuredContent"]["results"][0]["url"], "https://example.com");
        assert_eq!(
            render_hits("nobody", &[])["content"][0]["text"],
            json!("No results found for \"nobody\".")
        );
    }
}
