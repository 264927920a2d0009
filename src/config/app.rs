use super::error::ConfigError;
use super::server::ServerConfig;
use crate::constants::{
    DEFAULT_AGENT_NAME, DEFAULT_API_KEY_ENV, DEFAULT_BIND, DEFAULT_CORS_ORIGIN, DEFAULT_MAX_STEPS,
    DEFAULT_MODEL, DEFAULT_PROMPTS_DIR, DEFAULT_PROVIDER, DEFAULT_SEARCH_API_KEY_ENV,
    DEFAULT_SEARCH_ENDPOINT, DEFAULT_SEARCH_RESULTS,
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Application configuration loaded from scout.toml
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub server: HttpSettings,
    pub model: ModelSettings,
    pub agent: AgentSettings,
    pub web_search: WebSearchSettings,
    pub servers: Vec<ServerConfig>,
}

impl AppConfig {
    /// Load configuration from a file path (or default path if None)
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        super::loader::load_config(path)
    }
}

/// `[server]` section: HTTP listener settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSettings {
    pub bind: SocketAddr,
    pub cors_origins: Vec<String>,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8000)),
            cors_origins: vec![DEFAULT_CORS_ORIGIN.to_string()],
        }
    }
}

/// Raw `[server]` table before the bind address is parsed
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub(super) struct RawHttpSettings {
    pub bind: String,
    pub cors_origins: Vec<String>,
}

impl Default for RawHttpSettings {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            cors_origins: vec![DEFAULT_CORS_ORIGIN.to_string()],
        }
    }
}

impl TryFrom<RawHttpSettings> for HttpSettings {
    type Error = ConfigError;

    fn try_from(raw: RawHttpSettings) -> Result<Self, Self::Error> {
        let bind = raw
            .bind
            .trim()
            .parse::<SocketAddr>()
            .map_err(|err| ConfigError::invalid("server.bind", format!("{}: {err}", raw.bind)))?;
        let cors_origins: Vec<String> = raw
            .cors_origins
            .into_iter()
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();
        if cors_origins.is_empty() {
            return Err(ConfigError::invalid(
                "server.cors_origins",
                "at least one origin is required",
            ));
        }
        Ok(Self { bind, cors_origins })
    }
}

/// `[model]` section: chat model used by the agent
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    /// `openai` (any OpenAI-compatible API) or `ollama`
    pub provider: String,
    pub endpoint: Option<String>,
    pub api_path: Option<String>,
    pub model: String,
    /// Name of the environment variable holding the key
    pub api_key: Option<String>,
    /// Upper bound on tool calls per query
    pub max_steps: usize,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            provider: DEFAULT_PROVIDER.to_string(),
            endpoint: None,
            api_path: None,
            model: DEFAULT_MODEL.to_string(),
            api_key: Some(DEFAULT_API_KEY_ENV.to_string()),
            max_steps: DEFAULT_MAX_STEPS,
        }
    }
}

/// `[agent]` section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AgentSettings {
    pub name: String,
    pub prompts_dir: PathBuf,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            name: DEFAULT_AGENT_NAME.to_string(),
            prompts_dir: PathBuf::from(DEFAULT_PROMPTS_DIR),
        }
    }
}

/// `[web_search]` section: Brave-compatible search API
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WebSearchSettings {
    pub endpoint: String,
    /// Name of the environment variable holding the subscription token
    pub api_key: Option<String>,
    pub max_results: usize,
}

impl Default for WebSearchSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_SEARCH_ENDPOINT.to_string(),
            api_key: Some(DEFAULT_SEARCH_API_KEY_ENV.to_string()),
            max_results: DEFAULT_SEARCH_RESULTS,
        }
    }
}
