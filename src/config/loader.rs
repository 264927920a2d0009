use super::app::{AgentSettings, AppConfig, HttpSettings, ModelSettings, RawHttpSettings, WebSearchSettings};
use super::error::ConfigError;
use super::server::{RawServer, ServerConfig};
use crate::constants::{CONFIG_PATH, ENV_PATHS};
use dotenvy::from_filename;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Once;
use tracing::{debug, info, warn};

static ENV_LOADER: Once = Once::new();

/// Upper bound accepted by Brave-compatible search APIs
const MAX_SEARCH_RESULTS: usize = 20;

/// Raw configuration structure for deserialization from TOML
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub(super) struct RawConfig {
    pub server: RawHttpSettings,
    pub model: ModelSettings,
    pub agent: AgentSettings,
    pub web_search: WebSearchSettings,
    pub servers: Vec<RawServer>,
}

/// Ensures environment variables are loaded from `.env` and `config/.env`
pub fn ensure_env_loaded() {
    ENV_LOADER.call_once(|| {
        for path in ENV_PATHS {
            if from_filename(path).is_ok() {
                debug!(path, "Loaded environment file");
            }
        }
    });
}

/// Reads the secret named by `env_var`, loading `.env` files first.
/// Returns `None` when no variable is named or it is unset or blank.
pub fn secret_from_env(purpose: &str, env_var: Option<&str>) -> Option<String> {
    let name = env_var.map(str::trim).filter(|name| !name.is_empty())?;
    ensure_env_loaded();
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Some(value),
        _ => {
            warn!(purpose, env_var = name, "Secret environment variable is not set");
            None
        }
    }
}

/// Load and validate configuration.
///
/// An explicit path must exist; the default path may be absent, in which case
/// built-in defaults are used.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    ensure_env_loaded();
    match path {
        Some(path) => read_config(path),
        None => match read_config(Path::new(CONFIG_PATH)) {
            Err(ConfigError::NotFound { path }) => {
                info!(path = %path.display(), "No configuration file found, using defaults");
                validate_and_build(RawConfig::default())
            }
            other => other,
        },
    }
}

fn read_config(path: &Path) -> Result<AppConfig, ConfigError> {
    debug!(path = %path.display(), "Reading configuration file");

    let content = fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            ConfigError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    parse_config(&content).map_err(|err| match err {
        ParseFailure::Toml(source) => ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        },
        ParseFailure::Config(err) => err,
    })
}

enum ParseFailure {
    Toml(toml::de::Error),
    Config(ConfigError),
}

fn parse_config(content: &str) -> Result<AppConfig, ParseFailure> {
    let parsed: RawConfig = toml::from_str(content).map_err(ParseFailure::Toml)?;
    validate_and_build(parsed).map_err(ParseFailure::Config)
}

fn validate_and_build(parsed: RawConfig) -> Result<AppConfig, ConfigError> {
    let server = HttpSettings::try_from(parsed.server)?;

    if parsed.model.max_steps == 0 {
        return Err(ConfigError::invalid("model.max_steps", "must be at least 1"));
    }
    if parsed.model.model.trim().is_empty() {
        return Err(ConfigError::invalid("model.model", "must not be empty"));
    }
    if !(1..=MAX_SEARCH_RESULTS).contains(&parsed.web_search.max_results) {
        return Err(ConfigError::invalid(
            "web_search.max_results",
            format!("must be between 1 and {MAX_SEARCH_RESULTS}"),
        ));
    }

    let mut names = HashSet::new();
    let mut servers = Vec::with_capacity(parsed.servers.len());
    for raw in parsed.servers {
        let server = ServerConfig::from(raw);
        if server.timeout.is_zero() {
            return Err(ConfigError::invalid("servers.timeout_secs", "must be at least 1"));
        }
        if !names.insert(server.name.clone()) {
            return Err(ConfigError::DuplicateServer { name: server.name });
        }
        servers.push(server);
    }

    Ok(AppConfig {
        server,
        model: parsed.model,
        agent: parsed.agent,
        web_search: parsed.web_search,
        servers,
    })
}
