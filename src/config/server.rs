use serde::Deserialize;
use std::collections::HashMap;
use crate::constants::DEFAULT_MCP_TIMEOUT_SECS;
use std::path::PathBuf;
use std::time::Duration;

/// An MCP server launched as a child process and spoken to over stdio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub name: String,
    pub command: PathBuf,
    pub args: Vec<String>,
    pub env: HashMap<String, String>,
    pub workdir: Option<PathBuf>,
    /// Bound on the handshake and on every request to this server
    pub timeout: Duration,
}

impl ServerConfig {
    pub fn new(name: impl Into<String>, command: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            command: command.into(),
            args: Vec::new(),
            env: HashMap::new(),
            workdir: None,
            timeout: Duration::from_secs(DEFAULT_MCP_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawServer {
    name: String,
    command: String,
    #[serde(default)]
    args: Vec<String>,
    #[serde(default)]
    env: HashMap<String, String>,
    workdir: Option<String>,
    timeout_secs: Option<u64>,
}

impl From<RawServer> for ServerConfig {
    fn from(raw: RawServer) -> Self {
        let expand = |s: &str| -> String {
            shellexpand::full(s)
                .map(|cow| cow.into_owned())
                .unwrap_or_else(|_| s.to_string())
        };

        let command = PathBuf::from(expand(&raw.command));
        let workdir = raw.workdir.map(|d| PathBuf::from(expand(&d)));
        let args = raw.args.into_iter().map(|arg| expand(&arg)).collect();
        let env = raw
            .env
            .into_iter()
            .map(|(key, value)| {
                let value = expand(&value);
                (key, value)
            })
            .collect();

        Self {
            name: raw.name,
            command,
            args,
            env,
            workdir,
            timeout: Duration::from_secs(raw.timeout_secs.unwrap_or(DEFAULT_MCP_TIMEOUT_SECS)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    #[test]
    #[serial]
    fn expands_env_vars_in_command_args_and_env() {
        unsafe {
            env::set_var("SCOUT_TEST_MCP_ROOT", "/opt/mcp");
            env::set_var("SCOUT_TEST_TOKEN", "secret-token");
        }

        let raw = RawServer {
            name: "stats".to_string(),
            command: "${SCOUT_TEST_MCP_ROOT}/server".to_string(),
            args: vec!["--token", "${SCOUT_TEST_TOKEN}"]
                .into_iter()
                .map(String::from)
                .collect(),
            env: HashMap::from([(
                "ACCESS_TOKEN".to_string(),
                "${SCOUT_TEST_TOKEN}".to_string(),
            )]),
            workdir: Some("${SCOUT_TEST_MCP_ROOT}/work".to_string()),
            timeout_secs: Some(5),
        };

        let config = ServerConfig::from(raw);

        assert_eq!(config.command, PathBuf::from("/opt/mcp/server"));
        assert_eq!(config.args, vec!["--token", "secret-token"]);
        assert_eq!(
            config.env.get("ACCESS_TOKEN").map(String::as_str),
            Some("secret-token")
        );
        assert_eq!(config.workdir, Some(PathBuf::from("/opt/mcp/work")));
        assert_eq!(config.timeout, Duration::from_secs(5));

        unsafe {
            env::remove_var("SCOUT_TEST_MCP_ROOT");
            env::remove_var("SCOUT_TEST_TOKEN");
        }
    }

    #[test]
    fn unknown_variables_are_left_verbatim() {
        let raw = RawServer {
            name: "raw".to_string(),
            command: "${SCOUT_TEST_SURELY_UNSET_VAR}/bin".to_string(),
            args: Vec::new(),
            env: HashMap::new(),
            workdir: None,
            timeout_secs: None,
        };

        let config = ServerConfig::from(raw);
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_MCP_TIMEOUT_SECS));
        assert_eq!(
            config.command,
            PathBuf::from("${SCOUT_TEST_SURELY_UNSET_VAR}/bin")
        );
    }

    #[test]
    fn builder_collects_args_and_env() {
        let config = ServerConfig::new("db", "npx")
            .with_args(["-y", "pkg"])
            .with_env("TOKEN", "t");

        assert_eq!(config.args, vec!["-y", "pkg"]);
        assert_eq!(config.env.get("TOKEN").map(String::as_str), Some("t"));
        assert!(config.workdir.is_none());
    }
}
