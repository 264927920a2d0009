pub mod app;
pub mod error;
pub mod loader;
pub mod server;

pub use crate::constants::CONFIG_PATH;
pub use app::{AgentSettings, AppConfig, HttpSettings, ModelSettings, WebSearchSettings};
pub use error::ConfigError;
pub use loader::{ensure_env_loaded, secret_from_env};
pub use server::ServerConfig;
