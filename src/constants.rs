//! Application constants
//!
//! Single source of truth for paths, defaults and other constants.

/// Default configuration file path
pub const CONFIG_PATH: &str = "config/scout.toml";

/// Environment files loaded before configuration is read
pub const ENV_PATHS: [&str; 2] = [".env", "config/.env"];

pub const DEFAULT_BIND: &str = "127.0.0.1:8000";
pub const DEFAULT_CORS_ORIGIN: &str = "*";

pub const DEFAULT_PROVIDER: &str = "openai";
pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_OPENAI_ENDPOINT: &str = "https://api.openai.com";
pub const DEFAULT_OLLAMA_ENDPOINT: &str = "http://127.0.0.1:11434";
/// Chat-completions route served by OpenAI-compatible backends and Ollama
pub const DEFAULT_CHAT_API_PATH: &str = "/v1/chat/completions";
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const DEFAULT_MAX_STEPS: usize = 8;

pub const DEFAULT_AGENT_NAME: &str = "Baseball Information Specialist";
pub const DEFAULT_PROMPTS_DIR: &str = "prompts";
pub const SYSTEM_PROMPT_FILE: &str = "system_prompt.txt";
pub const USER_PROMPT_FILE: &str = "user_prompt.txt";
pub const DEFAULT_INSTRUCTION: &str = "You are a helpful baseball information assistant.";

pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://api.search.brave.com/res/v1/web/search";
pub const DEFAULT_SEARCH_API_KEY_ENV: &str = "BRAVE_SEARCH_API_KEY";
pub const DEFAULT_SEARCH_RESULTS: usize = 5;

/// Seconds an MCP server gets to answer the handshake or a request
pub const DEFAULT_MCP_TIMEOUT_SECS: u64 = 30;

pub const SUPABASE_SERVER_NAME: &str = "supabase";
pub const SUPABASE_PROJECT_REF_ENV: &str = "SUPABASE_PROJECT_REF";
pub const SUPABASE_PROJECT_ID_ENV: &str = "SUPABASE_PROJECT_ID";
pub const SUPABASE_ACCESS_TOKEN_ENV: &str = "SUPABASE_ACCESS_TOKEN";
pub const SUPABASE_MCP_PACKAGE: &str = "@supabase/mcp-server-supabase@latest";

pub const API_TITLE: &str = "Baseball Backend API";
