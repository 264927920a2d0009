//! Read-only Supabase access through the official MCP server.

use crate::config::ServerConfig;
use crate::constants::{
    SUPABASE_ACCESS_TOKEN_ENV, SUPABASE_MCP_PACKAGE, SUPABASE_PROJECT_ID_ENV,
    SUPABASE_PROJECT_REF_ENV, SUPABASE_SERVER_NAME,
};
use std::env;
use tracing::info;

/// Server definition for the Supabase MCP bridge, or `None` unless both the
/// project reference and access token are present.
pub fn supabase_server(project_ref: Option<&str>, access_token: Option<&str>) -> Option<ServerConfig> {
    let project_ref = project_ref.map(str::trim).filter(|value| !value.is_empty())?;
    let access_token = access_token.map(str::trim).filter(|value| !value.is_empty())?;

    Some(
        ServerConfig::new(SUPABASE_SERVER_NAME, "npx")
            .with_args([
                "-y".to_string(),
                SUPABASE_MCP_PACKAGE.to_string(),
                "--read-only".to_string(),
                format!("--project-ref={project_ref}"),
            ])
            .with_env(SUPABASE_ACCESS_TOKEN_ENV, access_token),
    )
}

/// Reads `SUPABASE_PROJECT_REF` (or `SUPABASE_PROJECT_ID`) and
/// `SUPABASE_ACCESS_TOKEN` from the environment.
pub fn supabase_server_from_env() -> Option<ServerConfig> {
    let project_ref = env::var(SUPABASE_PROJECT_REF_ENV)
        .or_else(|_| env::var(SUPABASE_PROJECT_ID_ENV))
        .ok();
    let access_token = env::var(SUPABASE_ACCESS_TOKEN_ENV).ok();

    let server = supabase_server(project_ref.as_deref(), access_token.as_deref());
    match &server {
        Some(_) => info!("Supabase MCP server configured (read-only)"),
        None => info!("Supabase credentials not set, database tools disabled"),
    }
    server
}
