use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "baseball-scout",
    version,
    about = "Baseball player lookup API backed by a tool-calling agent"
)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// HTTP bind address (overrides `server.bind`)
    #[arg(long)]
    pub addr: Option<SocketAddr>,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,
}
