pub mod application;
pub mod cli;
pub mod config;
pub mod constants;
pub mod domain;
pub mod infrastructure;

pub use application::{agent, parser, scout, tooling};
pub use cli::Cli;
pub use config::AppConfig;
pub use domain::player::PlayerInfo;
pub use infrastructure::{model, server};

use constants::API_TITLE;
use std::error::Error;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt};

pub async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    init_tracing(cli.log_json);
    info!("{API_TITLE} startup");

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(addr) = cli.addr {
        config.server.bind = addr;
    }
    debug!(
        provider = %config.model.provider,
        model = %config.model.model,
        bind = %config.server.bind,
        "Configuration loaded"
    );

    let agent = Arc::new(scout::build_agent(&config)?);
    server::serve(agent, &config.server).await?;

    info!("{API_TITLE} shutdown");
    Ok(())
}

fn init_tracing(json: bool) {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let builder = fmt().with_env_filter(filter).with_target(false).with_level(true);
        if json {
            builder.json().init();
        } else {
            builder.init();
        }
    });
}
