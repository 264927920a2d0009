//! # HTTP Server
//!
//! axum router exposing the streaming `/query` endpoint, a status route and
//! Swagger UI.

pub mod docs;
pub mod dto;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;

pub use docs::ApiDoc;
pub use error::ServerError;
pub use state::ServerState;

use crate::application::scout::BaseballAgent;
use crate::config::HttpSettings;
use axum::Router;
use axum::http::{HeaderValue, Method};
use axum::routing::get;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{info, warn};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub fn build_router(agent: Arc<BaseballAgent>, cors_origins: &[String]) -> Result<Router, ServerError> {
    let state = Arc::new(ServerState::new(agent));
    let app = Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .route("/", get(routes::root_handler))
        .route("/query", get(routes::query_handler))
        .layer(cors_layer(cors_origins)?)
        .with_state(state);
    Ok(app)
}

/// `*` allows any origin; otherwise only the listed ones.
fn cors_layer(origins: &[String]) -> Result<CorsLayer, ServerError> {
    let allow_origin = if origins.iter().any(|origin| origin == "*") {
        AllowOrigin::from(Any)
    } else {
        let parsed = origins
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin).map_err(|_| ServerError::InvalidOrigin {
                    origin: origin.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        AllowOrigin::list(parsed)
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any))
}

pub async fn serve(agent: Arc<BaseballAgent>, settings: &HttpSettings) -> Result<(), ServerError> {
    let addr = settings.bind;
    let app = build_router(agent, &settings.cors_origins)?;
    info!(%addr, "Binding REST server");

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;
    info!(%addr, "REST server ready to accept connections");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServerError::Serve)
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received, draining connections"),
        Err(err) => {
            warn!(%err, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
