use super::super::dto::{QueryErrorChunk, QueryParams, ValidationErrorResponse};
use super::super::extract::PlayerQuery;
use super::super::state::ServerState;
use crate::application::scout::BaseballAgent;
use crate::domain::player::PlayerInfo;
use async_stream::stream;
use axum::body::Body;
use axum::extract::State;
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use std::convert::Infallible;
use std::sync::Arc;
use tracing::{error, info};

const PROGRESS_LINES: [&str; 5] = [
    "Searching for baseball player information...\n",
    "Querying web sources for player data...\n",
    "Gathering career statistics and biographical information...\n",
    "Analyzing recent performance and current status...\n",
    "Compiling comprehensive player profile...\n\n",
];

#[utoipa::path(
    get,
    path = "/query",
    tag = "query",
    params(QueryParams),
    responses(
        (status = 200, description = "Progress lines followed by the player record or an error object", body = PlayerInfo, content_type = "text/event-stream"),
        (status = 422, description = "Missing player_full_name", body = ValidationErrorResponse)
    )
)]
pub async fn query_handler(
    State(state): State<Arc<ServerState>>,
    PlayerQuery(player_name): PlayerQuery,
) -> Response {
    info!(player = %player_name, "Received /query request");
    let agent = state.agent();

    let chunks = stream! {
        yield Ok::<_, Infallible>(format!("Gathering information about {player_name}...\n\n"));
        for line in PROGRESS_LINES {
            yield Ok(line.to_string());
        }
        yield Ok(terminal_chunk(&agent, &player_name).await);
    };

    (
        [
            (CONTENT_TYPE, "text/event-stream"),
            (CACHE_CONTROL, "no-cache"),
        ],
        Body::from_stream(chunks),
    )
        .into_response()
}

/// Pretty-printed record, or the error object when the lookup fails.
async fn terminal_chunk(agent: &BaseballAgent, player_name: &str) -> String {
    let rendered = match agent.query_player(player_name).await {
        Ok(info) => serde_json::to_string_pretty(&info).map_err(|err| err.to_string()),
        Err(err) => Err(err.to_string()),
    };

    match rendered {
        Ok(body) => {
            info!(player = player_name, "Player lookup completed");
            body
        }
        Err(details) => {
            error!(player = player_name, %details, "Player lookup failed");
            let chunk = QueryErrorChunk::new(player_name, details);
            serde_json::to_string_pretty(&chunk).unwrap_or_default()
        }
    }
}
