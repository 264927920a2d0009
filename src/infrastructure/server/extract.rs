use super::dto::ValidationRejection;
use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use serde::Deserialize;
use tracing::warn;

pub const PLAYER_PARAM: &str = "player_full_name";

#[derive(Deserialize)]
struct RawPlayerQuery {
    player_full_name: Option<String>,
}

/// `?player_full_name=` extractor; missing or unparseable query strings are
/// rejected with 422 before the handler runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerQuery(pub String);

impl<S> FromRequestParts<S> for PlayerQuery
where
    S: Send + Sync,
{
    type Rejection = ValidationRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(raw) = Query::<RawPlayerQuery>::try_from_uri(&parts.uri).map_err(|err| {
            warn!(%err, "Rejecting malformed query string");
            ValidationRejection::malformed(err.body_text())
        })?;

        match raw.player_full_name {
            Some(name) => Ok(PlayerQuery(name)),
            None => {
                warn!(param = PLAYER_PARAM, "Rejecting request without required parameter");
                Err(ValidationRejection::missing(PLAYER_PARAM))
            }
        }
    }
}
