use super::dto::{QueryErrorChunk, RootResponse, ValidationDetail, ValidationErrorResponse};
use super::routes;
use crate::domain::player::PlayerInfo;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(title = "Baseball Backend API", description = "Baseball player information lookup"),
    paths(routes::root::root_handler, routes::query::query_handler),
    components(schemas(
        PlayerInfo,
        QueryErrorChunk,
        RootResponse,
        ValidationDetail,
        ValidationErrorResponse
    )),
    tags(
        (name = "query", description = "Streaming player lookup"),
        (name = "status", description = "Service status")
    )
)]
pub struct ApiDoc;
