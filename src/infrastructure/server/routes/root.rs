use super::super::dto::RootResponse;
use crate::constants::API_TITLE;
use axum::Json;

#[utoipa::path(
    get,
    path = "/",
    tag = "status",
    responses((status = 200, description = "Service is up", body = RootResponse))
)]
pub async fn root_handler() -> Json<RootResponse> {
    Json(RootResponse {
        message: format!("{API_TITLE} is running"),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
