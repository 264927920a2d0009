use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RootResponse {
    pub message: String,
    pub version: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct QueryParams {
    /// Full name of the player to look up
    pub player_full_name: String,
}

/// Terminal stream chunk sent when the lookup fails.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct QueryErrorChunk {
    pub error: bool,
    pub message: String,
    pub details: String,
    pub player_name: String,
}

impl QueryErrorChunk {
    pub fn new(player_name: &str, details: impl Into<String>) -> Self {
        Self {
            error: true,
            message: format!("Failed to retrieve information for {player_name}"),
            details: details.into(),
            player_name: player_name.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ValidationDetail {
    #[serde(rename = "type")]
    pub kind: String,
    pub loc: Vec<String>,
    pub msg: String,
    #[schema(value_type = Object)]
    pub input: Value,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ValidationErrorResponse {
    pub detail: Vec<ValidationDetail>,
}

/// 422 rejection for malformed query strings.
#[derive(Debug)]
pub struct ValidationRejection {
    detail: ValidationDetail,
}

impl ValidationRejection {
    pub fn missing(field: &str) -> Self {
        Self {
            detail: ValidationDetail {
                kind: "missing".to_string(),
                loc: vec!["query".to_string(), field.to_string()],
                msg: "Field required".to_string(),
                input: Value::Null,
            },
        }
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        Self {
            detail: ValidationDetail {
                kind: "query_parse".to_string(),
                loc: vec!["query".to_string()],
                msg: reason.into(),
                input: Value::Null,
            },
        }
    }
}

impl IntoResponse for ValidationRejection {
    fn into_response(self) -> Response {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ValidationErrorResponse {
                detail: vec![self.detail],
            }),
        )
            .into_response()
    }
}
