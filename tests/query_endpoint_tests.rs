// /query endpoint tests - router driven end to end with a stub agent

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use baseball_scout::agent::{AgentError, AgentInvocation, AgentInvoker, AgentResponse};
use baseball_scout::scout::{BaseballAgent, PromptSet};
use baseball_scout::server::build_router;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

const PROGRESS: [&str; 5] = [
    "Searching for baseball player information...\n",
    "Querying web sources for player data...\n",
    "Gathering career statistics and biographical information...\n",
    "Analyzing recent performance and current status...\n",
    "Compiling comprehensive player profile...\n\n",
];

struct StubInvoker {
    reply: Result<String, String>,
    prompts: Mutex<Vec<String>>,
}

#[async_trait]
impl AgentInvoker for StubInvoker {
    async fn invoke(&self, invocation: AgentInvocation) -> Result<AgentResponse, AgentError> {
        self.prompts
            .lock()
            .expect("prompt log")
            .push(invocation.prompt);
        match &self.reply {
            Ok(text) => Ok(AgentResponse::FinalOutput(text.clone())),
            Err(reason) => Err(AgentError::InvalidResponse(reason.clone())),
        }
    }
}

fn router_with(reply: Result<String, String>) -> (axum::Router, Arc<StubInvoker>) {
    let invoker = Arc::new(StubInvoker {
        reply,
        prompts: Mutex::new(Vec::new()),
    });
    let prompts = PromptSet {
        instructions: "You are a scout.".to_string(),
        user_template: "Look up {player_name}.".to_string(),
    };
    let agent = Arc::new(BaseballAgent::new("Scout", prompts, invoker.clone()));
    let router = build_router(agent, &["*".to_string()]).expect("router builds");
    (router, invoker)
}

async fn get(router: axum::Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, String) {
    let response = router
        .oneshot(Request::get(uri).body(Body::empty()).expect("request"))
        .await
        .expect("response");
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    (status, headers, String::from_utf8(bytes.to_vec()).expect("utf-8 body"))
}

fn terminal_json(body: &str, player: &str) -> Value {
    let mut expected_prefix = format!("Gathering information about {player}...\n\n");
    for line in PROGRESS {
        expected_prefix.push_str(line);
    }
    let payload = body
        .strip_prefix(&expected_prefix)
        .expect("progress lines precede the payload");
    serde_json::from_str(payload).expect("terminal chunk is JSON")
}

#[tokio::test]
async fn streams_progress_then_player_record() {
    let reply = r#"Here is what I found:
{"history": "Two-way star.", "simple_information": {"team": "LAD", "position": "DH"}, "statistics": {"home_runs": 54}, "games": [{"date": "2024-09-19", "result": "W"}]}
Let me know if you need more."#;
    let (router, invoker) = router_with(Ok(reply.to_string()));

    let (status, headers, body) = get(router, "/query?player_full_name=Shohei%20Ohtani").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "text/event-stream");
    assert_eq!(headers[header::CACHE_CONTROL], "no-cache");

    let record = terminal_json(&body, "Shohei Ohtani");
    assert_eq!(record["simple_information"]["team"], "LAD");
    assert_eq!(record["history"], "Two-way star.");
    assert_eq!(record["statistics"]["home_runs"], 54);
    assert_eq!(record["games"][0]["result"], "W");
    assert!(body.contains("{\n  \"history\""), "record is pretty-printed");

    let prompts = invoker.prompts.lock().expect("prompt log");
    assert_eq!(prompts.as_slice(), ["Look up Shohei Ohtani."]);
}

#[tokio::test]
async fn prose_answer_becomes_history() {
    let (router, _) = router_with(Ok("A veteran outfielder with a strong arm.".to_string()));

    let (status, _, body) = get(router, "/query?player_full_name=Mookie%20Betts").await;

    assert_eq!(status, StatusCode::OK);
    let record = terminal_json(&body, "Mookie Betts");
    assert_eq!(record["history"], "A veteran outfielder with a strong arm.");
    assert_eq!(record["simple_information"], json!({"note": "Parsed from text response"}));
    assert_eq!(record["statistics"], json!({}));
    assert_eq!(record["games"], json!([]));
}

#[tokio::test]
async fn agent_failure_yields_error_chunk() {
    let (router, _) = router_with(Err("model offline".to_string()));

    let (status, _, body) = get(router, "/query?player_full_name=Aaron%20Judge").await;

    assert_eq!(status, StatusCode::OK);
    let chunk = terminal_json(&body, "Aaron Judge");
    assert_eq!(chunk["error"], true);
    assert_eq!(chunk["player_name"], "Aaron Judge");
    assert_eq!(chunk["message"], "Failed to retrieve information for Aaron Judge");
    assert!(
        chunk["details"]
            .as_str()
            .is_some_and(|details| details.contains("model offline"))
    );
}

#[tokio::test]
async fn missing_player_parameter_is_unprocessable() {
    let (router, invoker) = router_with(Ok("{}".to_string()));

    let (status, _, body) = get(router, "/query").await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let detail: Value = serde_json::from_str(&body).expect("JSON body");
    assert_eq!(detail["detail"][0]["loc"], json!(["query", "player_full_name"]));
    assert_eq!(detail["detail"][0]["type"], "missing");
    assert!(invoker.prompts.lock().expect("prompt log").is_empty());
}

#[tokio::test]
async fn root_reports_status_and_version() {
    let (router, _) = router_with(Ok("{}".to_string()));

    let (status, _, body) = get(router, "/").await;

    assert_eq!(status, StatusCode::OK);
    let value: Value = serde_json::from_str(&body).expect("JSON body");
    assert_eq!(value["message"], "Baseball Backend API is running");
    assert_eq!(value["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn openapi_document_lists_query_route() {
    let (router, _) = router_with(Ok("{}".to_string()));

    let (status, _, body) = get(router, "/api-doc/openapi.json").await;

    assert_eq!(status, StatusCode::OK);
    let doc: Value = serde_json::from_str(&body).expect("JSON body");
    assert!(doc["paths"]["/query"]["get"].is_object());
}
