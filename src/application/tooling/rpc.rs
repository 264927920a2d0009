//! JSON-RPC 2.0 framing for the MCP stdio transport.

use serde_json::{Value, json};

pub(super) const PROTOCOL_VERSION: &str = "2025-06-18";

const FALLBACK_ERROR_CODE: i64 = -32000;
pub(super) const METHOD_NOT_FOUND: i64 = -32601;

/// A decoded line from the server, classified by shape.
#[derive(Debug, PartialEq)]
pub(super) enum Inbound {
    Response {
        key: String,
        outcome: Result<Value, (i64, String)>,
    },
    Request {
        id: Value,
        method: String,
    },
    Notification {
        method: String,
    },
    Ignored,
}

impl Inbound {
    pub fn classify(message: Value) -> Self {
        let method = message
            .get("method")
            .and_then(Value::as_str)
            .map(str::to_string);

        match (message.get("id").cloned(), method) {
            (Some(id), Some(method)) => Inbound::Request { id, method },
            (None, Some(method)) => Inbound::Notification { method },
            (Some(id), None) => match response_key(&id) {
                Some(key) => Inbound::Response {
                    key,
                    outcome: response_outcome(message),
                },
                None => Inbound::Ignored,
            },
            (None, None) => Inbound::Ignored,
        }
    }
}

fn response_outcome(mut message: Value) -> Result<Value, (i64, String)> {
    if let Some(error) = message.get("error") {
        let code = error
            .get("code")
            .and_then(Value::as_i64)
            .unwrap_or(FALLBACK_ERROR_CODE);
        let text = error
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown error")
            .to_string();
        return Err((code, text));
    }
    Ok(message
        .get_mut("result")
        .map(Value::take)
        .unwrap_or(Value::Null))
}

/// Pending-request key for a response id; only string and number ids are used.
pub(super) fn response_key(id: &Value) -> Option<String> {
    match id {
        Value::String(value) => Some(value.clone()),
        Value::Number(num) => Some(num.to_string()),
        _ => None,
    }
}

pub(super) fn request(id: &str, method: &str, params: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": method,
        "params": params
    })
}

pub(super) fn notification(method: &str, params: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "method": method,
        "params": params
    })
}

pub(super) fn result(id: Value, result: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": result
    })
}

pub(super) fn error(id: Value, code: i64, message: impl Into<String>) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": { "code": code, "message": message.into() }
    })
}

pub(super) fn initialize_params() -> Value {
    json!({
        "protocolVersion": PROTOCOL_VERSION,
        "clientInfo": {
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "title": "Baseball Scout"
        },
        "capabilities": {}
    })
}
