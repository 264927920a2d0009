use crate::application::agent::AgentError;
use serde_json::{Map, Value};

/// What one model reply asks the loop to do.
#[derive(Debug, PartialEq)]
pub(crate) enum Reply {
    Answer(String),
    UseTool { tool: String, input: Value },
}

/// Reads a model reply as an action.
///
/// Replies that are not JSON, or JSON without a string `action`, are the
/// answer verbatim (trimmed). A JSON string is unwrapped and read again.
pub(crate) fn read_reply(content: &str) -> Result<Reply, AgentError> {
    match find_json(content) {
        Some(Value::Object(map)) => read_action(&map, content),
        Some(Value::String(inner)) => read_reply(&inner),
        _ => Ok(verbatim(content)),
    }
}

fn read_action(map: &Map<String, Value>, raw: &str) -> Result<Reply, AgentError> {
    let Some(action) = map.get("action").and_then(Value::as_str) else {
        return Ok(verbatim(raw));
    };

    match action {
        "call_tool" => {
            let tool = map
                .get("tool")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .ok_or_else(|| {
                    AgentError::InvalidResponse("call_tool action missing tool field".into())
                })?;
            Ok(Reply::UseTool {
                tool: tool.to_string(),
                input: map.get("input").cloned().unwrap_or(Value::Null),
            })
        }
        "final" => match map.get("response") {
            None | Some(Value::Null) => Err(AgentError::InvalidResponse(
                "final action missing response field".into(),
            )),
            Some(Value::String(text)) => Ok(Reply::Answer(text.clone())),
            Some(structured) => Ok(Reply::Answer(structured.to_string())),
        },
        other => Err(AgentError::InvalidResponse(format!(
            "unknown action value: {other}"
        ))),
    }
}

fn verbatim(content: &str) -> Reply {
    Reply::Answer(content.trim().to_string())
}

/// Whole reply, then a fenced block, then the outermost braces.
fn find_json(content: &str) -> Option<Value> {
    let trimmed = content.trim();
    let braced = match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if start < end => Some(&trimmed[start..=end]),
        _ => None,
    };

    [Some(trimmed), fenced(trimmed), braced]
        .into_iter()
        .flatten()
        .find_map(|candidate| serde_json::from_str(candidate).ok())
}

fn fenced(text: &str) -> Option<&str> {
    let body = text.strip_prefix("```")?;
    let body = body
        .strip_prefix("json")
        .or_else(|| body.strip_prefix("JSON"))
        .unwrap_or(body);
    let end = body.rfind("```")?;
    Some(body[..end].trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fenced_tool_call_is_read() {
        let reply = read_reply(
            "```json\n{\"action\":\"call_tool\",\"tool\":\"web_search\",\"input\":{\"query\":\"x\"}}\n```",
        )
        .expect("valid action");

        assert_eq!(
            reply,
            Reply::UseTool {
                tool: "web_search".into(),
                input: json!({"query": "x"}),
            }
        );
    }

    #[test]
    fn malformed_actions_are_rejected() {
        for raw in [
            r#"{"action":"dance"}"#,
            r#"{"action":"call_tool"}"#,
            r#"{"action":"call_tool","tool":"  "}"#,
            r#"{"action":"final"}"#,
            r#"{"action":"final","response":null}"#,
        ] {
            assert!(
                matches!(read_reply(raw), Err(AgentError::InvalidResponse(_))),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn json_without_action_is_the_answer() {
        let raw = r#"Here: {"history": "h"} enjoy"#;
        assert_eq!(read_reply(raw).expect("answer"), Reply::Answer(raw.into()));
    }

    #[test]
    fn quoted_action_is_unwrapped() {
        let raw = json!(r#"{"action":"final","response":"done"}"#).to_string();
        assert_eq!(read_reply(&raw).expect("answer"), Reply::Answer("done".into()));
    }

    #[test]
    fn non_object_json_is_the_answer() {
        assert_eq!(read_reply(" [1, 2] ").expect("answer"), Reply::Answer("[1, 2]".into()));
    }
}
