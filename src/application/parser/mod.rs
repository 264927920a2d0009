//! # Response Parser
//!
//! Turns whatever the agent answered into a [`PlayerInfo`] record. Never fails
//! outward; each tier degrades into the next:
//!
//! 1. text extraction from the payload
//! 2. strict JSON (outermost `{...}` slice)
//! 3. labelled sections (`history:`, `simple_information:`, ...)
//! 4. raw text as history
//!
//! Anything that goes wrong before a record is produced yields a failure
//! record naming the player.

mod sections;

use crate::application::agent::AgentResponse;
use crate::domain::player::{JsonMap, PlayerInfo};
use sections::Sections;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::{debug, info, warn};

const RAW_HISTORY_LIMIT: usize = 1000;
const RAW_TEXT_NOTE: &str = "Parsed from text response";
const PREVIEW_LIMIT: usize = 500;

#[derive(Debug, Error)]
enum ParseError {
    #[error("agent response could not be read as text: {0}")]
    Unreadable(String),
    #[error("agent response field '{0}' is null")]
    NullField(&'static str),
}

type Extractor = fn(&AgentResponse) -> Option<Result<String, ParseError>>;

/// Probed in order; the first that is present wins.
const EXTRACTORS: [(&str, Extractor); 4] = [
    ("content", content_field),
    ("text", text_field),
    ("final_output", final_output_field),
    ("rendering", rendered),
];

pub fn parse_agent_response(response: &AgentResponse, player_name: &str) -> PlayerInfo {
    match try_parse(response, player_name) {
        Ok(info) => info,
        Err(err) => {
            warn!(player = player_name, %err, "Error parsing agent response");
            unavailable(player_name, &err.to_string())
        }
    }
}

fn try_parse(response: &AgentResponse, player_name: &str) -> Result<PlayerInfo, ParseError> {
    let content = extract_text(response)?;
    info!(
        player = player_name,
        preview = preview(&content),
        "Agent response content"
    );

    let content = content.trim();
    if let Some(info) = strict_json(content, player_name) {
        return Ok(info);
    }

    warn!(
        player = player_name,
        "Agent response was not valid JSON, attempting text parsing"
    );
    Ok(parse_text_response(content))
}

fn extract_text(response: &AgentResponse) -> Result<String, ParseError> {
    for (name, extractor) in EXTRACTORS {
        if let Some(text) = extractor(response) {
            debug!(extractor = name, "Extracted agent response text");
            return text;
        }
    }
    match response {
        AgentResponse::Unreadable(reason) => Err(ParseError::Unreadable(reason.clone())),
        _ => Err(ParseError::Unreadable("no text extractor matched".to_string())),
    }
}

fn content_field(response: &AgentResponse) -> Option<Result<String, ParseError>> {
    match response {
        AgentResponse::Content(text) => Some(Ok(text.clone())),
        AgentResponse::Structured(value) => field_text(value, "content"),
        _ => None,
    }
}

fn text_field(response: &AgentResponse) -> Option<Result<String, ParseError>> {
    match response {
        AgentResponse::Text(text) => Some(Ok(text.clone())),
        AgentResponse::Structured(value) => field_text(value, "text"),
        _ => None,
    }
}

fn final_output_field(response: &AgentResponse) -> Option<Result<String, ParseError>> {
    match response {
        AgentResponse::FinalOutput(text) => Some(Ok(text.clone())),
        AgentResponse::Structured(value) => field_text(value, "final_output"),
        _ => None,
    }
}

fn rendered(response: &AgentResponse) -> Option<Result<String, ParseError>> {
    match response {
        AgentResponse::Structured(Value::String(text)) => Some(Ok(text.clone())),
        AgentResponse::Structured(value) => Some(Ok(value.to_string())),
        _ => None,
    }
}

/// A present field is used even when it is not a string: strings as-is,
/// other values as JSON text. A null field cannot be read.
fn field_text(value: &Value, field: &'static str) -> Option<Result<String, ParseError>> {
    match value.get(field)? {
        Value::Null => Some(Err(ParseError::NullField(field))),
        Value::String(text) => Some(Ok(text.clone())),
        other => Some(Ok(other.to_string())),
    }
}

/// Decodes the slice between the first `{` and the last `}`.
fn strict_json(content: &str, player_name: &str) -> Option<PlayerInfo> {
    let start = content.find('{')?;
    let end = content.rfind('}')?;
    if start >= end {
        return None;
    }

    match serde_json::from_str::<Value>(&content[start..=end]) {
        Ok(Value::Object(fields)) => Some(PlayerInfo::from_fields(
            &fields,
            format!("Information for {player_name}"),
        )),
        Ok(_) => Some(unparseable(player_name)),
        Err(err) => {
            debug!(%err, "Strict JSON decode failed");
            None
        }
    }
}

fn parse_text_response(content: &str) -> PlayerInfo {
    let sections = Sections::extract(content);
    if sections.is_empty() {
        debug!("No labelled sections found, using raw text");
        return raw_text(content);
    }
    sections.into_player_info()
}

fn raw_text(content: &str) -> PlayerInfo {
    let mut history: String = content.chars().take(RAW_HISTORY_LIMIT).collect();
    if content.chars().nth(RAW_HISTORY_LIMIT).is_some() {
        history.push_str("...");
    }
    PlayerInfo::new(history, note(RAW_TEXT_NOTE), JsonMap::new(), Vec::new())
}

fn unavailable(player_name: &str, detail: &str) -> PlayerInfo {
    PlayerInfo::new(
        format!("Unable to retrieve information for {player_name}. Error: {detail}"),
        full_name(player_name),
        JsonMap::new(),
        Vec::new(),
    )
}

fn unparseable(player_name: &str) -> PlayerInfo {
    PlayerInfo::new(
        format!("Unable to parse response for {player_name}"),
        full_name(player_name),
        JsonMap::new(),
        Vec::new(),
    )
}

fn full_name(player_name: &str) -> JsonMap {
    let mut map = JsonMap::new();
    map.insert("full_name".to_string(), json!(player_name));
    map
}

fn note(text: &str) -> JsonMap {
    let mut map = JsonMap::new();
    map.insert("note".to_string(), json!(text));
    map
}

fn preview(content: &str) -> String {
    let mut preview: String = content.chars().take(PREVIEW_LIMIT).collect();
    preview.push_str("...");
    preview
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAYER: &str = "Shohei Ohtani";

    fn parse_content(text: &str) -> PlayerInfo {
        parse_agent_response(&AgentResponse::Content(text.to_string()), PLAYER)
    }

    #[test]
    fn decodes_json_wrapped_in_prose() {
        let info = parse_content(
            r#"Here you go: {"history": "Two-way star", "simple_information": {"team": "LAD"}, "statistics": {"hr": 54}, "games": []} Thanks!"#,
        );

        assert_eq!(info.history, "Two-way star");
        assert_eq!(info.basic_information.get("team"), Some(&json!("LAD")));
        assert_eq!(info.statistics.get("hr"), Some(&json!(54)));
        assert!(info.games.is_empty());
    }

    #[test]
    fn json_without_history_gets_placeholder() {
        let info = parse_content(r#"{"simple_information": {"team": "LAD"}}"#);
        assert_eq!(info.history, "Information for Shohei Ohtani");
        assert!(info.statistics.is_empty());
    }

    #[test]
    fn falls_back_to_sections_when_json_is_broken() {
        let info = parse_content(
            "history: Joined the Dodgers in 2024 {unterminated\nsimple_information: {\"team\": \"LAD\"}\n",
        );

        assert_eq!(info.history, "Joined the Dodgers in 2024 {unterminated");
        assert_eq!(info.basic_information.get("team"), Some(&json!("LAD")));
    }

    #[test]
    fn broken_statistics_section_keeps_history() {
        let info = parse_content("history: Great player\nstatistics: {invalid json}");
        let value = serde_json::to_value(&info).expect("serialize");

        assert_eq!(
            value,
            json!({
                "history": "Great player",
                "simple_information": {},
                "statistics": {"note": "Failed to parse statistics JSON"},
                "games": []
            })
        );
    }

    #[test]
    fn unlabelled_prose_becomes_history() {
        let info = parse_content("  Ohtani hit 54 home runs in 2024.  ");

        assert_eq!(info.history, "Ohtani hit 54 home runs in 2024.");
        assert_eq!(info.basic_information.get("note"), Some(&json!(RAW_TEXT_NOTE)));
        assert!(info.statistics.is_empty());
        assert!(info.games.is_empty());
    }

    #[test]
    fn long_prose_is_truncated() {
        let text = "a".repeat(1500);
        let info = parse_content(&text);

        assert_eq!(info.history.chars().count(), RAW_HISTORY_LIMIT + 3);
        assert!(info.history.ends_with("..."));
    }

    #[test]
    fn prose_at_the_limit_is_not_marked() {
        let text = "b".repeat(RAW_HISTORY_LIMIT);
        let info = parse_content(&text);
        assert_eq!(info.history, text);
    }

    #[test]
    fn structured_payload_is_probed_in_order() {
        let payload = AgentResponse::Structured(json!({
            "text": "ignored",
            "content": r#"{"history": "from content"}"#
        }));

        let info = parse_agent_response(&payload, PLAYER);
        assert_eq!(info.history, "from content");
    }

    #[test]
    fn structured_payload_without_known_fields_is_rendered() {
        let payload = AgentResponse::Structured(json!({
            "history": "rendered",
            "statistics": {"avg": 0.31}
        }));

        let info = parse_agent_response(&payload, PLAYER);
        assert_eq!(info.history, "rendered");
        assert_eq!(info.statistics.get("avg"), Some(&json!(0.31)));
    }

    #[test]
    fn non_string_field_is_used_before_later_fields() {
        let payload = AgentResponse::Structured(json!({
            "content": {"history": "from object content"},
            "text": r#"{"history": "from text"}"#
        }));

        let info = parse_agent_response(&payload, PLAYER);
        assert_eq!(info.history, "from object content");
    }

    #[test]
    fn null_field_yields_failure_record() {
        let payload = AgentResponse::Structured(json!({
            "content": null,
            "text": "never reached"
        }));

        let info = parse_agent_response(&payload, PLAYER);
        assert!(info.history.starts_with("Unable to retrieve information for Shohei Ohtani."));
        assert!(info.history.contains("'content' is null"));
    }

    #[test]
    fn final_output_payload_is_read() {
        let payload = AgentResponse::FinalOutput(r#"{"history": "final"}"#.to_string());
        assert_eq!(parse_agent_response(&payload, PLAYER).history, "final");
    }

    #[test]
    fn unreadable_payload_yields_failure_record() {
        let payload = AgentResponse::Unreadable("binary blob".to_string());

        let info = parse_agent_response(&payload, PLAYER);

        assert!(
            info.history
                .starts_with("Unable to retrieve information for Shohei Ohtani. Error: ")
        );
        assert!(info.history.contains("binary blob"));
        assert_eq!(info.basic_information.get("full_name"), Some(&json!(PLAYER)));
        assert!(info.statistics.is_empty());
        assert!(info.games.is_empty());
    }

    #[test]
    fn failure_record_is_fully_populated() {
        let info = unparseable(PLAYER);
        let value = serde_json::to_value(&info).expect("serialize");

        assert_eq!(value["history"], json!("Unable to parse response for Shohei Ohtani"));
        assert_eq!(value["simple_information"], json!({"full_name": PLAYER}));
        assert_eq!(value["statistics"], json!({}));
        assert_eq!(value["games"], json!([]));
    }
}
