//! Player information record
//!
//! The fixed-shape document produced for every `/query` request. Whatever the
//! upstream agent returned, the four fields are always present with the right
//! container kind: text, object, object and a list of objects.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;
use utoipa::ToSchema;

pub type JsonMap = Map<String, Value>;

pub const HISTORY_KEY: &str = "history";
pub const BASIC_INFORMATION_KEY: &str = "simple_information";
pub const STATISTICS_KEY: &str = "statistics";
pub const GAMES_KEY: &str = "games";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PlayerInfo {
    /// Narrative of the player's career.
    pub history: String,
    /// Basic details such as team or position.
    #[serde(rename = "simple_information", default)]
    #[schema(value_type = Object)]
    pub basic_information: JsonMap,
    /// Key statistics keyed by statistic name.
    #[serde(default)]
    #[schema(value_type = Object)]
    pub statistics: JsonMap,
    /// Recent or notable games.
    #[serde(default)]
    #[schema(value_type = Vec<Object>)]
    pub games: Vec<JsonMap>,
}

impl PlayerInfo {
    pub fn new(
        history: impl Into<String>,
        basic_information: JsonMap,
        statistics: JsonMap,
        games: Vec<JsonMap>,
    ) -> Self {
        Self {
            history: history.into(),
            basic_information,
            statistics,
            games,
        }
    }

    /// Builds a record from a decoded JSON object.
    ///
    /// Missing or null fields fall back to their defaults; `default_history`
    /// is used when no usable history is present. Fields of the wrong kind
    /// are coerced rather than rejected.
    pub fn from_fields(fields: &JsonMap, default_history: impl Into<String>) -> Self {
        let history = fields
            .get(HISTORY_KEY)
            .and_then(coerce_text)
            .unwrap_or_else(|| default_history.into());

        Self {
            history,
            basic_information: coerce_object(fields.get(BASIC_INFORMATION_KEY), BASIC_INFORMATION_KEY),
            statistics: coerce_object(fields.get(STATISTICS_KEY), STATISTICS_KEY),
            games: coerce_records(fields.get(GAMES_KEY)),
        }
    }
}

fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        Value::Bool(_) | Value::Number(_) => Some(value.to_string()),
        Value::Array(_) | Value::Object(_) => serde_json::to_string(value).ok(),
    }
}

fn coerce_object(value: Option<&Value>, field: &str) -> JsonMap {
    match value {
        None | Some(Value::Null) => JsonMap::new(),
        Some(Value::Object(map)) => map.clone(),
        Some(other) => {
            warn!(field, kind = kind_of(other), "Expected JSON object; using empty default");
            JsonMap::new()
        }
    }
}

/// Keeps the object entries of a games list; anything else is dropped.
pub(crate) fn coerce_records(value: Option<&Value>) -> Vec<JsonMap> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => {
            let records: Vec<JsonMap> = items
                .iter()
                .filter_map(|item| item.as_object().cloned())
                .collect();
            if records.len() != items.len() {
                warn!(
                    kept = records.len(),
                    dropped = items.len() - records.len(),
                    "Dropped non-object entries from games list"
                );
            }
            records
        }
        Some(other) => {
            warn!(field = GAMES_KEY, kind = kind_of(other), "Expected JSON array; using empty default");
            Vec::new()
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> JsonMap {
        value.as_object().cloned().expect("object literal")
    }

    #[test]
    fn serializes_keys_in_canonical_order() {
        let info = PlayerInfo::new(
            "Two-way star",
            object(json!({"team": "LAD"})),
            JsonMap::new(),
            Vec::new(),
        );

        let rendered = serde_json::to_string(&info).expect("serialize");
        assert_eq!(
            rendered,
            r#"{"history":"Two-way star","simple_information":{"team":"LAD"},"statistics":{},"games":[]}"#
        );
    }

    #[test]
    fn missing_fields_take_defaults() {
        let info = PlayerInfo::from_fields(&object(json!({"statistics": {"hr": 54}})), "Information for X");

        assert_eq!(info.history, "Information for X");
        assert!(info.basic_information.is_empty());
        assert_eq!(info.statistics.get("hr"), Some(&json!(54)));
        assert!(info.games.is_empty());
    }

    #[test]
    fn null_fields_never_survive() {
        let info = PlayerInfo::from_fields(
            &object(json!({
                "history": null,
                "simple_information": null,
                "statistics": null,
                "games": null
            })),
            "placeholder",
        );

        assert_eq!(info.history, "placeholder");
        let value = serde_json::to_value(&info).expect("serialize");
        assert_eq!(value["simple_information"], json!({}));
        assert_eq!(value["statistics"], json!({}));
        assert_eq!(value["games"], json!([]));
    }

    #[test]
    fn wrong_kinds_are_coerced() {
        let info = PlayerInfo::from_fields(
            &object(json!({
                "history": 42,
                "simple_information": "LAD",
                "statistics": [1, 2],
                "games": [{"opponent": "SF"}, "bad", 3]
            })),
            "unused",
        );

        assert_eq!(info.history, "42");
        assert!(info.basic_information.is_empty());
        assert!(info.statistics.is_empty());
        assert_eq!(info.games, vec![object(json!({"opponent": "SF"}))]);
    }

    #[test]
    fn preserves_upstream_key_order() {
        let info = PlayerInfo::from_fields(
            &object(json!({"simple_information": {"zeta": 1, "alpha": 2}})),
            "h",
        );
        let keys: Vec<_> = info.basic_information.keys().cloned().collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }
}
