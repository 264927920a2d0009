//! Labelled-section extraction for free-form agent answers.
//!
//! Recognises `history:`, `simple_information:`, `statistics:` and `games:`
//! labels anywhere in the text (case-insensitive). Each section is located
//! independently; spans are enumerated explicitly instead of relying on
//! lookahead.

use crate::domain::player::{JsonMap, PlayerInfo, coerce_records};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Value, json};
use tracing::debug;

static HISTORY_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)history:").expect("invalid history label regex"));
static BASIC_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)simple_information:").expect("invalid simple_information label regex")
});
static STATISTICS_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)statistics:").expect("invalid statistics label regex"));
static GAMES_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)games:").expect("invalid games label regex"));

static HISTORY_END: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\n\s*(?:simple_information|statistics|games)")
        .expect("invalid history terminator regex")
});
static BASIC_END: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\n\s*(?:statistics|games)").expect("invalid simple_information terminator")
});
static STATISTICS_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\n\s*games").expect("invalid statistics terminator"));

pub(super) const BASIC_DECODE_NOTE: &str = "Failed to parse simple_information JSON";
pub(super) const STATISTICS_DECODE_NOTE: &str = "Failed to parse statistics JSON";

/// Sections recovered from a labelled answer. Empty values mean "not found".
#[derive(Debug, Default)]
pub(super) struct Sections {
    pub history: String,
    pub basic_information: JsonMap,
    pub statistics: JsonMap,
    pub games: Vec<JsonMap>,
}

impl Sections {
    pub fn extract(text: &str) -> Self {
        let content_end = text.trim_end().len();

        let history = history_span(text, content_end)
            .map(|span| span.trim().to_string())
            .unwrap_or_default();

        let basic_information = object_span(text, &BASIC_LABEL, &BASIC_END, content_end)
            .map(|span| decode_object(span, BASIC_DECODE_NOTE))
            .unwrap_or_default();

        let statistics = object_span(text, &STATISTICS_LABEL, &STATISTICS_END, content_end)
            .map(|span| decode_object(span, STATISTICS_DECODE_NOTE))
            .unwrap_or_default();

        let games = games_span(text).map(decode_games).unwrap_or_default();

        Self {
            history,
            basic_information,
            statistics,
            games,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
            && self.basic_information.is_empty()
            && self.statistics.is_empty()
            && self.games.is_empty()
    }

    pub fn into_player_info(self) -> PlayerInfo {
        PlayerInfo::new(
            self.history,
            self.basic_information,
            self.statistics,
            self.games,
        )
    }
}

/// Text after the first `history:` up to the next section line or the end.
fn history_span(text: &str, content_end: usize) -> Option<&str> {
    let label = HISTORY_LABEL.find(text)?;
    let start = label.end();
    let end = HISTORY_END
        .find_at(text, start)
        .map(|terminator| terminator.start().min(content_end))
        .unwrap_or(content_end)
        .max(start);
    Some(&text[start..end])
}

/// Shortest `{...}` directly after `label` that is followed by a line matching
/// `terminator` or by nothing but whitespace.
fn object_span<'a>(
    text: &'a str,
    label: &Regex,
    terminator: &Regex,
    content_end: usize,
) -> Option<&'a str> {
    label.find_iter(text).find_map(|found| {
        let open = skip_whitespace(text, found.end());
        if !text[open..].starts_with('{') {
            return None;
        }
        text[open..]
            .match_indices('}')
            .map(|(offset, _)| open + offset + 1)
            .find(|&close| close >= content_end || terminator.is_match(&text[close..]))
            .map(|close| &text[open..close])
    })
}

/// Shortest `[...]` directly after a `games:` label.
fn games_span(text: &str) -> Option<&str> {
    GAMES_LABEL.find_iter(text).find_map(|found| {
        let open = skip_whitespace(text, found.end());
        if !text[open..].starts_with('[') {
            return None;
        }
        text[open..]
            .find(']')
            .map(|offset| &text[open..open + offset + 1])
    })
}

fn skip_whitespace(text: &str, from: usize) -> usize {
    let rest = &text[from..];
    from + (rest.len() - rest.trim_start().len())
}

fn decode_object(span: &str, failure_note: &str) -> JsonMap {
    match serde_json::from_str::<Value>(span) {
        Ok(Value::Object(map)) => map,
        Ok(_) | Err(_) => {
            debug!(note = failure_note, "Section JSON could not be decoded");
            let mut note = JsonMap::new();
            note.insert("note".to_string(), json!(failure_note));
            note
        }
    }
}

fn decode_games(span: &str) -> Vec<JsonMap> {
    match serde_json::from_str::<Value>(span) {
        Ok(value) => coerce_records(Some(&value)),
        Err(err) => {
            debug!(%err, "Games section could not be decoded");
            Vec::new()
        }
    }
}
