use crate::constants::{DEFAULT_INSTRUCTION, SYSTEM_PROMPT_FILE, USER_PROMPT_FILE};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

pub const PLAYER_NAME_PLACEHOLDER: &str = "{player_name}";

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("failed to read prompt file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// System instructions plus the per-query user template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSet {
    pub instructions: String,
    pub user_template: String,
}

impl Default for PromptSet {
    fn default() -> Self {
        Self {
            instructions: DEFAULT_INSTRUCTION.to_string(),
            user_template: default_user_template(),
        }
    }
}

impl PromptSet {
    /// Reads `system_prompt.txt` and `user_prompt.txt` from `dir`.
    ///
    /// A missing file falls back to the built-in default with a warning; any
    /// other read failure is an error.
    pub fn load(dir: &Path) -> Result<Self, PromptError> {
        let instructions = read_or_default(&dir.join(SYSTEM_PROMPT_FILE), DEFAULT_INSTRUCTION)?;
        let user_template = read_or_default(&dir.join(USER_PROMPT_FILE), &default_user_template())?;
        Ok(Self {
            instructions,
            user_template,
        })
    }

    pub fn user_prompt(&self, player_name: &str) -> String {
        render(&self.user_template, player_name)
    }
}

fn default_user_template() -> String {
    format!("{DEFAULT_INSTRUCTION} Provide information about the baseball player {PLAYER_NAME_PLACEHOLDER}.")
}

fn read_or_default(path: &Path, fallback: &str) -> Result<String, PromptError> {
    match fs::read_to_string(path) {
        Ok(content) => {
            debug!(path = %path.display(), "Loaded prompt file");
            Ok(content.trim().to_string())
        }
        Err(source) if source.kind() == io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "Prompt file not found, using default instruction");
            Ok(fallback.to_string())
        }
        Err(source) => Err(PromptError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Format-string style substitution: `{player_name}` is replaced, `{{` and
/// `}}` become literal braces, any other `{...}` is kept as written.
pub fn render(template: &str, player_name: &str) -> String {
    let mut out = String::with_capacity(template.len() + player_name.len());
    let mut rest = template;

    while let Some(pos) = rest.find(['{', '}']) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        if tail.starts_with("{{") || tail.starts_with("}}") {
            out.push_str(&tail[..1]);
            rest = &tail[2..];
        } else if let Some(after) = tail.strip_prefix(PLAYER_NAME_PLACEHOLDER) {
            out.push_str(player_name);
            rest = after;
        } else {
            out.push_str(&tail[..1]);
            rest = &tail[1..];
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn substitutes_name_and_unescapes_braces() {
        let template = "Profile {player_name} as {{\"history\": \"...\"}}";
        assert_eq!(
            render(template, "Mookie Betts"),
            "Profile Mookie Betts as {\"history\": \"...\"}"
        );
    }

    #[test]
    fn unknown_placeholders_are_left_alone() {
        assert_eq!(render("{team} / {player_name}", "X"), "{team} / X");
        assert_eq!(render("dangling {", "X"), "dangling {");
    }

    #[test]
    fn loads_and_trims_prompt_files() {
        let dir = tempdir().expect("temp dir");
        fs::write(dir.path().join(SYSTEM_PROMPT_FILE), "\n  You are a scout.  \n").expect("write");
        fs::write(dir.path().join(USER_PROMPT_FILE), "Tell me about {player_name}.\n").expect("write");

        let prompts = PromptSet::load(dir.path()).expect("prompts load");

        assert_eq!(prompts.instructions, "You are a scout.");
        assert_eq!(prompts.user_prompt("Aaron Judge"), "Tell me about Aaron Judge.");
    }

    #[test]
    fn missing_files_fall_back_to_defaults() {
        let dir = tempdir().expect("temp dir");

        let prompts = PromptSet::load(dir.path()).expect("defaults");

        assert_eq!(prompts.instructions, DEFAULT_INSTRUCTION);
        let prompt = prompts.user_prompt("Shohei Ohtani");
        assert!(prompt.starts_with(DEFAULT_INSTRUCTION));
        assert!(prompt.contains("Shohei Ohtani"));
    }
}
