use super::{ChatModel, ModelError};
use crate::config::{ModelSettings, secret_from_env};
use crate::constants::{DEFAULT_CHAT_API_PATH, DEFAULT_OLLAMA_ENDPOINT, DEFAULT_OPENAI_ENDPOINT};
use crate::domain::types::ChatMessage;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

const ERROR_BODY_LIMIT: usize = 300;

/// Which server sits behind the chat-completions URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// OpenAI or any compatible hosted API; a key is required.
    OpenAi,
    /// Local Ollama (or LocalAI) through its OpenAI-compatible route.
    Ollama,
}

impl Backend {
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "ollama" | "localai" => Backend::Ollama,
            _ => Backend::OpenAi,
        }
    }

    fn default_endpoint(self) -> &'static str {
        match self {
            Backend::OpenAi => DEFAULT_OPENAI_ENDPOINT,
            Backend::Ollama => DEFAULT_OLLAMA_ENDPOINT,
        }
    }

    fn requires_key(self) -> bool {
        matches!(self, Backend::OpenAi)
    }
}

pub struct ChatClient {
    http: Client,
    label: String,
    backend: Backend,
    url: String,
    model: String,
    api_key: Option<String>,
}

impl ChatClient {
    pub fn from_settings(settings: &ModelSettings) -> Self {
        let backend = Backend::from_name(&settings.provider);
        let endpoint = settings
            .endpoint
            .as_deref()
            .unwrap_or(backend.default_endpoint());
        let path = settings.api_path.as_deref().unwrap_or(DEFAULT_CHAT_API_PATH);

        let client = Self {
            http: Client::new(),
            label: settings.provider.clone(),
            backend,
            url: join_url(endpoint, path),
            model: settings.model.clone(),
            api_key: secret_from_env(&settings.provider, settings.api_key.as_deref()),
        };
        info!(
            backend = %client.label,
            model = %client.model,
            url = %client.url,
            "Chat model configured"
        );
        client
    }
}

fn join_url(endpoint: &str, path: &str) -> String {
    format!(
        "{}/{}",
        endpoint.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
}

#[derive(Deserialize)]
struct Completion {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ReplyMessage>,
}

#[derive(Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

#[async_trait]
impl ChatModel for ChatClient {
    fn label(&self) -> &str {
        &self.label
    }

    async fn reply(&self, conversation: &[ChatMessage]) -> Result<String, ModelError> {
        let mut request = self.http.post(&self.url).json(&CompletionRequest {
            model: &self.model,
            messages: conversation,
            stream: false,
        });
        match self.api_key.as_deref().filter(|key| !key.trim().is_empty()) {
            Some(key) => request = request.bearer_auth(key),
            None if self.backend.requires_key() => {
                return Err(ModelError::MissingApiKey {
                    backend: self.label.clone(),
                });
            }
            None => {}
        }

        info!(
            backend = %self.label,
            model = %self.model,
            messages = conversation.len(),
            "Sending conversation to chat model"
        );
        let response = request.send().await.map_err(|source| ModelError::Http {
            backend: self.label.clone(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            let body: String = response
                .text()
                .await
                .unwrap_or_default()
                .chars()
                .take(ERROR_BODY_LIMIT)
                .collect();
            warn!(backend = %self.label, status = status.as_u16(), "Chat model rejected request");
            return Err(ModelError::Status {
                backend: self.label.clone(),
                status: status.as_u16(),
                body,
            });
        }

        let completion: Completion = response.json().await.map_err(|source| ModelError::Http {
            backend: self.label.clone(),
            source,
        })?;
        debug!(backend = %self.label, "Chat model replied");

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .ok_or_else(|| ModelError::Malformed {
                backend: self.label.clone(),
                reason: "completion carried no message content".to_string(),
            })
    }
}
