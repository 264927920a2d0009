use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model backend '{backend}' needs an API key (set the variable named by model.api_key)")]
    MissingApiKey { backend: String },
    #[error("request to model backend '{backend}' failed: {source}")]
    Http {
        backend: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("model backend '{backend}' answered HTTP {status}: {body}")]
    Status {
        backend: String,
        status: u16,
        body: String,
    },
    #[error("model backend '{backend}' sent an unusable reply: {reason}")]
    Malformed { backend: String, reason: String },
}
