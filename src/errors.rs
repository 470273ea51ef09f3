use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("No API key configured for provider '{0}'")]
    MissingApiKey(String),

    #[error("No generation provider configured; set PROVIDER or an API key")]
    NoProviderConfigured,

    #[error("Provider configuration error: {0}")]
    Config(String),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Provider returned no text content")]
    EmptyResponse,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Missing prompt input '{0}'")]
    MissingInput(String),

    #[error("Generation failed: {0}")]
    Generation(#[from] ProviderError),
}
