use std::env;
use std::time::Duration;

pub mod anthropic;
pub mod openai;

use crate::config_file::ProviderConfig;
use crate::errors::ProviderError;
use crate::types::ModelId;
use reqwest::Client;

pub(crate) fn http_client(timeout_secs: u64) -> Result<Client, ProviderError> {
    let client = Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()?;
    Ok(client)
}

const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// One rendered generation call. The pipeline performs no retries; any
/// timeout lives in the HTTP client.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub system: String,
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Trait for text-generation backends.
#[async_trait::async_trait]
pub trait GenerationClient: Send + Sync {
    /// Run one generation call and return the raw text response.
    async fn generate(&self, req: &GenerationRequest) -> Result<String, ProviderError>;

    /// Get the name of this provider
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &ModelId;
}

/// Create a generation client based on configuration priority:
/// 1. PROVIDER environment variable (highest priority)
/// 2. .docpolish/provider.json config file
/// 3. Auto-detection from available API keys
/// 4. Error if none found
pub fn create_client() -> Result<Box<dyn GenerationClient>, ProviderError> {
    let _ = dotenvy::dotenv();

    let config_file = ProviderConfig::load().ok();

    if let Ok(provider_name) = env::var("PROVIDER") {
        return create_client_by_name(&provider_name, &config_file);
    }

    if let Some(ref config) = config_file
        && let Some(provider_name) = &config.provider
    {
        return create_client_by_name(provider_name, &config_file);
    }

    if env::var("OPENAI_API_KEY").is_ok() {
        return create_client_by_name("openai", &config_file);
    }

    if env::var("ANTHROPIC_API_KEY").is_ok() {
        return create_client_by_name("anthropic", &config_file);
    }

    Err(ProviderError::NoProviderConfigured)
}

fn create_client_by_name(
    name: &str,
    config_file: &Option<ProviderConfig>,
) -> Result<Box<dyn GenerationClient>, ProviderError> {
    match name.to_lowercase().as_str() {
        "openai" => {
            let key = env::var("OPENAI_API_KEY")
                .map_err(|_| ProviderError::MissingApiKey("openai".to_string()))?;
            let settings = merged_settings(config_file, "openai");
            let model = model_for(settings.0, crate::config::DEFAULT_OPENAI_MODEL);
            Ok(Box::new(openai::OpenAIClient::new(key, model, settings.1)?))
        }
        "anthropic" => {
            let key = env::var("ANTHROPIC_API_KEY")
                .map_err(|_| ProviderError::MissingApiKey("anthropic".to_string()))?;
            let settings = merged_settings(config_file, "anthropic");
            let model = model_for(settings.0, crate::config::DEFAULT_ANTHROPIC_MODEL);
            Ok(Box::new(anthropic::AnthropicClient::new(
                key, model, settings.1,
            )?))
        }
        other => Err(ProviderError::Config(format!("Unknown provider: {other}"))),
    }
}

fn merged_settings(
    config_file: &Option<ProviderConfig>,
    provider: &str,
) -> (Option<String>, u64) {
    let settings = config_file
        .as_ref()
        .map(|c| c.merged_settings(provider))
        .unwrap_or_default();
    (
        settings.model,
        settings.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
    )
}

fn model_for(cfg_model: Option<String>, fallback: &str) -> ModelId {
    env::var("MODEL")
        .ok()
        .or(cfg_model)
        .map(ModelId::new)
        .unwrap_or_else(|| ModelId::new(fallback))
}
