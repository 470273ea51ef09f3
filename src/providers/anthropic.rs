use serde_json::{Value, json};

use crate::errors::ProviderError;
use crate::types::ModelId;

use super::{GenerationClient, GenerationRequest, http_client};

const ANTHROPIC_VERSION: &str = "2023-06-01";

pub struct AnthropicClient {
    client: reqwest::Client,
    key: String,
    model: ModelId,
}

impl AnthropicClient {
    pub fn new(key: String, model: ModelId, timeout_secs: u64) -> Result<Self, ProviderError> {
        if key.is_empty() {
            return Err(ProviderError::MissingApiKey("anthropic".to_string()));
        }
        Ok(Self {
            client: http_client(timeout_secs)?,
            key,
            model,
        })
    }
}

#[async_trait::async_trait]
impl GenerationClient for AnthropicClient {
    async fn generate(&self, req: &GenerationRequest) -> Result<String, ProviderError> {
        let body = json!({
            "model": self.model.as_str(),
            "max_tokens": req.max_tokens,
            "temperature": req.temperature,
            "system": req.system,
            "messages": [
                {"role": "user", "content": req.prompt}
            ]
        });

        let res = self
            .client
            .post("https://api.anthropic.com/v1/messages")
            .header("x-api-key", &self.key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            return Err(ProviderError::Api { status, body });
        }

        let response_json: Value = res.json().await?;

        // Concatenate all text blocks; Anthropic may split long responses.
        let mut text = String::new();
        if let Some(blocks) = response_json.get("content").and_then(|v| v.as_array()) {
            for block in blocks {
                if block.get("type").and_then(|t| t.as_str()) == Some("text")
                    && let Some(t) = block.get("text").and_then(|t| t.as_str())
                {
                    text.push_str(t);
                }
            }
        }

        if text.is_empty() {
            return Err(ProviderError::EmptyResponse);
        }

        Ok(text)
    }

    fn name(&self) -> &str {
        "anthropic"
    }

    fn model(&self) -> &ModelId {
        &self.model
    }
}
