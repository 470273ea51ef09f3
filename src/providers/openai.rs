use serde_json::{Value, json};

use crate::errors::ProviderError;
use crate::types::ModelId;

use super::{GenerationClient, GenerationRequest, http_client};

pub struct OpenAIClient {
    client: reqwest::Client,
    key: String,
    model: ModelId,
}

impl OpenAIClient {
    pub fn new(key: String, model: ModelId, timeout_secs: u64) -> Result<Self, ProviderError> {
        if key.is_empty() {
            return Err(ProviderError::MissingApiKey("openai".to_string()));
        }
        Ok(Self {
            client: http_client(timeout_secs)?,
            key,
            model,
        })
    }
}

#[async_trait::async_trait]
impl GenerationClient for OpenAIClient {
    async fn generate(&self, req: &GenerationRequest) -> Result<String, ProviderError> {
        let body = json!({
            "model": self.model.as_str(),
            "max_tokens": req.max_tokens,
            "temperature": req.temperature,
            "messages": [
                {"role": "system", "content": req.system},
                {"role": "user", "content": req.prompt}
            ]
        });

        let res = self
            .client
            .post("https://api.openai.com/v1/chat/completions")
            .bearer_auth(&self.key)
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

        let text = response_json
            .get("choices")
            .and_then(|arr| arr.as_array())
            .and_then(|arr| arr.first())
            .and_then(|choice| choice.get("message"))
            .and_then(|message| message.get("content"))
            .and_then(|content| content.as_str())
            .ok_or(ProviderError::EmptyResponse)?;

        if text.is_empty() {
            return Err(ProviderError::EmptyResponse);
        }

        Ok(text.to_string())
    }

    fn name(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &ModelId {
        &self.model
    }
}
