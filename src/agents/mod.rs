use regex::Regex;
use serde_json::{Map, Value};
use std::fmt::Display;
use std::sync::OnceLock;

pub mod analyzer;
pub mod example_generator;
pub mod localization;
pub mod persona;
pub mod readability_agent;
pub mod rewriter;

pub use analyzer::AnalyzerAgent;
pub use example_generator::ExampleGeneratorAgent;
pub use localization::LocalizationAgent;
pub use persona::PersonaFeedbackAgent;
pub use readability_agent::ReadabilityAgent;
pub use rewriter::RewriterAgent;

use crate::config::{max_output_tokens, temperature_for};
use crate::errors::AgentError;
use crate::providers::{GenerationClient, GenerationRequest};
use crate::schema::{Schema, normalize_response};
use crate::types::AgentKind;

/// Normalized output of one agent invocation. Created once per pipeline run
/// and read-only downstream.
pub type AgentResult = Map<String, Value>;

/// One configured text-generation task: fixed instruction template, fixed
/// input-rendering template, fixed output schema. Stateless across calls.
#[async_trait::async_trait]
pub trait Agent: Send + Sync {
    fn kind(&self) -> AgentKind;

    fn system_prompt(&self) -> &'static str;

    /// User prompt template with `{placeholder}` slots filled from the
    /// input mapping.
    fn user_template(&self) -> &'static str;

    fn schema(&self) -> &Schema;

    /// Schema-driven normalization by default; agents with non-JSON output
    /// override this.
    fn parse_response(&self, raw: &str) -> AgentResult {
        normalize_response(raw, self.schema())
    }

    /// Render the prompt, call the backend once, normalize the response.
    /// Every failure mode is captured in the returned record; nothing is
    /// retried and nothing escapes.
    async fn execute(&self, client: &dyn GenerationClient, input: &AgentResult) -> AgentResult {
        let prompt = match render_template(self.user_template(), input) {
            Ok(prompt) => prompt,
            Err(e) => return error_result(self.kind(), e),
        };

        let req = GenerationRequest {
            system: self.system_prompt().to_string(),
            prompt,
            temperature: temperature_for(self.kind()),
            max_tokens: max_output_tokens(self.kind()),
        };

        match client.generate(&req).await {
            Ok(raw) => self.parse_response(&raw),
            Err(e) => error_result(self.kind(), e),
        }
    }
}

/// Terminal per-agent failure record: `{error, agent}`. The `agent` key is
/// what distinguishes a backend failure from a normalizer fallback.
pub fn error_result(kind: AgentKind, detail: impl Display) -> AgentResult {
    let mut record = Map::new();
    record.insert("error".to_string(), Value::String(detail.to_string()));
    record.insert("agent".to_string(), Value::String(kind.to_string()));
    record
}

/// Substitute `{key}` placeholders from the input mapping. A placeholder
/// with no matching input key is a caller contract violation and fails the
/// render. String values are inserted verbatim, everything else as JSON.
pub fn render_template(template: &str, input: &AgentResult) -> Result<String, AgentError> {
    static PLACEHOLDER_RE: OnceLock<Regex> = OnceLock::new();
    let re =
        PLACEHOLDER_RE.get_or_init(|| Regex::new(r"\{([a-z][a-z0-9_]*)\}").expect("placeholder regex"));

    let mut rendered = String::with_capacity(template.len());
    let mut last = 0;

    for caps in re.captures_iter(template) {
        let whole = caps.get(0).expect("capture 0");
        let key = &caps[1];

        let value = input
            .get(key)
            .ok_or_else(|| AgentError::MissingInput(key.to_string()))?;

        rendered.push_str(&template[last..whole.start()]);
        match value {
            Value::String(s) => rendered.push_str(s),
            other => rendered.push_str(&other.to_string()),
        }
        last = whole.end();
    }

    rendered.push_str(&template[last..]);
    Ok(rendered)
}

/// Convenience for building agent input mappings out of string pairs.
pub fn input_from<const N: usize>(pairs: [(&str, &str); N]) -> AgentResult {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
        .collect()
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::errors::ProviderError;
    use crate::types::ModelId;

    /// Scripted client returning canned responses in call order.
    pub struct MockClient {
        model: ModelId,
        responses: Vec<Result<String, String>>,
        call_count: std::sync::Mutex<usize>,
    }

    impl MockClient {
        pub fn new(responses: Vec<Result<String, String>>) -> Self {
            Self {
                model: ModelId::new("mock-model"),
                responses,
                call_count: std::sync::Mutex::new(0),
            }
        }

        pub fn always(text: &str) -> Self {
            Self::new(vec![Ok(text.to_string())])
        }

        pub fn failing(message: &str) -> Self {
            Self::new(vec![Err(message.to_string())])
        }

        pub fn calls(&self) -> usize {
            *self.call_count.lock().unwrap()
        }
    }

    #[async_trait::async_trait]
    impl GenerationClient for MockClient {
        async fn generate(&self, _req: &GenerationRequest) -> Result<String, ProviderError> {
            let mut count = self.call_count.lock().unwrap();
            let idx = *count;
            *count += 1;

            match self.responses.get(idx.min(self.responses.len().saturating_sub(1))) {
                Some(Ok(text)) => Ok(text.clone()),
                Some(Err(message)) => Err(ProviderError::Config(message.clone())),
                None => Err(ProviderError::EmptyResponse),
            }
        }

        fn name(&self) -> &str {
            "mock"
        }

        fn model(&self) -> &ModelId {
            &self.model
        }
    }
}
