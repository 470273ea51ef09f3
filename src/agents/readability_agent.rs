use serde_json::{Value, json};

use super::{Agent, AgentResult, error_result, render_template};
use crate::config::{max_output_tokens, temperature_for};
use crate::providers::{GenerationClient, GenerationRequest};
use crate::readability::{analyze_paragraphs, document_metrics, visualization_data};
use crate::schema::{Schema, normalize_response};
use crate::types::AgentKind;

const SYSTEM_PROMPT: &str = "You are a readability analysis expert who interprets readability \
metrics and provides clear, actionable feedback about text complexity and accessibility. You \
understand the standard readability formulas and translate their numbers into practical \
recommendations. You must respond with a single valid JSON object.";

const USER_TEMPLATE: &str = "Interpret the following readability analysis data and return \
insights as a JSON object.

READABILITY METRICS:
{readability_metrics}

PARAGRAPH SCORES:
{paragraph_scores}

The JSON object must contain:
- \"overall_assessment\": object with \"reading_level\", \"accessibility\", \"target_audience\"
- \"key_insights\": array of strings
- \"problem_areas\": array of objects with \"issue\", \"impact\", \"solution\"
- \"recommendations\": array of strings
- \"strengths\": array of strings

Focus on practical, actionable insights. Respond with the JSON object only.";

/// Composite stage: deterministic metric computation first, then one
/// generation call that layers a qualitative interpretation on top. A
/// backend failure degrades only the `ai_insights` section; the numeric
/// metrics always survive.
pub struct ReadabilityAgent {
    insights_schema: Schema,
}

impl Default for ReadabilityAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadabilityAgent {
    pub fn new() -> Self {
        Self {
            insights_schema: Schema::new(vec![
                ("overall_assessment", json!({})),
                ("key_insights", json!([])),
                ("problem_areas", json!([])),
                ("recommendations", json!([])),
                ("strengths", json!([])),
            ]),
        }
    }

    async fn interpret(
        &self,
        client: &dyn GenerationClient,
        metrics: &Value,
        paragraphs: &Value,
    ) -> AgentResult {
        let mut ai_input = AgentResult::new();
        ai_input.insert(
            "readability_metrics".to_string(),
            Value::String(serde_json::to_string_pretty(metrics).unwrap_or_default()),
        );
        ai_input.insert(
            "paragraph_scores".to_string(),
            Value::String(serde_json::to_string_pretty(paragraphs).unwrap_or_default()),
        );

        let prompt = match render_template(self.user_template(), &ai_input) {
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
            Ok(raw) => normalize_response(&raw, &self.insights_schema),
            Err(e) => error_result(self.kind(), e),
        }
    }
}

#[async_trait::async_trait]
impl Agent for ReadabilityAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::Readability
    }

    fn system_prompt(&self) -> &'static str {
        SYSTEM_PROMPT
    }

    fn user_template(&self) -> &'static str {
        USER_TEMPLATE
    }

    fn schema(&self) -> &Schema {
        &self.insights_schema
    }

    async fn execute(&self, client: &dyn GenerationClient, input: &AgentResult) -> AgentResult {
        let content = input.get("content").and_then(Value::as_str).unwrap_or("");

        let metrics = match document_metrics(content) {
            Ok(m) => serde_json::to_value(&m).unwrap_or_else(|_| json!({})),
            Err(e) => json!({"error": e.to_string()}),
        };

        let paragraphs = analyze_paragraphs(content);
        let viz = visualization_data(&paragraphs);
        let paragraphs_value = serde_json::to_value(&paragraphs).unwrap_or_else(|_| json!([]));

        let ai_insights = self.interpret(client, &metrics, &paragraphs_value).await;

        let mut record = AgentResult::new();
        record.insert("metrics".to_string(), metrics);
        record.insert("paragraph_analysis".to_string(), paragraphs_value);
        record.insert("ai_insights".to_string(), Value::Object(ai_insights));
        record.insert(
            "visualization_data".to_string(),
            serde_json::to_value(&viz).unwrap_or_else(|_| json!({})),
        );
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::testing::MockClient;
    use crate::agents::input_from;

    const CONTENT: &str = "The cat sat on the mat. The dog ran to the park.\n\nThis second paragraph also has plenty of simple words to score.";

    #[tokio::test]
    async fn combines_metrics_paragraphs_and_insights() {
        let client =
            MockClient::always(r#"{"key_insights": ["Short sentences help"], "recommendations": ["Keep it up"]}"#);
        let agent = ReadabilityAgent::new();
        let input = input_from([("content", CONTENT)]);

        let result = agent.execute(&client, &input).await;

        assert!(result["metrics"]["flesch_reading_ease"].is_number());
        assert_eq!(result["paragraph_analysis"].as_array().unwrap().len(), 2);
        assert_eq!(
            result["ai_insights"]["key_insights"],
            json!(["Short sentences help"])
        );
        assert_eq!(result["ai_insights"]["strengths"], json!([]));
        assert!(result["visualization_data"]["color_distribution"].is_object());
    }

    #[tokio::test]
    async fn backend_failure_keeps_numeric_metrics() {
        let client = MockClient::failing("quota exceeded");
        let agent = ReadabilityAgent::new();
        let input = input_from([("content", CONTENT)]);

        let result = agent.execute(&client, &input).await;

        assert!(result["metrics"]["flesch_reading_ease"].is_number());
        assert!(
            result["ai_insights"]["error"]
                .as_str()
                .unwrap()
                .contains("quota exceeded")
        );
        // The stage itself did not fail.
        assert!(!result.contains_key("error"));
    }

    #[tokio::test]
    async fn empty_content_records_metric_error_but_still_returns() {
        let client = MockClient::always("{}");
        let agent = ReadabilityAgent::new();
        let input = input_from([("content", "")]);

        let result = agent.execute(&client, &input).await;

        assert!(
            result["metrics"]["error"]
                .as_str()
                .unwrap()
                .contains("No readable content")
        );
        assert_eq!(result["paragraph_analysis"], json!([]));
    }
}
