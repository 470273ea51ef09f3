use serde_json::{Value, json};

use super::{Agent, AgentResult};
use crate::schema::Schema;
use crate::types::AgentKind;

const SYSTEM_PROMPT: &str = "You are an expert technical writer specializing in clear, engaging \
documentation. Rewrite documentation content by integrating the supplied improvement suggestions \
while preserving the original heading hierarchy and all technical facts. Simplify complex \
concepts without losing accuracy, improve flow and transitions, and make value propositions \
more apparent. Return only the rewritten document in clean markdown.";

const USER_TEMPLATE: &str = "Rewrite the following documentation, integrating every improvement \
suggestion naturally.

ORIGINAL TITLE: {title}

ORIGINAL CONTENT:
{content}

IMPROVEMENT SUGGESTIONS:
{suggestions}

Keep the same heading hierarchy and organization, keep all technical information, improve \
readability and clarity, and address the completeness issues the suggestions identify. Return \
the rewritten content in clean markdown format with no surrounding commentary.";

/// The rewriter emits markdown, not JSON, so it bypasses schema
/// normalization with a custom parse.
pub struct RewriterAgent {
    schema: Schema,
}

impl Default for RewriterAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl RewriterAgent {
    pub fn new() -> Self {
        Self {
            schema: Schema::new(vec![
                ("rewritten_content", json!("")),
                ("word_count", json!(0)),
                ("improvement_applied", json!(false)),
            ]),
        }
    }
}

fn strip_decorative_fences(response: &str) -> &str {
    let mut text = response.trim();
    if let Some(rest) = text.strip_prefix("```markdown") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

#[async_trait::async_trait]
impl Agent for RewriterAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::Rewriter
    }

    fn system_prompt(&self) -> &'static str {
        SYSTEM_PROMPT
    }

    fn user_template(&self) -> &'static str {
        USER_TEMPLATE
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn parse_response(&self, raw: &str) -> AgentResult {
        let content = strip_decorative_fences(raw);

        let mut record = AgentResult::new();
        record.insert(
            "rewritten_content".to_string(),
            Value::String(content.to_string()),
        );
        record.insert(
            "word_count".to_string(),
            json!(content.split_whitespace().count()),
        );
        record.insert("improvement_applied".to_string(), Value::Bool(true));
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::testing::MockClient;
    use crate::agents::input_from;
    use serde_json::json;

    fn rewriter_input() -> AgentResult {
        input_from([
            ("title", "T"),
            ("content", "Original body."),
            ("suggestions", "{}"),
        ])
    }

    #[tokio::test]
    async fn returns_content_with_word_count() {
        let client = MockClient::always("# Title\n\nRewritten body with five words.");
        let agent = RewriterAgent::new();

        let result = agent.execute(&client, &rewriter_input()).await;

        assert_eq!(
            result["rewritten_content"],
            json!("# Title\n\nRewritten body with five words.")
        );
        assert_eq!(result["word_count"], json!(7));
        assert_eq!(result["improvement_applied"], json!(true));
    }

    #[tokio::test]
    async fn strips_markdown_fences() {
        let client = MockClient::always("```markdown\n# Clean\n\nBody text.\n```");
        let agent = RewriterAgent::new();

        let result = agent.execute(&client, &rewriter_input()).await;

        assert_eq!(result["rewritten_content"], json!("# Clean\n\nBody text."));
    }

    #[tokio::test]
    async fn strips_bare_fences() {
        let client = MockClient::always("```\nplain fenced\n```");
        let agent = RewriterAgent::new();

        let result = agent.execute(&client, &rewriter_input()).await;

        assert_eq!(result["rewritten_content"], json!("plain fenced"));
    }

    #[tokio::test]
    async fn backend_failure_is_terminal_for_the_stage() {
        let client = MockClient::failing("timeout");
        let agent = RewriterAgent::new();

        let result = agent.execute(&client, &rewriter_input()).await;

        assert!(result["error"].as_str().unwrap().contains("timeout"));
        assert_eq!(result["agent"], json!("rewriter"));
        assert!(!result.contains_key("rewritten_content"));
    }
}
