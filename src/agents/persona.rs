use serde_json::json;

use super::Agent;
use crate::schema::Schema;
use crate::types::AgentKind;

const SYSTEM_PROMPT: &str = "You are a user experience expert who adapts content for different \
professional personas. Analyze content from one persona's perspective and provide targeted, \
actionable suggestions that make it more relevant and valuable for that user type, while \
maintaining accuracy. You must respond with a single valid JSON object.";

const USER_TEMPLATE: &str = "Analyze the following content from the perspective of a {persona} \
and provide persona-specific feedback as a JSON object.

PERSONA: {persona}
PERSONA DESCRIPTION: {persona_description}
PERSONA PRIORITIES: {persona_priorities}

CONTENT TO ANALYZE:
{content}

The JSON object must contain:
- \"persona_alignment_score\": integer 1-10
- \"persona_specific_issues\": array of strings
- \"terminology_adjustments\": array of objects with \"current_term\", \"suggested_term\", \
\"reason\"
- \"tone_adjustments\": array of strings
- \"content_emphasis\": array of strings
- \"missing_elements\": array of strings
- \"sample_rewrites\": array of objects with \"original_paragraph\", \"rewritten_paragraph\", \
\"explanation\" (original_paragraph must quote the content verbatim)
- \"call_to_action_suggestions\": array of strings

Respond with the JSON object only.";

pub struct PersonaFeedbackAgent {
    schema: Schema,
}

impl Default for PersonaFeedbackAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl PersonaFeedbackAgent {
    pub fn new() -> Self {
        Self {
            schema: Schema::new(vec![
                ("persona_alignment_score", json!(5)),
                ("persona_specific_issues", json!([])),
                ("terminology_adjustments", json!([])),
                ("tone_adjustments", json!([])),
                ("content_emphasis", json!([])),
                ("missing_elements", json!([])),
                ("sample_rewrites", json!([])),
                ("call_to_action_suggestions", json!([])),
            ]),
        }
    }
}

#[async_trait::async_trait]
impl Agent for PersonaFeedbackAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::Persona
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::testing::MockClient;
    use crate::agents::{Agent, input_from};
    use serde_json::json;

    fn persona_input() -> crate::agents::AgentResult {
        input_from([
            ("content", "Body."),
            ("persona", "Marketer"),
            ("persona_description", "Focus on value"),
            ("persona_priorities", "clarity, business_value"),
        ])
    }

    #[tokio::test]
    async fn fills_defaults_for_missing_fields() {
        let client = MockClient::always(r#"{"persona_alignment_score": 7}"#);
        let agent = PersonaFeedbackAgent::new();

        let result = agent.execute(&client, &persona_input()).await;

        assert_eq!(result["persona_alignment_score"], json!(7));
        assert_eq!(result["sample_rewrites"], json!([]));
        assert_eq!(result["call_to_action_suggestions"], json!([]));
    }

    #[tokio::test]
    async fn prose_response_yields_fallback_record() {
        let client = MockClient::always("Marketers will love this page.");
        let agent = PersonaFeedbackAgent::new();

        let result = agent.execute(&client, &persona_input()).await;

        assert!(result.contains_key("error"));
        assert_eq!(result["persona_alignment_score"], json!(5));
        assert_eq!(result["persona_specific_issues"], json!([]));
    }
}
