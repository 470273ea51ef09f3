use serde_json::json;

use super::Agent;
use crate::schema::Schema;
use crate::types::AgentKind;

const SYSTEM_PROMPT: &str = "You are a localization expert who identifies content that may be \
difficult to translate or culturally inappropriate for international audiences: idioms, \
cultural references, region-specific formatting, regional assumptions, legal or regulatory \
references, and hard-to-translate phrasing. Provide specific, actionable recommendations to \
make content internationally friendly. You must respond with a single valid JSON object.";

const USER_TEMPLATE: &str = "Analyze the following content for localization readiness and \
return the findings as a JSON object.

CONTENT TO ANALYZE:
{content}

The JSON object must contain:
- \"localization_readiness_score\": integer 1-10
- \"cultural_references\": array of objects with \"phrase\", \"issue\", \"suggestion\"
- \"idioms_and_expressions\": array of objects with \"idiom\", \"meaning\", \"suggestion\"
- \"formatting_issues\": array of objects with \"current_format\", \"issue\", \
\"international_format\"
- \"assumptions\": array of objects with \"assumption\", \"issue\", \"suggestion\"
- \"legal_regulatory\": array of objects with \"reference\", \"issue\", \"suggestion\"
- \"hard_to_translate\": array of objects with \"phrase\", \"why_difficult\", \"alternative\"
- \"recommended_changes\": array of objects with \"original\", \"improved\", \"reason\"
- \"overall_recommendations\": array of strings

Respond with the JSON object only.";

pub struct LocalizationAgent {
    schema: Schema,
}

impl Default for LocalizationAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalizationAgent {
    pub fn new() -> Self {
        Self {
            schema: Schema::new(vec![
                ("localization_readiness_score", json!(7)),
                ("cultural_references", json!([])),
                ("idioms_and_expressions", json!([])),
                ("formatting_issues", json!([])),
                ("assumptions", json!([])),
                ("legal_regulatory", json!([])),
                ("hard_to_translate", json!([])),
                ("recommended_changes", json!([])),
                ("overall_recommendations", json!([])),
            ]),
        }
    }
}

#[async_trait::async_trait]
impl Agent for LocalizationAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::Localization
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
