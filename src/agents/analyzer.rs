use serde_json::json;

use super::Agent;
use crate::schema::Schema;
use crate::types::AgentKind;

const SYSTEM_PROMPT: &str = "You are an expert documentation analyst with deep knowledge of \
technical writing, style guides, and user experience principles. Analyze documentation content \
and return structured, actionable improvement suggestions while maintaining technical accuracy. \
Assess readability, structure, completeness, and style-guide adherence, and make sure value \
propositions are clear. You must respond with a single valid JSON object.";

const USER_TEMPLATE: &str = "Analyze the following documentation and return improvement \
suggestions as a JSON object.

TITLE: {title}
CONTENT:
{content}

The JSON object must contain:
- \"overall_score\": integer 1-10
- \"readability\", \"structure\", \"completeness\", \"style_guide_adherence\": each an object \
with \"score\" (1-10), \"issues\" (array of strings), \"suggestions\" (array of strings)
- \"priority_fixes\": array with the top 3 most important improvements
- \"detailed_suggestions\": array of objects with \"section\", \"issue\", \"suggestion\", and \
\"priority\" (high/medium/low)

Be specific and actionable. Respond with the JSON object only.";

fn section_default() -> serde_json::Value {
    json!({"score": 5, "issues": [], "suggestions": []})
}

pub struct AnalyzerAgent {
    schema: Schema,
}

impl Default for AnalyzerAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalyzerAgent {
    pub fn new() -> Self {
        Self {
            schema: Schema::new(vec![
                ("overall_score", json!(5)),
                ("readability", section_default()),
                ("structure", section_default()),
                ("completeness", section_default()),
                ("style_guide_adherence", section_default()),
                ("priority_fixes", json!([])),
                ("detailed_suggestions", json!([])),
            ]),
        }
    }
}

#[async_trait::async_trait]
impl Agent for AnalyzerAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::Analyzer
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
