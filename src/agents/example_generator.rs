use serde_json::json;

use super::Agent;
use crate::schema::Schema;
use crate::types::AgentKind;

const SYSTEM_PROMPT: &str = "You are a technical writing expert who creates relevant, realistic \
examples that enhance understanding. Identify the sections of a document that would benefit \
from examples and generate contextually appropriate ones: code samples, scenarios, use cases, \
and walkthroughs that make abstract concepts concrete. You must respond with a single valid \
JSON object.";

const USER_TEMPLATE: &str = "Analyze the following content and generate examples where they \
would enhance understanding. Return the findings as a JSON object.

CONTENT TO ANALYZE:
{content}

DOCUMENT CONTEXT: {title}

The JSON object must contain:
- \"sections_needing_examples\": array of objects with \"section_title\", \"reason\", \
\"complexity_level\" (beginner/intermediate/advanced)
- \"generated_examples\": array of objects with \"section\", \"example_type\" \
(code/scenario/use_case/walkthrough), \"title\", \"content\", \"explanation\", \
\"placement_suggestion\"
- \"code_examples\": array of objects with \"section\", \"language\", \"code\", \"description\"
- \"scenario_examples\": array of objects with \"section\", \"scenario\", \"step_by_step\" \
(array of strings), \"outcome\"
- \"integration_notes\": array of strings

Respond with the JSON object only.";

pub struct ExampleGeneratorAgent {
    schema: Schema,
}

impl Default for ExampleGeneratorAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl ExampleGeneratorAgent {
    pub fn new() -> Self {
        Self {
            schema: Schema::new(vec![
                ("sections_needing_examples", json!([])),
                ("generated_examples", json!([])),
                ("code_examples", json!([])),
                ("scenario_examples", json!([])),
                ("integration_notes", json!([])),
            ]),
        }
    }
}

#[async_trait::async_trait]
impl Agent for ExampleGeneratorAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::ExampleGenerator
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
