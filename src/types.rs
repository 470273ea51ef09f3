use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelId(String);

impl ModelId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The six pipeline stages, in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    Analyzer,
    Readability,
    Rewriter,
    Persona,
    Localization,
    ExampleGenerator,
}

impl AgentKind {
    /// Key under which this stage's result is stored in `agent_results`.
    pub fn result_key(&self) -> &'static str {
        match self {
            AgentKind::Analyzer => "analysis",
            AgentKind::Readability => "readability",
            AgentKind::Rewriter => "rewrite",
            AgentKind::Persona => "persona_feedback",
            AgentKind::Localization => "localization",
            AgentKind::ExampleGenerator => "examples",
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AgentKind::Analyzer => "analyzer",
            AgentKind::Readability => "readability",
            AgentKind::Rewriter => "rewriter",
            AgentKind::Persona => "persona",
            AgentKind::Localization => "localization",
            AgentKind::ExampleGenerator => "example_generator",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_id_preserves_its_name() {
        let model = ModelId::new("claude-3-5-sonnet-latest");
        assert_eq!(model.as_str(), "claude-3-5-sonnet-latest");
        assert_eq!(model.to_string(), "claude-3-5-sonnet-latest");
    }

    #[test]
    fn agent_kind_result_keys_are_stable() {
        assert_eq!(AgentKind::Analyzer.result_key(), "analysis");
        assert_eq!(AgentKind::Persona.result_key(), "persona_feedback");
        assert_eq!(AgentKind::ExampleGenerator.result_key(), "examples");
    }
}
