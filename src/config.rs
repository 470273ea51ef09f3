use crate::types::AgentKind;

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4-turbo";
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-5-sonnet-latest";

/// Response budget for a single generation call. The rewriter may emit the
/// whole document back, so it gets the largest allowance.
pub fn max_output_tokens(kind: AgentKind) -> u32 {
    match kind {
        AgentKind::Rewriter => 8192,
        _ => 4096,
    }
}

/// Sampling temperature per agent. Analytical stages run cold, creative
/// stages (rewriting, example generation) run warm.
pub fn temperature_for(kind: AgentKind) -> f32 {
    match kind {
        AgentKind::Analyzer => 0.3,
        AgentKind::Rewriter => 0.7,
        AgentKind::Persona => 0.6,
        AgentKind::Localization => 0.4,
        AgentKind::ExampleGenerator => 0.8,
        AgentKind::Readability => 0.2,
    }
}
