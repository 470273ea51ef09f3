use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::panic::{AssertUnwindSafe, catch_unwind};

pub mod logging;

pub use logging::StageLogger;

use crate::agents::{
    Agent, AgentResult, AnalyzerAgent, ExampleGeneratorAgent, LocalizationAgent,
    PersonaFeedbackAgent, ReadabilityAgent, RewriterAgent, input_from,
};
use crate::personas::PersonaTable;
use crate::providers::GenerationClient;
use crate::report::{AgentResults, FinalReport, build_final_report, degraded_report};
use crate::types::AgentKind;

/// Immutable pipeline input, produced by an external fetch/extract step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentInput {
    pub title: String,
    pub url: String,
    pub text: String,
    pub word_count: i64,
}

impl DocumentInput {
    pub fn from_text(title: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            title: title.into(),
            url: String::new(),
            word_count: text.split_whitespace().count() as i64,
            text,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub message: String,
}

/// The full record of one orchestration run. Mutated in place while the
/// pipeline executes, handed to the caller read-only afterwards. A set
/// `error` means the whole pipeline failed; a missing section in
/// `agent_results` means only that stage degraded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineRun {
    pub input: DocumentInput,
    pub persona: String,
    pub timestamp: DateTime<Utc>,
    pub agent_results: AgentResults,
    pub execution_log: Vec<LogEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_output: Option<FinalReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PipelineRun {
    fn new(input: DocumentInput, persona: String) -> Self {
        Self {
            input,
            persona,
            timestamp: Utc::now(),
            agent_results: AgentResults::new(),
            execution_log: Vec::new(),
            final_output: None,
            error: None,
        }
    }
}

/// Sequences the six agents in their fixed dependency order. No branching
/// on content, no retries, no parallel fan-out; the only early exits are
/// the empty-input guard and an Analyzer backend failure.
pub struct Orchestrator {
    client: Box<dyn GenerationClient>,
    personas: PersonaTable,
    logger: Option<StageLogger>,
    analyzer: AnalyzerAgent,
    readability: ReadabilityAgent,
    rewriter: RewriterAgent,
    persona_feedback: PersonaFeedbackAgent,
    localization: LocalizationAgent,
    example_generator: ExampleGeneratorAgent,
}

impl Orchestrator {
    pub fn new(client: Box<dyn GenerationClient>) -> Self {
        Self {
            client,
            personas: PersonaTable::built_in(),
            logger: None,
            analyzer: AnalyzerAgent::new(),
            readability: ReadabilityAgent::new(),
            rewriter: RewriterAgent::new(),
            persona_feedback: PersonaFeedbackAgent::new(),
            localization: LocalizationAgent::new(),
            example_generator: ExampleGeneratorAgent::new(),
        }
    }

    pub fn with_personas(mut self, personas: PersonaTable) -> Self {
        self.personas = personas;
        self
    }

    pub fn with_logger(mut self, logger: StageLogger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Run the whole pipeline. Always returns; failure is communicated via
    /// the `error` field of the returned record, never by panicking.
    pub async fn run(&self, document: DocumentInput, persona_name: &str) -> PipelineRun {
        let persona = self.personas.get_or_default(persona_name).clone();
        let title = document.title.clone();
        let text = document.text.clone();
        let original_word_count = document.word_count;

        let mut run = PipelineRun::new(document, persona.name.clone());

        if text.trim().is_empty() {
            run.error = Some("No content provided for analysis".to_string());
            return run;
        }

        // Step 1: analyze. The only agent whose backend failure aborts the
        // pipeline; everything after it degrades per stage instead.
        self.log_step(&mut run, "analyzer", "Starting documentation analysis...");
        let analyzer_input = input_from([("title", title.as_str()), ("content", text.as_str())]);
        let analysis = self.analyzer.execute(self.client.as_ref(), &analyzer_input).await;

        if let Some(message) = backend_failure(&analysis) {
            let error = format!("Analysis failed: {message}");
            self.log_step(&mut run, "analyzer", &error);
            run.agent_results
                .insert(AgentKind::Analyzer.result_key().to_string(), Value::Object(analysis));
            run.error = Some(error);
            return run;
        }

        let suggestions =
            serde_json::to_string_pretty(&analysis).unwrap_or_else(|_| "{}".to_string());
        run.agent_results
            .insert(AgentKind::Analyzer.result_key().to_string(), Value::Object(analysis));
        self.log_step(&mut run, "analyzer", "Documentation analysis completed");

        // Step 2: deterministic readability metrics + interpretation.
        self.log_step(&mut run, "readability", "Analyzing readability metrics...");
        let readability_input = input_from([("content", text.as_str())]);
        let readability = self
            .readability
            .execute(self.client.as_ref(), &readability_input)
            .await;
        run.agent_results
            .insert(AgentKind::Readability.result_key().to_string(), Value::Object(readability));
        self.log_step(&mut run, "readability", "Readability analysis completed");

        // Step 3: rewrite, consuming the analyzer's suggestions.
        self.log_step(&mut run, "rewriter", "Rewriting documentation with improvements...");
        let rewriter_input = input_from([
            ("title", title.as_str()),
            ("content", text.as_str()),
            ("suggestions", suggestions.as_str()),
        ]);
        let rewrite = self.rewriter.execute(self.client.as_ref(), &rewriter_input).await;
        run.agent_results
            .insert(AgentKind::Rewriter.result_key().to_string(), Value::Object(rewrite));
        self.log_step(&mut run, "rewriter", "Documentation rewrite completed");

        // Later stages read the rewritten content, falling back to the
        // original text if the rewrite stage degraded.
        let working_content = run
            .agent_results
            .get(AgentKind::Rewriter.result_key())
            .and_then(|r| r.get("rewritten_content"))
            .and_then(Value::as_str)
            .filter(|c| !c.is_empty())
            .unwrap_or(text.as_str())
            .to_string();

        // Step 4: persona-specific feedback.
        self.log_step(
            &mut run,
            "persona",
            &format!("Generating {}-specific feedback...", persona.name),
        );
        let priorities = persona.priorities.join(", ");
        let persona_input = input_from([
            ("content", working_content.as_str()),
            ("persona", persona.name.as_str()),
            ("persona_description", persona.description.as_str()),
            ("persona_priorities", priorities.as_str()),
        ]);
        let persona_result = self
            .persona_feedback
            .execute(self.client.as_ref(), &persona_input)
            .await;
        run.agent_results
            .insert(AgentKind::Persona.result_key().to_string(), Value::Object(persona_result));
        self.log_step(
            &mut run,
            "persona",
            &format!("{} persona analysis completed", persona.name),
        );

        // Step 5: localization readiness.
        self.log_step(&mut run, "localization", "Analyzing localization readiness...");
        let localization_input = input_from([("content", working_content.as_str())]);
        let localization = self
            .localization
            .execute(self.client.as_ref(), &localization_input)
            .await;
        run.agent_results.insert(
            AgentKind::Localization.result_key().to_string(),
            Value::Object(localization),
        );
        self.log_step(&mut run, "localization", "Localization analysis completed");

        // Step 6: contextual examples.
        self.log_step(&mut run, "example_generator", "Generating intelligent examples...");
        let example_input = input_from([
            ("content", working_content.as_str()),
            ("title", title.as_str()),
        ]);
        let examples = self
            .example_generator
            .execute(self.client.as_ref(), &example_input)
            .await;
        run.agent_results.insert(
            AgentKind::ExampleGenerator.result_key().to_string(),
            Value::Object(examples),
        );
        self.log_step(&mut run, "example_generator", "Example generation completed");

        // Step 7: merge. A merge failure must not fail the pipeline; the
        // caller gets a minimal well-formed report instead.
        self.log_step(&mut run, "merge", "Preparing final output...");
        let merged = catch_unwind(AssertUnwindSafe(|| {
            build_final_report(original_word_count, &run.agent_results)
        }));

        run.final_output = Some(match merged {
            Ok(report) => report,
            Err(_) => {
                self.log_step(
                    &mut run,
                    "merge",
                    "Final output preparation had issues; using degraded report",
                );
                degraded_report(&run.agent_results)
            }
        });
        self.log_step(&mut run, "merge", "All processing completed successfully!");

        run
    }

    fn log_step(&self, run: &mut PipelineRun, stage: &str, message: &str) {
        run.execution_log.push(LogEntry {
            timestamp: Utc::now(),
            message: message.to_string(),
        });
        log::info!("[{stage}] {message}");

        if let Some(logger) = &self.logger
            && let Err(e) = logger.log_stage(stage, message)
        {
            log::warn!("Failed to write stage event: {e}");
        }
    }
}

/// A backend-failure record is `{error, agent}`; a normalizer fallback
/// record carries `error` too but keeps its schema fields and has no
/// `agent` key. Only the former aborts the pipeline at the Analyzer.
fn backend_failure(result: &AgentResult) -> Option<&str> {
    if result.contains_key("agent") {
        result.get("error").and_then(Value::as_str)
    } else {
        None
    }
}
