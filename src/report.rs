use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::collections::{BTreeMap, BTreeSet};

/// All agent outputs for one run, keyed by stage result key.
pub type AgentResults = BTreeMap<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordCountChange {
    pub original: i64,
    #[serde(rename = "final")]
    pub final_count: i64,
    pub change: i64,
    pub percentage_change: f64,
}

/// The merged, presentation-ready summary derived from all agent results.
/// Built once by pure functions; never independently mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalReport {
    pub final_content: String,
    pub improvement_summary: Vec<String>,
    pub scores: BTreeMap<String, f64>,
    pub recommendations: Vec<String>,
    pub word_count_change: WordCountChange,
    pub readability_improvement: Value,
}

/// Assemble the consolidated report from `agent_results`. Pure function:
/// same inputs produce a byte-identical report.
pub fn build_final_report(original_word_count: i64, agent_results: &AgentResults) -> FinalReport {
    let rewritten = stage_str(agent_results, "rewrite", "rewritten_content").unwrap_or_default();

    let content = integrate_examples(rewritten.to_string(), stage(agent_results, "examples"));
    let final_content = apply_persona_rewrites(content, stage(agent_results, "persona_feedback"));

    FinalReport {
        final_content,
        improvement_summary: improvement_summary(agent_results),
        scores: extract_scores(agent_results),
        recommendations: consolidate_recommendations(agent_results),
        word_count_change: word_count_change(original_word_count, agent_results),
        readability_improvement: assess_readability_improvement(agent_results),
    }
}

/// Minimal well-formed report substituted when merging fails; callers
/// always get a complete FinalReport on any non-early-exit path.
pub fn degraded_report(agent_results: &AgentResults) -> FinalReport {
    let final_content = stage_str(agent_results, "rewrite", "rewritten_content")
        .unwrap_or_default()
        .to_string();

    FinalReport {
        final_content,
        improvement_summary: vec!["Analysis completed with some processing issues".to_string()],
        scores: BTreeMap::from([("overall".to_string(), 5.0)]),
        recommendations: vec!["Review the analysis results in the detailed sections".to_string()],
        word_count_change: WordCountChange {
            original: 0,
            final_count: 0,
            change: 0,
            percentage_change: 0.0,
        },
        readability_improvement: json!({"status": "No readability analysis available"}),
    }
}

/// Fixed-order improvement summary: analyzer priority fixes, then one
/// count-based sentence per downstream agent that produced anything.
pub fn improvement_summary(agent_results: &AgentResults) -> Vec<String> {
    let mut summary = Vec::new();

    if let Some(fixes) = stage_array(agent_results, "analysis", "priority_fixes") {
        for fix in fixes {
            if let Some(text) = fix.as_str() {
                summary.push(format!("Fixed: {text}"));
            }
        }
    }

    if let Some(issues) = stage_array(agent_results, "persona_feedback", "persona_specific_issues")
        && !issues.is_empty()
    {
        summary.push(format!("Addressed {} persona-specific issues", issues.len()));
    }

    if let Some(changes) = stage_array(agent_results, "localization", "recommended_changes")
        && !changes.is_empty()
    {
        summary.push(format!("Applied {} localization improvements", changes.len()));
    }

    if let Some(examples) = stage_array(agent_results, "examples", "generated_examples")
        && !examples.is_empty()
    {
        summary.push(format!("Added {} helpful examples", examples.len()));
    }

    if summary.is_empty() {
        summary.push("Content improved for clarity and readability".to_string());
    }

    summary
}

/// Append each generated example as a new section at the end of the
/// content. No inline insertion at point of relevance.
pub fn integrate_examples(mut content: String, examples_data: Option<&Map<String, Value>>) -> String {
    let Some(examples) = examples_data
        .and_then(|d| d.get("generated_examples"))
        .and_then(Value::as_array)
    else {
        return content;
    };

    for example in examples {
        let body = example.get("content").and_then(Value::as_str).unwrap_or("");
        if body.is_empty() {
            continue;
        }

        let title = example
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or("Untitled");
        content.push_str(&format!("\n\n### Example: {title}\n\n"));
        content.push_str(body);

        if let Some(explanation) = example.get("explanation").and_then(Value::as_str)
            && !explanation.is_empty()
        {
            content.push_str(&format!("\n\n*{explanation}*"));
        }
    }

    content
}

/// Apply each sample rewrite as a literal first-match substring replacement.
/// Pairs whose original text is not found verbatim are silently skipped; no
/// fuzzy matching.
pub fn apply_persona_rewrites(mut content: String, persona_data: Option<&Map<String, Value>>) -> String {
    let Some(rewrites) = persona_data
        .and_then(|d| d.get("sample_rewrites"))
        .and_then(Value::as_array)
    else {
        return content;
    };

    for rewrite in rewrites {
        let original = rewrite
            .get("original_paragraph")
            .and_then(Value::as_str)
            .unwrap_or("");
        let improved = rewrite
            .get("rewritten_paragraph")
            .and_then(Value::as_str)
            .unwrap_or("");

        if !original.is_empty() && !improved.is_empty() && content.contains(original) {
            content = content.replacen(original, improved, 1);
        }
    }

    content
}

/// One numeric value per agent, flat. Each agent's own default-on-missing
/// convention applies (localization defaults to 7, everything else to 5).
pub fn extract_scores(agent_results: &AgentResults) -> BTreeMap<String, f64> {
    let mut scores = BTreeMap::new();

    scores.insert(
        "overall".to_string(),
        stage_f64(agent_results, "analysis", &["overall_score"]).unwrap_or(5.0),
    );
    scores.insert(
        "readability".to_string(),
        stage_f64(agent_results, "analysis", &["readability", "score"]).unwrap_or(5.0),
    );
    scores.insert(
        "structure".to_string(),
        stage_f64(agent_results, "analysis", &["structure", "score"]).unwrap_or(5.0),
    );
    scores.insert(
        "completeness".to_string(),
        stage_f64(agent_results, "analysis", &["completeness", "score"]).unwrap_or(5.0),
    );
    scores.insert(
        "persona_alignment".to_string(),
        stage_f64(agent_results, "persona_feedback", &["persona_alignment_score"]).unwrap_or(5.0),
    );
    scores.insert(
        "localization_readiness".to_string(),
        stage_f64(
            agent_results,
            "localization",
            &["localization_readiness_score"],
        )
        .unwrap_or(7.0),
    );

    // The metrics record may be an error record for unreadable input; the
    // score entries still appear, holding their defaults.
    if stage(agent_results, "readability")
        .and_then(|r| r.get("metrics"))
        .and_then(Value::as_object)
        .is_some()
    {
        scores.insert(
            "flesch_reading_ease".to_string(),
            stage_f64(agent_results, "readability", &["metrics", "flesch_reading_ease"])
                .unwrap_or(50.0),
        );
        scores.insert(
            "grade_level".to_string(),
            stage_f64(agent_results, "readability", &["metrics", "flesch_kincaid_grade"])
                .unwrap_or(10.0),
        );
    }

    scores
}

/// Union of the agents' recommendation lists, deduplicated by exact string
/// equality. Ordering is lexicographic after dedup, not semantic.
pub fn consolidate_recommendations(agent_results: &AgentResults) -> Vec<String> {
    let mut recommendations = BTreeSet::new();

    if let Some(suggestions) = stage_array(agent_results, "analysis", "detailed_suggestions") {
        for suggestion in suggestions {
            if suggestion.get("priority").and_then(Value::as_str) == Some("high")
                && let Some(text) = suggestion.get("suggestion").and_then(Value::as_str)
                && !text.is_empty()
            {
                recommendations.insert(text.to_string());
            }
        }
    }

    for (stage_key, field) in [
        ("persona_feedback", "call_to_action_suggestions"),
        ("localization", "overall_recommendations"),
    ] {
        if let Some(items) = stage_array(agent_results, stage_key, field) {
            for item in items {
                if let Some(text) = item.as_str() {
                    recommendations.insert(text.to_string());
                }
            }
        }
    }

    if let Some(items) = stage(agent_results, "readability")
        .and_then(|r| r.get("ai_insights"))
        .and_then(|i| i.get("recommendations"))
        .and_then(Value::as_array)
    {
        for item in items {
            if let Some(text) = item.as_str() {
                recommendations.insert(text.to_string());
            }
        }
    }

    recommendations.into_iter().collect()
}

/// Word-count delta between input and rewrite; guards the zero-original
/// division.
pub fn word_count_change(original: i64, agent_results: &AgentResults) -> WordCountChange {
    let final_count = stage_f64(agent_results, "rewrite", &["word_count"])
        .map(|n| n as i64)
        .unwrap_or(original);

    let change = final_count - original;
    let percentage_change = if original > 0 {
        change as f64 / original as f64 * 100.0
    } else {
        0.0
    };

    WordCountChange {
        original,
        final_count,
        change,
        percentage_change,
    }
}

/// Readability summary for the report: reading ease, grade level, labels,
/// and the paragraph color distribution.
pub fn assess_readability_improvement(agent_results: &AgentResults) -> Value {
    let Some(readability) = stage(agent_results, "readability") else {
        return json!({"status": "No readability analysis available"});
    };

    let Some(metrics) = readability.get("metrics").and_then(Value::as_object) else {
        return json!({"status": "No readability analysis available"});
    };

    let distribution = readability
        .get("visualization_data")
        .and_then(|v| v.get("color_distribution"))
        .cloned()
        .unwrap_or_else(|| json!({}));

    json!({
        "flesch_reading_ease": metrics.get("flesch_reading_ease").cloned().unwrap_or(json!(50.0)),
        "grade_level": metrics.get("flesch_kincaid_grade").cloned().unwrap_or(json!(10.0)),
        "readability_level": metrics.get("readability_level").cloned().unwrap_or(json!("Standard")),
        "text_standard": metrics.get("text_standard").cloned().unwrap_or(json!("Unknown")),
        "paragraph_distribution": distribution,
    })
}

fn stage<'a>(agent_results: &'a AgentResults, key: &str) -> Option<&'a Map<String, Value>> {
    agent_results.get(key).and_then(Value::as_object)
}

fn stage_str<'a>(agent_results: &'a AgentResults, key: &str, field: &str) -> Option<&'a str> {
    stage(agent_results, key)?.get(field)?.as_str()
}

fn stage_array<'a>(
    agent_results: &'a AgentResults,
    key: &str,
    field: &str,
) -> Option<&'a Vec<Value>> {
    stage(agent_results, key)?.get(field)?.as_array()
}

fn stage_f64(agent_results: &AgentResults, key: &str, path: &[&str]) -> Option<f64> {
    let mut value = agent_results.get(key)?;
    for field in path {
        value = value.get(field)?;
    }
    value.as_f64()
}
