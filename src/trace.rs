use anyhow::Result;
use serde_json::json;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::pipeline::PipelineRun;

/// Append a finished pipeline run to `.docpolish/traces/runs.jsonl`.
pub fn append_run_trace(run: &PipelineRun) -> Result<()> {
    append_run_trace_in_dir(Path::new("."), run)
}

pub fn append_run_trace_in_dir(base_dir: &Path, run: &PipelineRun) -> Result<()> {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let trace_dir = base_dir.join(".docpolish").join("traces");
    fs::create_dir_all(&trace_dir)?;

    let record = json!({
        "timestamp": timestamp,
        "title": &run.input.title,
        "persona": &run.persona,
        "run": run,
    });

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(runs_trace_path(base_dir))?;
    writeln!(file, "{}", serde_json::to_string(&record)?)?;

    Ok(())
}

pub fn runs_trace_path(base_dir: &Path) -> PathBuf {
    base_dir.join(".docpolish").join("traces").join("runs.jsonl")
}
