use anyhow::{Context, Result, bail};
use colored::*;
use std::path::{Path, PathBuf};

use docpolish::personas::DEFAULT_PERSONA;
use docpolish::pipeline::{DocumentInput, Orchestrator, StageLogger};
use docpolish::providers::create_client;
use docpolish::trace::append_run_trace;
use docpolish::{PersonaTable, PipelineRun};

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        bail!("usage: docpolish <file.md> [persona]");
    };
    let persona = args.next().unwrap_or_else(|| DEFAULT_PERSONA.to_string());

    let document = read_document(Path::new(&path))?;
    let client = create_client()?;
    log::info!("Using provider '{}' with model '{}'", client.name(), client.model());

    let mut personas = PersonaTable::built_in();
    personas.load_overrides(&PathBuf::from(".docpolish/personas"))?;

    let mut orchestrator = Orchestrator::new(client).with_personas(personas);
    if let Ok(logger) = StageLogger::new(PathBuf::from(".docpolish")) {
        orchestrator = orchestrator.with_logger(logger);
    }

    let run = orchestrator.run(document, &persona).await;

    if let Err(e) = append_run_trace(&run) {
        log::warn!("Failed to persist run trace: {e}");
    }

    print_summary(&run);

    if run.error.is_some() {
        std::process::exit(1);
    }
    Ok(())
}

fn read_document(path: &Path) -> Result<DocumentInput> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let title = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Untitled")
        .to_string();
    Ok(DocumentInput::from_text(title, text))
}

fn print_summary(run: &PipelineRun) {
    if let Some(error) = &run.error {
        eprintln!("{} {}", "✗".red().bold(), error.red());
        return;
    }

    let Some(report) = &run.final_output else {
        return;
    };

    println!("\n{}", "Improvements".bold().underline());
    for item in &report.improvement_summary {
        println!("  {} {}", "•".green(), item);
    }

    println!("\n{}", "Scores".bold().underline());
    for (name, score) in &report.scores {
        println!("  {name}: {score:.1}");
    }

    if !report.recommendations.is_empty() {
        println!("\n{}", "Recommendations".bold().underline());
        for rec in &report.recommendations {
            println!("  {} {}", "→".yellow(), rec);
        }
    }

    let wc = &report.word_count_change;
    println!(
        "\n{} {} → {} words ({:+}, {:.1}%)",
        "Word count:".bold(),
        wc.original,
        wc.final_count,
        wc.change,
        wc.percentage_change
    );

    println!("\n{}", "Final content".bold().underline());
    println!("{}", report.final_content);
}
