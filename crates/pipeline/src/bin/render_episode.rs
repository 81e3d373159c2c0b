//! `render-episode`: headless CLI front end for the podcast studio
//! pipeline
//!
//! A thin operational shell — it reads source documents off disk, loads
//! configuration, and drives [`podcast_pipeline::Orchestrator`]. No
//! business logic lives here.

use anyhow::{Context, Result};
use clap::Parser;
use podcast_core::{SourceDocument, SourceType};
use podcast_pipeline::{Orchestrator, PipelineInput, RunMetadata};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

/// Render one podcast episode from a set of source text files
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Source document paths (plain text or markdown)
    #[arg(required = true)]
    sources: Vec<PathBuf>,

    /// Directory the final audio, transcript, and reports are written into
    #[arg(short, long, default_value = "./output")]
    output: PathBuf,

    /// Path to a PODCAST_STUDIO TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path to a user lexicon JSON file, layered over the compiled defaults
    #[arg(short, long)]
    lexicon: Option<PathBuf>,

    /// Episode topic, recorded in run metadata
    #[arg(long)]
    topic: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn load_source(path: &PathBuf) -> Result<SourceDocument> {
    let content = std::fs::read_to_string(path).with_context(|| format!("failed to read source file {}", path.display()))?;
    let source_type = match path.extension().and_then(|e| e.to_str()) {
        Some("md") => SourceType::Markdown,
        _ => SourceType::Text,
    };
    let id = path.file_stem().and_then(|s| s.to_str()).unwrap_or("source").to_string();
    Ok(SourceDocument::new(id, source_type, content))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)))
        .init();

    let mut config = podcast_config::load_settings(args.config.as_deref()).context("failed to load pipeline configuration")?;
    config.credentials = podcast_config::ProviderCredentials::from_env();

    let sources: Vec<SourceDocument> = args.sources.iter().map(load_source).collect::<Result<_>>()?;

    let user_lexicon = match &args.lexicon {
        Some(path) => podcast_normalizer::load_lexicon_file(path).context("failed to load lexicon file")?,
        None => Vec::new(),
    };

    info!(sources = sources.len(), development_mode = config.credentials.development_mode(), "starting episode render");

    let temp_dir = tempfile::tempdir().context("failed to create scratch directory for audio processing")?;
    let media = Arc::new(podcast_audio::FfmpegMediaTool::new(temp_dir.path().to_path_buf()));
    let llm = podcast_pipeline::build_llm(&config.credentials);
    let orchestrator = Orchestrator::new(media, llm);

    let input = PipelineInput {
        sources,
        config,
        user_lexicon,
        metadata: RunMetadata { topic: args.topic, audience: None, tone: None },
        output_dir: args.output,
    };

    let cancel = Arc::new(AtomicBool::new(false));
    let output = orchestrator.run(input, cancel).await.context("pipeline run failed")?;

    info!(
        success = output.success,
        overall_score = output.qa_report.overall_score,
        audio_path = %output.audio_path.display(),
        regeneration_attempts = output.stats.regeneration_attempts,
        "episode render complete"
    );

    if !output.success {
        std::process::exit(1);
    }

    Ok(())
}
