use std::path::PathBuf;

use anyhow::{bail, Result};
use chrono::Local;
use clap::Parser;
use log::info;

use rewatch::classify::KeywordClassifier;
use rewatch::enrich::{MetadataSource, YouTubeSource};
use rewatch::{Pipeline, PipelineConfig};

/// Analyze an exported watch-history log into session and binge reports.
#[derive(Parser, Debug)]
#[command(name = "rewatch", version, about)]
struct Cli {
    /// Exported watch-history HTML file
    input: PathBuf,

    /// Directory the CSV reports are written to
    #[arg(short, long, default_value = "reports")]
    out_dir: PathBuf,

    /// JSON config file; missing fields keep their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Metadata service API key; without one every event takes the
    /// fallback path
    #[arg(long, env = "YOUTUBE_API_KEY")]
    api_key: Option<String>,

    /// Override: gap in minutes that splits viewing sessions
    #[arg(long)]
    session_gap_minutes: Option<i64>,

    /// Override: retention window in years
    #[arg(long)]
    retention_years: Option<u32>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => PipelineConfig::load(path)?,
        None => PipelineConfig::default(),
    };
    if cli.api_key.is_some() {
        config.api_key = cli.api_key.clone();
    }
    if let Some(gap) = cli.session_gap_minutes {
        config.session_gap_minutes = gap;
    }
    if let Some(years) = cli.retention_years {
        config.retention_years = years;
    }

    let source: Option<Box<dyn MetadataSource>> = match &config.api_key {
        Some(key) => Some(Box::new(YouTubeSource::new(key.clone())?)),
        None => None,
    };

    let classifier = Box::new(KeywordClassifier::with_default_buckets()?);
    let pipeline = Pipeline::new(config, classifier, source)?;

    let now = Local::now().naive_local();
    let summary = pipeline.run(&cli.input, &cli.out_dir, now)?;

    info!(
        "Run complete: {} events in {} sessions ({} entries dropped, {} lookup batches failed)",
        summary.events,
        summary.sessions,
        summary.parse_drops + summary.filter_drops,
        summary.failed_lookup_batches
    );

    if !summary.artifacts_failed.is_empty() {
        let names: Vec<&str> = summary
            .artifacts_failed
            .iter()
            .map(|(name, _)| name.as_str())
            .collect();
        bail!(
            "{} of {} artifacts failed to write: {}",
            summary.artifacts_failed.len(),
            summary.artifacts_failed.len() + summary.artifacts_written.len(),
            names.join(", ")
        );
    }

    Ok(())
}
