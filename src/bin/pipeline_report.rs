//! One-shot report: reads a workbook exported to JSON and prints the report JSON.
//!
//! Usage: `pipeline_report <workbook.json>` (config via $PIPELINE_CONFIG_PATH).

use anyhow::Context;
use partnership_pipeline::filter::ProspectFilter;
use partnership_pipeline::ingest::load_workbook_from;
use partnership_pipeline::{build_report, PipelineConfig};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pipeline=info,warn")),
        )
        .init();

    let path: PathBuf = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .context("usage: pipeline_report <workbook.json>")?;

    let cfg = PipelineConfig::load_default()?;
    let wb = load_workbook_from(&path)?;
    let report = build_report(&wb, &ProspectFilter::default(), &cfg)
        .with_context(|| format!("building report for {}", path.display()))?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
