//! Run command - split every supported file of a folder.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{Args, ValueEnum};
use console::style;
use tracing::debug;

use invsplit_core::models::config::StoreKind;
use invsplit_core::Pipeline;

/// Arguments for the run command.
#[derive(Args)]
pub struct RunArgs {
    /// Folder containing PDF, JPG and PNG files (defaults to folder_path from the config)
    folder: Option<PathBuf>,

    /// API key for the document classifier
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Root directory for the extracted invoice PDFs
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Where file records are written
    #[arg(long, value_enum)]
    store: Option<StoreArg>,

    /// Output file for the jsonl store
    #[arg(long)]
    jsonl_path: Option<PathBuf>,
}

/// Metadata store selection.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StoreArg {
    /// MongoDB collection
    Mongo,
    /// JSON lines file
    Jsonl,
}

impl From<StoreArg> for StoreKind {
    fn from(arg: StoreArg) -> Self {
        match arg {
            StoreArg::Mongo => StoreKind::Mongo,
            StoreArg::Jsonl => StoreKind::Jsonl,
        }
    }
}

pub async fn run(args: RunArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = super::load_config(config_path)?;

    if let Some(folder) = args.folder {
        config.folder_path = folder;
    }
    if let Some(api_key) = args.api_key {
        config.api_key = api_key;
    }
    if let Some(output_dir) = args.output_dir {
        config.output_dir = output_dir;
    }
    if let Some(store) = args.store {
        config.store.backend = store.into();
    }
    if let Some(jsonl_path) = args.jsonl_path {
        config.store.jsonl_path = jsonl_path;
    }

    debug!("Using model {} at {}", config.classifier.model, config.classifier.endpoint);

    let pipeline = Pipeline::from_config(&config)?;
    let summary = pipeline
        .process_folder(&config.folder_path)
        .await
        .with_context(|| format!("Failed to read folder {}", config.folder_path.display()))?;

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        summary.processed,
        start.elapsed()
    );
    println!("  Succeeded: {}", style(summary.succeeded).green());
    if summary.failed > 0 {
        println!("  Failed:    {}", style(summary.failed).red());
    }
    if summary.skipped > 0 {
        println!("  Skipped:   {}", style(summary.skipped).yellow());
    }
    if summary.stored < summary.succeeded + summary.failed {
        println!(
            "  {} {} records could not be stored",
            style("⚠").yellow(),
            summary.succeeded + summary.failed - summary.stored
        );
    }
    println!("  Output:    {}", config.output_dir.display());

    Ok(())
}
