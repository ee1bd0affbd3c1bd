//! BSIF Feature Extraction CLI
//!
//! Command-line driver for batch histogram extraction runs described by
//! a TOML configuration file.

use std::path::PathBuf;

use bsif_features::{bank::FileFilterBank, batch, config::RunConfig, dataset};
use clap::Parser;
use tracing::info;

/// Batch BSIF histogram extraction over an image set.
#[derive(Debug, Parser)]
#[command(name = "bsif-features", version, about)]
struct Args {
    /// Path to the TOML run configuration.
    #[arg(short, long, value_name = "FILE")]
    config: PathBuf,

    /// Validate the configuration and input lists, then exit.
    #[arg(long)]
    dry_run: bool,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    info!("BSIF feature extractor v{}", bsif_features::VERSION);

    if let Err(e) = run(&args) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = RunConfig::from_file(&args.config)?;

    let file_names = collect_file_names(&config)?;
    info!("Input set: {} images", file_names.len());

    let bank = FileFilterBank::new(&config.extraction.filter_dir);

    if args.dry_run {
        info!(
            "Dry run: configuration valid, {} jobs over {} images",
            config.extraction.jobs.len(),
            file_names.len()
        );
        return Ok(());
    }

    let total = config.extraction.jobs.len();
    for (index, job) in config.extraction.jobs.iter().enumerate() {
        info!(
            "Extracting set {} of {}: {}x{} with {} filters",
            index + 1,
            total,
            job.filter_size,
            job.filter_size,
            job.num_filters
        );
        let request = config.request(*job, file_names.clone());
        let summary = batch::extract(&request, &bank)?;
        info!(
            "Wrote {} histograms of {} bins to {}",
            summary.images, summary.bins, summary.store_name
        );
    }

    info!("Done. {} stores written", total);
    Ok(())
}

/// Assembles the run's image list: explicit files when configured,
/// otherwise the concatenated split files.
fn collect_file_names(config: &RunConfig) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    if !config.input.files.is_empty() {
        return Ok(config.input.files.clone());
    }
    let mut names = Vec::new();
    for path in config.input.split_paths() {
        let samples = dataset::load_split(&path)?;
        info!("Loaded split {}: {} samples", path.display(), samples.len());
        names.extend(dataset::splits::file_names(&samples));
    }
    Ok(names)
}
