//! # Picsquash - Batch JPEG Compression CLI
//!
//! A simple, parallel batch compression tool that squeezes every JPEG in a
//! folder below a target file size, delegating the pixel work to ImageMagick.
//!
//! ## Features
//!
//! - **Size-Targeted Compression**: Drives ImageMagick's `jpeg:extent` knob
//!   with the literal size spec you supply (e.g. `750KB`)
//! - **Bounded Parallelism**: Compresses up to N files at once (default 8)
//! - **Metadata Stripping**: Optionally removes all EXIF/GPS metadata
//! - **Resolution Preserving**: Never resizes; only recompresses
//! - **Failure Aggregation**: A corrupt file never aborts the rest of the
//!   batch; failures are summarized at the end
//!
//! ## Usage
//!
//! ```bash
//! # Compress every JPEG in photos/ to at most 750KB each
//! picsquash photos 750KB
//!
//! # Strip metadata, 4 workers, custom output folder
//! picsquash --strip-all -j 4 -o small_photos photos 1.5MB
//! ```

use anyhow::{bail, Result};
use clap::Parser;
use std::path::PathBuf;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use picsquash::config::{Config, DEFAULT_JOBS};
use picsquash::dispatch::{self, BatchSummary};
use picsquash::job::FileJob;
use picsquash::magick::MagickCompressor;
use picsquash::scan;

/// Picsquash - compress a folder of JPEGs to a maximum file size
#[derive(Parser)]
#[command(
    name = "picsquash",
    about = "A simple, parallel batch JPEG compression CLI tool",
    long_about = "Compresses every .jpg/.jpeg in a folder below a target file size using ImageMagick, preserving resolution.",
    version
)]
struct Cli {
    /// Folder containing the JPEG files to compress
    input_folder: PathBuf,

    /// Maximum output file size, e.g. 750KB, 1.5MB, 1GB
    #[arg(allow_hyphen_values = true)]
    max_size: String,

    /// Output directory (default: <input_folder>_compressed)
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Strip all embedded metadata (EXIF, GPS, ...)
    #[arg(long)]
    strip_all: bool,

    /// Number of parallel compression workers
    #[arg(long, short = 'j', default_value_t = DEFAULT_JOBS)]
    jobs: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "picsquash=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!("Command failed: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::new(
        cli.input_folder,
        &cli.max_size,
        cli.output,
        cli.strip_all,
        cli.jobs,
    )?;

    info!(
        "Target size: {} ({} bytes), workers: {}",
        config.size.spec, config.size.bytes, config.parallelism
    );

    let images = scan::collect_images(&config.input_dir)?;

    // Created once, before dispatch; workers only write distinct files inside
    tokio::fs::create_dir_all(&config.output_dir).await?;
    info!("Writing compressed files to: {:?}", config.output_dir);

    let jobs: Vec<FileJob> = images
        .into_iter()
        .map(|source| FileJob::new(source, &config.output_dir))
        .collect();

    let compressor = MagickCompressor::new(&config);

    let summary = tokio::select! {
        summary = dispatch::run_batch(jobs, &compressor, config.parallelism) => summary,
        _ = signal::ctrl_c() => {
            bail!("Interrupted. In-flight compressions were aborted.");
        }
    };

    report(&summary)
}

fn report(summary: &BatchSummary) -> Result<()> {
    info!(
        "✅ Compressed {} of {} file(s).",
        summary.completed.len(),
        summary.total()
    );

    if !summary.is_success() {
        for failure in &summary.failed {
            error!("❌ {}: {:#}", failure.file_name, failure.error);
        }
        bail!(
            "{} of {} file(s) failed to compress",
            summary.failed.len(),
            summary.total()
        );
    }

    Ok(())
}
