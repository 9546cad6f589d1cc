use anyhow::{anyhow, Context, Result};
use futures::stream::{self, StreamExt};
use tracing::{error, info};

use crate::job::{CompressionResult, FileJob};
use crate::magick::Compressor;

/// One job that did not produce an output file
#[derive(Debug)]
pub struct JobFailure {
    pub file_name: String,
    pub error: anyhow::Error,
}

/// Outcome of a whole batch run
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub completed: Vec<CompressionResult>,
    pub failed: Vec<JobFailure>,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.completed.len() + self.failed.len()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Run one compression task per job with at most `parallelism` in flight.
/// A failing job never aborts its siblings; failures are collected into the
/// summary and reported after the whole batch has drained.
pub async fn run_batch<C: Compressor>(
    jobs: Vec<FileJob>,
    compressor: &C,
    parallelism: usize,
) -> BatchSummary {
    let outcomes: Vec<Result<CompressionResult, JobFailure>> = stream::iter(jobs)
        .map(|job| async move {
            let file_name = job.file_name();
            process_job(&job, compressor).await.map_err(|error| {
                error!("❌ Compression FAILED for {}: {:#}", file_name, error);
                JobFailure { file_name, error }
            })
        })
        .buffer_unordered(parallelism)
        .collect()
        .await;

    let mut summary = BatchSummary::default();
    for outcome in outcomes {
        match outcome {
            Ok(result) => summary.completed.push(result),
            Err(failure) => summary.failed.push(failure),
        }
    }

    summary
}

/// Compress one file and report its before/after sizes
async fn process_job<C: Compressor>(job: &FileJob, compressor: &C) -> Result<CompressionResult> {
    let before_bytes = tokio::fs::metadata(&job.source_path)
        .await
        .with_context(|| format!("failed to read source file: {:?}", job.source_path))?
        .len();

    compressor.compress(&job.source_path, &job.dest_path).await?;

    let after_bytes = tokio::fs::metadata(&job.dest_path)
        .await
        .map_err(|_| anyhow!("compressor produced no output file: {:?}", job.dest_path))?
        .len();

    let result = CompressionResult {
        file_name: job.file_name(),
        before_bytes,
        after_bytes,
    };

    info!(
        "{}: {}KB → {}KB",
        result.file_name,
        result.before_kb(),
        result.after_kb()
    );

    Ok(result)
}
