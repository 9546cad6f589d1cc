use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::error::SquashError;
use crate::size::SizeSpec;

/// Default number of concurrent compression workers
pub const DEFAULT_JOBS: usize = 8;

/// Immutable run configuration, built once from the command line and shared
/// read-only with every worker
#[derive(Debug, Clone)]
pub struct Config {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub size: SizeSpec,
    pub strip_metadata: bool,
    pub parallelism: usize,
}

impl Config {
    pub fn new(
        input_dir: PathBuf,
        max_size: &str,
        output_dir: Option<PathBuf>,
        strip_metadata: bool,
        parallelism: usize,
    ) -> Result<Self> {
        if parallelism == 0 {
            return Err(SquashError::InvalidJobCount.into());
        }

        let size = SizeSpec::parse(max_size)?;
        let output_dir = output_dir.unwrap_or_else(|| default_output_dir(&input_dir));

        Ok(Self {
            input_dir,
            output_dir,
            size,
            strip_metadata,
            parallelism,
        })
    }
}

/// Default output directory: the input folder with a `_compressed` suffix,
/// trailing path separators stripped first
fn default_output_dir(input_dir: &Path) -> PathBuf {
    let trimmed = input_dir
        .to_string_lossy()
        .trim_end_matches(['/', '\\'])
        .to_string();
    PathBuf::from(format!("{trimmed}_compressed"))
}
