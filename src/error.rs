use std::path::PathBuf;
use thiserror::Error;

/// Errors the tool can report before any compression work starts
#[derive(Error, Debug)]
pub enum SquashError {
    #[error("invalid size format '{0}': expected <number>(KB|MB|GB), e.g. 750KB")]
    InvalidSizeFormat(String),

    #[error("no .jpg or .jpeg files found in {0:?}")]
    NoFilesFound(PathBuf),

    #[error("input directory does not exist: {0:?}")]
    InputDirNotFound(PathBuf),

    #[error("input path is not a directory: {0:?}")]
    NotADirectory(PathBuf),

    #[error("worker count must be at least 1")]
    InvalidJobCount,
}
