use std::path::{Path, PathBuf};

/// One image file to compress: source plus its flat destination in the
/// output directory
#[derive(Debug, Clone, PartialEq)]
pub struct FileJob {
    pub source_path: PathBuf,
    pub dest_path: PathBuf,
}

impl FileJob {
    /// Create a job for a source image; the destination keeps the source's
    /// base name, placed flat in `output_dir`
    pub fn new(source_path: PathBuf, output_dir: &Path) -> Self {
        let file_name = source_path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        let dest_path = output_dir.join(file_name);

        Self {
            source_path,
            dest_path,
        }
    }

    /// Base name of the source file, for log lines
    pub fn file_name(&self) -> String {
        self.source_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.source_path.to_string_lossy().to_string())
    }
}

/// Before/after byte sizes for one successfully compressed file
#[derive(Debug, Clone, PartialEq)]
pub struct CompressionResult {
    pub file_name: String,
    pub before_bytes: u64,
    pub after_bytes: u64,
}

impl CompressionResult {
    /// Source size in whole kilobytes (floor)
    pub fn before_kb(&self) -> u64 {
        self.before_bytes / 1024
    }

    /// Output size in whole kilobytes (floor)
    pub fn after_kb(&self) -> u64 {
        self.after_bytes / 1024
    }
}
