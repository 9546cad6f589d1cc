use anyhow::{anyhow, Result};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, error};

use crate::config::Config;

/// The single capability the batch needs from an image tool: squeeze one
/// file below the target size without touching its resolution. Tests swap in
/// an instrumented stub.
pub trait Compressor: Send + Sync {
    fn compress(
        &self,
        source: &Path,
        dest: &Path,
    ) -> impl Future<Output = Result<()>> + Send;
}

/// ImageMagick wrapper for JPEG size-targeted compression
pub struct MagickCompressor {
    size_spec: String,
    strip_metadata: bool,
}

impl MagickCompressor {
    pub fn new(config: &Config) -> Self {
        Self {
            size_spec: config.size.spec.clone(),
            strip_metadata: config.strip_metadata,
        }
    }

    /// Build the per-file `magick` invocation. The size target is handed to
    /// the tool as the literal user-supplied spec string; chroma subsampling
    /// is fixed at 4:2:0.
    fn build_command(&self, source: &Path, temp_dest: &Path) -> Command {
        let mut cmd = Command::new("magick");
        cmd.arg(source);
        cmd.args(["-sampling-factor", "4:2:0"]);

        if self.strip_metadata {
            cmd.arg("-strip");
        }

        cmd.args(["-define", &format!("jpeg:extent={}", self.size_spec)]);

        // The temp file lacks a .jpg suffix, so the encoder is forced
        // explicitly.
        cmd.arg(format!("jpg:{}", temp_dest.display()));

        cmd
    }

    /// Temp path next to the destination; renamed into place on success so an
    /// interrupted run never leaves a half-written output file
    fn temp_path(dest: &Path) -> PathBuf {
        let ext = dest
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        dest.with_extension(format!("{ext}.part"))
    }
}

impl Compressor for MagickCompressor {
    async fn compress(&self, source: &Path, dest: &Path) -> Result<()> {
        if !source.exists() {
            return Err(anyhow!("Input file does not exist: {source:?}"));
        }

        let temp_dest = Self::temp_path(dest);

        let mut cmd = self.build_command(source, &temp_dest);
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);

        debug!("Executing magick command: {:?}", cmd);

        let output = cmd.output().await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!("magick failed on {:?}: {}", source, stderr);
            let _ = tokio::fs::remove_file(&temp_dest).await;
            return Err(anyhow!("magick failed on {source:?}: {stderr}"));
        }

        tokio::fs::rename(&temp_dest, dest).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_JOBS;
    use std::path::PathBuf;

    fn test_config(strip: bool) -> Config {
        Config::new(PathBuf::from("photos"), "750KB", None, strip, DEFAULT_JOBS).unwrap()
    }

    fn rendered_args(cmd: &Command) -> Vec<String> {
        cmd.as_std()
            .get_args()
            .map(|a| a.to_string_lossy().to_string())
            .collect()
    }

    #[test]
    fn test_command_carries_literal_size_spec() {
        let compressor = MagickCompressor::new(&test_config(false));
        let cmd = compressor.build_command(Path::new("in.jpg"), Path::new("out.jpg.part"));

        let args = rendered_args(&cmd);
        assert_eq!(cmd.as_std().get_program(), "magick");
        assert!(args.contains(&"jpeg:extent=750KB".to_string()));
        assert!(!args.contains(&"-strip".to_string()));
    }

    #[test]
    fn test_chroma_subsampling_always_420() {
        let compressor = MagickCompressor::new(&test_config(true));
        let cmd = compressor.build_command(Path::new("in.jpg"), Path::new("out.jpg.part"));

        let args = rendered_args(&cmd);
        let pos = args
            .iter()
            .position(|a| a == "-sampling-factor")
            .expect("sampling factor flag present");
        assert_eq!(args[pos + 1], "4:2:0");
    }

    #[test]
    fn test_strip_flag_included_when_requested() {
        let compressor = MagickCompressor::new(&test_config(true));
        let cmd = compressor.build_command(Path::new("in.jpg"), Path::new("out.jpg.part"));

        assert!(rendered_args(&cmd).contains(&"-strip".to_string()));
    }

    #[test]
    fn test_output_format_forced_for_temp_file() {
        let compressor = MagickCompressor::new(&test_config(false));
        let cmd = compressor.build_command(Path::new("in.jpg"), Path::new("out/a.jpg.part"));

        let args = rendered_args(&cmd);
        assert_eq!(args.last().unwrap(), "jpg:out/a.jpg.part");
    }

    #[test]
    fn test_temp_path_appends_part() {
        assert_eq!(
            MagickCompressor::temp_path(Path::new("out/IMG.jpg")),
            PathBuf::from("out/IMG.jpg.part")
        );
        // .jpg and .jpeg siblings must not collide on a shared temp name
        assert_ne!(
            MagickCompressor::temp_path(Path::new("out/a.jpg")),
            MagickCompressor::temp_path(Path::new("out/a.jpeg"))
        );
    }

    #[tokio::test]
    async fn test_missing_input_is_an_error() {
        let compressor = MagickCompressor::new(&test_config(false));
        let result = compressor
            .compress(Path::new("/nonexistent/in.jpg"), Path::new("/tmp/out.jpg"))
            .await;
        assert!(result.is_err());
    }
}
