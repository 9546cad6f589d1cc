use anyhow::Result;
use regex::Regex;

use crate::error::SquashError;

/// A validated maximum-size target, e.g. "750KB"
///
/// The literal spec string drives the external compressor; the byte count is
/// only surfaced for logging.
#[derive(Debug, Clone, PartialEq)]
pub struct SizeSpec {
    pub spec: String,
    pub bytes: u64,
}

impl SizeSpec {
    /// Parse a human size string of the form `<number>(KB|MB|GB)`,
    /// case-insensitive, decimal values allowed. The byte count is truncated,
    /// not rounded.
    pub fn parse(spec: &str) -> Result<Self> {
        let pattern = Regex::new(r"(?i)^(\d+(?:\.\d+)?)(KB|MB|GB)$")?;

        let caps = pattern
            .captures(spec)
            .ok_or_else(|| SquashError::InvalidSizeFormat(spec.to_string()))?;

        let value: f64 = caps[1]
            .parse()
            .map_err(|_| SquashError::InvalidSizeFormat(spec.to_string()))?;

        let multiplier: u64 = match caps[2].to_ascii_uppercase().as_str() {
            "KB" => 1024,
            "MB" => 1024 * 1024,
            "GB" => 1024 * 1024 * 1024,
            _ => unreachable!("unit constrained by pattern"),
        };

        let bytes = (value * multiplier as f64) as u64;
        if bytes == 0 {
            return Err(SquashError::InvalidSizeFormat(spec.to_string()).into());
        }

        Ok(Self {
            spec: spec.to_string(),
            bytes,
        })
    }
}
