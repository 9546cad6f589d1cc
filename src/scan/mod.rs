use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::SquashError;

/// Extensions considered JPEG images, compared case-insensitively
const JPEG_EXTENSIONS: [&str; 2] = ["jpg", "jpeg"];

/// Collect the JPEG files directly inside `input_dir` (non-recursive),
/// sorted by file name for reproducible output.
pub fn collect_images(input_dir: &Path) -> Result<Vec<PathBuf>> {
    if !input_dir.exists() {
        return Err(SquashError::InputDirNotFound(input_dir.to_path_buf()).into());
    }

    if !input_dir.is_dir() {
        return Err(SquashError::NotADirectory(input_dir.to_path_buf()).into());
    }

    info!("🔎 Scanning directory: {:?}", input_dir);

    let mut images = Vec::new();

    for entry in WalkDir::new(input_dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let is_jpeg = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                JPEG_EXTENSIONS
                    .iter()
                    .any(|known| ext.eq_ignore_ascii_case(known))
            })
            .unwrap_or(false);

        if is_jpeg {
            images.push(path.to_path_buf());
        } else {
            debug!("Skipping non-JPEG entry: {:?}", path);
        }
    }

    if images.is_empty() {
        return Err(SquashError::NoFilesFound(input_dir.to_path_buf()).into());
    }

    info!("Found {} JPEG file(s) to compress.", images.len());
    Ok(images)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_collects_jpegs_case_insensitively() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.jpg"), "").unwrap();
        fs::write(temp_dir.path().join("b.JPEG"), "").unwrap();
        fs::write(temp_dir.path().join("c.png"), "").unwrap();

        let images = collect_images(temp_dir.path()).unwrap();
        let names: Vec<_> = images
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();

        assert_eq!(names, vec!["a.jpg", "b.JPEG"]);
    }

    #[test]
    fn test_deterministic_lexicographic_order() {
        let temp_dir = TempDir::new().unwrap();
        for name in ["zebra.jpg", "apple.jpg", "mango.jpeg"] {
            fs::write(temp_dir.path().join(name), "").unwrap();
        }

        let images = collect_images(temp_dir.path()).unwrap();
        let names: Vec<_> = images
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();

        assert_eq!(names, vec!["apple.jpg", "mango.jpeg", "zebra.jpg"]);
    }

    #[test]
    fn test_non_recursive() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("nested")).unwrap();
        fs::write(temp_dir.path().join("nested/deep.jpg"), "").unwrap();
        fs::write(temp_dir.path().join("top.jpg"), "").unwrap();

        let images = collect_images(temp_dir.path()).unwrap();
        assert_eq!(images.len(), 1);
        assert!(images[0].ends_with("top.jpg"));
    }

    #[test]
    fn test_empty_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let result = collect_images(temp_dir.path());
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("no .jpg or .jpeg files found"));
    }

    #[test]
    fn test_nonexistent_directory_fails() {
        let result = collect_images(Path::new("/nonexistent/path"));
        assert!(result.is_err());
    }

    #[test]
    fn test_file_without_extension_skipped() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("README"), "").unwrap();
        fs::write(temp_dir.path().join("photo.jpg"), "").unwrap();

        let images = collect_images(temp_dir.path()).unwrap();
        assert_eq!(images.len(), 1);
    }
}
