//! File discovery for finding PNG files in the input directory.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::PipelineError;

/// Name suffix matched by discovery, compared case-sensitively like `*.png`.
pub const PNG_SUFFIX: &str = ".png";

/// Lists the PNG files sitting directly in one directory.
#[derive(Debug, Clone, Default)]
pub struct FileDiscovery;

/// Information about a discovered file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFile {
    /// Full path to the file
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
}

impl FileDiscovery {
    pub fn new() -> Self {
        Self
    }

    /// Discover all `.png` files directly inside `dir`.
    ///
    /// Subdirectories are not entered. An empty directory yields an empty list.
    pub fn discover(&self, dir: &Path) -> Result<Vec<DiscoveredFile>, PipelineError> {
        let mut files = Vec::new();

        for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| PipelineError::List {
                path: dir.to_path_buf(),
                message: e.to_string(),
            })?;

            let entry_path = entry.path();
            if !Self::is_png_name(entry_path) {
                continue;
            }
            // Follow symlinks so a linked PNG counts like a regular one.
            match std::fs::metadata(entry_path) {
                Ok(meta) if meta.is_file() => files.push(DiscoveredFile {
                    path: entry_path.to_path_buf(),
                    size: meta.len(),
                }),
                Ok(_) => {}
                Err(e) => {
                    tracing::debug!("Skipping {:?}: {}", entry_path, e);
                }
            }
        }

        // Sort by path for deterministic ordering
        files.sort_by(|a, b| a.path.cmp(&b.path));
        tracing::debug!("Discovered {} PNG file(s) in {:?}", files.len(), dir);
        Ok(files)
    }

    /// Check if a file name matches `*.png`, including a bare `.png`.
    fn is_png_name(path: &Path) -> bool {
        path.file_name()
            .is_some_and(|name| name.as_encoded_bytes().ends_with(PNG_SUFFIX.as_bytes()))
    }

    /// Get total size of all discovered files.
    pub fn total_size(files: &[DiscoveredFile]) -> u64 {
        files.iter().map(|f| f.size).sum()
    }
}
