//! Project manifest (pixfx.yaml) parsing.
//!
//! The manifest carries batch defaults: where to read images from, where to
//! write them, and which files to skip. Command-line flags override anything
//! set here.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::effects::ResampleFilter;
use crate::error::{FxError, Result};

/// Manifest file name looked up in the working directory.
pub const MANIFEST_FILE: &str = "pixfx.yaml";

/// Batch defaults loaded from pixfx.yaml.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Manifest {
    /// Directory scanned for source images.
    pub src: Option<PathBuf>,

    /// Directory processed images are written to.
    pub output: Option<PathBuf>,

    /// Default resample filter.
    pub filter: Option<ResampleFilter>,

    /// Force outputs to this file type (`png` or `jpg`).
    pub filetype: Option<String>,

    /// File name patterns to skip.
    pub excludes: Vec<String>,
}

impl Manifest {
    /// Load a manifest from a pixfx.yaml file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| FxError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read manifest: {}", e),
        })?;

        Self::parse(&content)
    }

    /// Parse a manifest from a YAML string.
    pub fn parse(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| FxError::Config {
            message: format!("Invalid manifest: {}", e),
            help: Some("Check pixfx.yaml syntax".to_string()),
        })
    }

    /// Load the manifest from `dir` when one exists there.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let path = dir.join(MANIFEST_FILE);
        if path.is_file() {
            Ok(Some(Self::load(&path)?))
        } else {
            Ok(None)
        }
    }

    /// Check whether a path matches one of the exclude patterns.
    pub fn is_excluded(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();
        self.excludes
            .iter()
            .any(|pattern| matches_pattern(&path_str, pattern))
    }
}

/// Simple glob matching: `*suffix` matches an ending, `dir/*` matches a
/// directory's contents, anything else matches by substring.
fn matches_pattern(path: &str, pattern: &str) -> bool {
    let pattern = pattern.strip_prefix("**/").unwrap_or(pattern);

    if let Some(suffix) = pattern.strip_prefix('*') {
        if !pattern.contains('/') {
            return path.ends_with(suffix);
        }
    }

    if let Some(dir) = pattern.strip_suffix("/*") {
        return path.starts_with(&format!("{}/", dir)) || path.contains(&format!("/{}/", dir));
    }

    path.contains(pattern)
}
