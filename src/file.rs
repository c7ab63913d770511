use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// A file found by the walker, before it has been sized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFile {
    /// Absolute path to the file
    pub absolute_path: PathBuf,

    /// Path relative to the repository root
    pub relative_path: PathBuf,
}

impl DiscoveredFile {
    /// Creates a discovered file from an absolute path under `root`.
    #[must_use]
    pub fn new(absolute_path: PathBuf, root: &Path) -> Self {
        let relative_path = pathdiff::diff_paths(&absolute_path, root)
            .unwrap_or_else(|| absolute_path.clone());

        Self {
            absolute_path,
            relative_path,
        }
    }
}

/// A discovered file together with its size, under consideration for
/// inclusion in the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    /// Absolute path to the file
    pub absolute_path: PathBuf,

    /// Path relative to the repository root
    pub relative_path: PathBuf,

    /// File size in bytes (symlinks are followed)
    pub size_bytes: u64,
}

impl FileCandidate {
    /// Creates a candidate with a known size.
    #[must_use]
    pub fn new(absolute_path: PathBuf, relative_path: PathBuf, size_bytes: u64) -> Self {
        Self {
            absolute_path,
            relative_path,
            size_bytes,
        }
    }

    /// Sizes a discovered file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file's metadata cannot be read, e.g. it
    /// vanished or is a dangling symlink.
    pub fn from_discovered(file: DiscoveredFile) -> Result<Self> {
        let metadata =
            fs::metadata(&file.absolute_path).map_err(|e| Error::io(&file.absolute_path, e))?;

        Ok(Self {
            absolute_path: file.absolute_path,
            relative_path: file.relative_path,
            size_bytes: metadata.len(),
        })
    }

    /// Returns the size in kibibytes.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn size_kb(&self) -> f64 {
        self.size_bytes as f64 / 1024.0
    }
}
