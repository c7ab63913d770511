//! Inclusion policy applied to every sized candidate.

use crate::classifier::Classifier;
use crate::config::Config;
use crate::error::Result;
use crate::file::FileCandidate;
use std::sync::Arc;
use tracing::debug;

/// Why a candidate did not make it into the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// Larger than the size threshold
    Oversized,
    /// Classified as binary
    Binary,
    /// Content is not valid UTF-8
    InvalidUtf8,
    /// Could not be sized, opened or read
    Unreadable,
}

/// Outcome of the inclusion policy for one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Read and append the candidate
    Include,
    /// Leave the candidate out
    Skip(SkipReason),
}

/// Size and type based inclusion policy.
#[derive(Debug, Clone)]
pub(crate) struct FileFilter {
    size_threshold_bytes: u64,
    include_all: bool,
    classifier: Arc<dyn Classifier>,
}

impl FileFilter {
    /// Creates a filter from configuration.
    pub(crate) fn new(config: &Config) -> Self {
        Self::with_classifier(config, config.classifier.create())
    }

    /// Creates a filter using a caller-provided classification strategy.
    pub(crate) fn with_classifier(config: &Config, classifier: Arc<dyn Classifier>) -> Self {
        Self {
            size_threshold_bytes: config.size_threshold_bytes,
            include_all: config.include_all,
            classifier,
        }
    }

    /// Decides whether a candidate goes into the output.
    ///
    /// `include_all` short-circuits both checks. Otherwise the size check
    /// runs first, so an oversized file is never classified.
    ///
    /// # Errors
    ///
    /// Propagates per-file errors from classifiers that read the file.
    pub(crate) fn evaluate(&self, candidate: &FileCandidate) -> Result<Decision> {
        if self.include_all {
            return Ok(Decision::Include);
        }

        if candidate.size_bytes > self.size_threshold_bytes {
            debug!(
                "Skipping large file: {} ({} bytes)",
                candidate.relative_path.display(),
                candidate.size_bytes
            );
            return Ok(Decision::Skip(SkipReason::Oversized));
        }

        if !self.classifier.is_text(candidate)? {
            debug!("Skipping binary file: {}", candidate.relative_path.display());
            return Ok(Decision::Skip(SkipReason::Binary));
        }

        Ok(Decision::Include)
    }
}
