//! Text/binary classification strategies.
//!
//! The default strategy looks at the file name only. A content-sniffing
//! strategy is available for callers who prefer fewer misclassifications
//! over never touching file bytes during filtering.

use crate::error::{Error, Result};
use crate::file::FileCandidate;
use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::Arc;

/// Extensions treated as text when the MIME table has no entry for a file.
static FALLBACK_TEXT_EXTENSIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "txt", "js", "py", "html", "css", "md", "json", "xml", "yaml", "yml", "c", "cpp", "h",
        "hpp", "java", "go", "sh", "rb", "php",
    ]
    .into_iter()
    .collect()
});

/// Catch-all type the MIME table uses for extensions it cannot name.
const GENERIC_BINARY_MIME: &str = "application/octet-stream";

/// Which classification strategy to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClassifierKind {
    /// MIME table lookup on the file name with an extension fallback
    #[default]
    Name,
    /// Inspect the first bytes of the file
    Content,
}

impl ClassifierKind {
    /// Creates a new classifier instance of this kind.
    #[must_use]
    pub fn create(self) -> Arc<dyn Classifier> {
        match self {
            Self::Name => Arc::new(MimeClassifier),
            Self::Content => Arc::new(ContentClassifier),
        }
    }
}

impl fmt::Display for ClassifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name => f.write_str("name"),
            Self::Content => f.write_str("content"),
        }
    }
}

/// Decides whether a candidate file holds text.
///
/// Implementations must be deterministic for an unchanged file.
pub trait Classifier: Send + Sync + fmt::Debug {
    /// Returns `true` if the candidate should be treated as text.
    ///
    /// # Errors
    ///
    /// Strategies that read the file return [`Error::Io`] when it cannot
    /// be read. Name-based strategies never fail.
    fn is_text(&self, candidate: &FileCandidate) -> Result<bool>;
}

/// Name-only heuristic backed by the `mime_guess` table.
///
/// A guessed MIME type decides on its own: text iff it starts with
/// `text/`. Names without a specific type (unknown, or the generic
/// `application/octet-stream`) fall back to a small allow-list of common
/// source extensions. File bytes are never read.
#[derive(Debug, Clone, Copy, Default)]
pub struct MimeClassifier;

impl MimeClassifier {
    /// Classifies a path by name.
    #[must_use]
    pub fn classify(path: &Path) -> bool {
        match mime_guess::from_path(path).first_raw() {
            Some(mime) if mime != GENERIC_BINARY_MIME => mime.starts_with("text/"),
            _ => has_fallback_text_extension(path),
        }
    }
}

impl Classifier for MimeClassifier {
    fn is_text(&self, candidate: &FileCandidate) -> Result<bool> {
        Ok(Self::classify(&candidate.relative_path))
    }
}

/// Content sniffing on the first 8 KiB of a file.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentClassifier;

impl Classifier for ContentClassifier {
    fn is_text(&self, candidate: &FileCandidate) -> Result<bool> {
        is_likely_binary(&candidate.absolute_path).map(|binary| !binary)
    }
}

/// Checks the lowercase extension against the fallback allow-list.
#[must_use]
pub(crate) fn has_fallback_text_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| FALLBACK_TEXT_EXTENSIONS.contains(ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Determines if a file is likely binary by analyzing its content.
///
/// # Algorithm
///
/// 1. Reads the first 8KB of the file
/// 2. Checks for null bytes (binary indicator)
/// 3. Calculates the ratio of ASCII characters
/// 4. Files with null bytes or low ASCII ratio are considered binary
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read.
pub(crate) fn is_likely_binary(path: &Path) -> Result<bool> {
    const BUFFER_SIZE: usize = 8192;
    const ASCII_THRESHOLD: f64 = 0.85;

    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let mut reader = BufReader::with_capacity(BUFFER_SIZE, file);
    let mut buffer = [0u8; BUFFER_SIZE];

    let bytes_read = reader.read(&mut buffer).map_err(|e| Error::io(path, e))?;

    if bytes_read == 0 {
        return Ok(false);
    }

    let sample = &buffer[..bytes_read];

    if memchr::memchr(0, sample).is_some() {
        return Ok(true);
    }

    let ascii_count = sample.iter().filter(|&&b| b < 128).count();
    let ascii_ratio = ascii_count as f64 / bytes_read as f64;

    Ok(ascii_ratio < ASCII_THRESHOLD)
}
