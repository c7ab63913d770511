use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using the library's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for git2txt.
///
/// Variants fall into two tiers. Fatal errors end a run and are returned to
/// the caller. Per-file errors ([`Error::Io`] and [`Error::InvalidUtf8`])
/// are absorbed by the pipeline and counted as skipped files.
#[derive(Error, Debug, Clone)]
#[non_exhaustive]
pub enum Error {
    /// IO error with context about the file path.
    #[error("IO error accessing '{path}': {message}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// Error message
        message: String,
    },

    /// Invalid UTF-8 encountered in file.
    #[error("Invalid UTF-8 encoding in file '{path}'")]
    InvalidUtf8 {
        /// Path to file with encoding issues
        path: PathBuf,
    },

    /// Repository root is missing, not a directory or unreadable.
    #[error("Invalid repository root '{path}': {reason}")]
    InvalidRoot {
        /// Root path as configured
        path: PathBuf,
        /// Why the root was rejected
        reason: String,
    },

    /// Output artifact could not be created or written.
    #[error("Cannot write output file '{path}': {message}")]
    Output {
        /// Output file path
        path: PathBuf,
        /// Error message
        message: String,
    },

    /// The directory walk itself failed.
    #[error("Failed to enumerate '{path}': {message}")]
    Walk {
        /// Directory that could not be listed
        path: PathBuf,
        /// Error message
        message: String,
    },

    /// Configuration validation error.
    #[error("Invalid configuration: {message}")]
    Config {
        /// Detailed error message
        message: String,
    },

    /// Local path is not a git checkout.
    #[error("The directory '{path}' is not a valid Git repository. It must contain a .git folder.")]
    NotARepository {
        /// Directory that was checked
        path: PathBuf,
    },

    /// Remote repository URL could not be understood.
    #[error("Invalid GitHub URL: {url}")]
    InvalidUrl {
        /// URL as given by the user
        url: String,
    },

    /// Cloning the remote repository failed.
    #[error("Failed to download repository '{url}': {message}")]
    Acquisition {
        /// Normalized repository URL
        url: String,
        /// Error message (usually the git client's stderr)
        message: String,
    },

    /// JSON serialization error.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message
        message: String,
    },
}

impl Error {
    /// Creates an IO error with path context.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// Creates an invalid UTF-8 error.
    #[must_use]
    pub fn invalid_utf8(path: impl Into<PathBuf>) -> Self {
        Self::InvalidUtf8 { path: path.into() }
    }

    /// Creates an invalid root error.
    #[must_use]
    pub fn invalid_root(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidRoot {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates an output error.
    #[must_use]
    pub fn output(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Output {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// Creates a walk error.
    #[must_use]
    pub fn walk(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Walk {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a not-a-repository error.
    #[must_use]
    pub fn not_a_repository(path: impl Into<PathBuf>) -> Self {
        Self::NotARepository { path: path.into() }
    }

    /// Creates an invalid URL error.
    #[must_use]
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Creates an acquisition error.
    #[must_use]
    pub fn acquisition(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Acquisition {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Returns true if this error only concerns a single file.
    ///
    /// Such errors are turned into skips by the pipeline instead of ending
    /// the run.
    #[must_use]
    pub const fn is_per_file(&self) -> bool {
        matches!(self, Self::Io { .. } | Self::InvalidUtf8 { .. })
    }

    /// Returns true if this is a configuration error.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. })
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization {
            message: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = Error::config("test message");
        assert!(err.is_config());
        assert!(err.to_string().contains("test message"));
    }

    #[test]
    fn test_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = Error::io("/tmp/test.txt", io_err);
        assert!(err.is_per_file());
        assert!(err.to_string().contains("/tmp/test.txt"));
    }

    #[test]
    fn test_fatal_errors_are_not_per_file() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert!(!Error::output("/tmp/out.txt", io_err).is_per_file());
        assert!(!Error::walk("/tmp/repo", "boom").is_per_file());
        assert!(!Error::invalid_root("/nope", "does not exist").is_per_file());
        assert!(Error::invalid_utf8("/tmp/broken.txt").is_per_file());
    }

    #[test]
    fn test_not_a_repository_message() {
        let err = Error::not_a_repository("/tmp/plain");
        assert!(err.to_string().contains(".git folder"));
    }

    #[test]
    fn test_serialization_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: Error = json_err.into();
        assert!(err.to_string().contains("Serialization error"));
    }

    #[test]
    fn test_error_clone() {
        let err = Error::acquisition("https://github.com/a/b", "fatal: repository not found");
        let cloned = err.clone();
        assert_eq!(err.to_string(), cloned.to_string());
    }
}
