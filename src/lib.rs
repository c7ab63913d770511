//! # git2txt
//!
//! Converts a git repository into a single plain-text file.
//!
//! ## Features
//!
//! - Deterministic traversal, files before subdirectories, sorted by name
//! - Excluded directory markers (`node_modules` by default)
//! - Size threshold and text/binary classification, with an override
//! - Local checkouts or shallow clones of GitHub repositories
//! - Per-file failures are counted, never fatal
//!
//! ## Quick Start
//!
//! ```no_run
//! use git2txt::{Config, Pipeline};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = Config::builder()
//!     .root_dir("./my-repo")
//!     .output_file("my-repo.txt")
//!     .threshold_mb(0.5)
//!     .build()?;
//!
//! let summary = Pipeline::new(config)?.run()?;
//! summary.print_summary();
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! A run is a single pass over the tree:
//! 1. **Walker**: Enumerates files, pruning excluded directories
//! 2. **Filter**: Applies the size threshold and the classifier
//! 3. **Reader**: Decodes included files as UTF-8
//! 4. **Concatenator**: Appends a header and the content to the output
//! 5. **Reporter**: Counts processed and skipped files

#![warn(
    missing_docs,
    rust_2018_idioms,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
#![allow(clippy::module_name_repetitions)]

mod classifier;
mod concat;
mod config;
mod error;
mod file;
mod filter;
mod pipeline;
mod reader;
mod report;
mod source;
mod walker;

pub mod logging;

pub use classifier::{Classifier, ClassifierKind, ContentClassifier, MimeClassifier};
pub use concat::record_header;
pub use config::{
    threshold_mb_to_bytes, Config, ConfigBuilder, DEFAULT_EXCLUDED_MARKER, DEFAULT_THRESHOLD_MB,
};
pub use error::{Error, Result};
pub use file::{DiscoveredFile, FileCandidate};
pub use filter::{Decision, SkipReason};
pub use logging::Verbosity;
pub use pipeline::Pipeline;
pub use report::{RunSummary, SkipBreakdown};
pub use source::{
    normalize_github_url, repository_name, AcquiredRepository, GitClient, RepositorySource,
};
pub use walker::ExclusionMode;

/// Runs the complete conversion with the given configuration.
///
/// This is the main entry point for the library.
///
/// # Errors
///
/// Returns an error if:
/// - Configuration is invalid
/// - Root directory doesn't exist or is not a directory
/// - Output file cannot be created or written
/// - A directory under the root cannot be listed
///
/// # Examples
///
/// ```no_run
/// use git2txt::{Config, run};
///
/// # fn main() -> anyhow::Result<()> {
/// let config = Config::builder()
///     .root_dir(".")
///     .build()?;
///
/// let summary = run(config)?;
/// assert_eq!(summary.discovered(), summary.processed + summary.skipped);
/// # Ok(())
/// # }
/// ```
pub fn run(config: Config) -> Result<RunSummary> {
    Pipeline::new(config)?.run()
}
