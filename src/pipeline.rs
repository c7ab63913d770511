use crate::{
    classifier::Classifier,
    concat::Concatenator,
    config::Config,
    error::{Error, Result},
    file::{DiscoveredFile, FileCandidate},
    filter::{Decision, FileFilter, SkipReason},
    reader,
    report::{Reporter, RunSummary},
    walker::Walker,
};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};

/// What happened to one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Processed(u64),
    Skipped(SkipReason),
}

/// Converts a repository tree into a single concatenated text file.
///
/// A run walks the tree once, filters and reads every file in traversal
/// order and appends a record for each included file. Per-file problems
/// are counted as skips. Only an invalid root, an unwritable output file or
/// a failed directory listing abort the run.
#[derive(Debug)]
pub struct Pipeline {
    config: Config,
    filter: FileFilter,
}

impl Pipeline {
    /// Creates a new pipeline with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration validation fails.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let filter = FileFilter::new(&config);

        Ok(Self { config, filter })
    }

    /// Creates a pipeline with a custom text/binary classification strategy.
    ///
    /// The configured [`ClassifierKind`](crate::ClassifierKind) is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration validation fails.
    pub fn with_classifier(config: Config, classifier: Arc<dyn Classifier>) -> Result<Self> {
        config.validate()?;
        let filter = FileFilter::with_classifier(&config, classifier);

        Ok(Self { config, filter })
    }

    /// Returns the configuration of this pipeline.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Executes the conversion and returns the run summary.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The root directory is missing or not a directory
    /// - The output file cannot be created or written
    /// - A directory under the root cannot be listed
    ///
    /// On error the output file is closed but may hold a partial result.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use git2txt::{Config, Pipeline};
    ///
    /// # fn main() -> anyhow::Result<()> {
    /// let config = Config::builder()
    ///     .root_dir("./my-repo")
    ///     .output_file("my-repo.txt")
    ///     .build()?;
    ///
    /// let summary = Pipeline::new(config)?.run()?;
    /// println!("{} processed, {} skipped", summary.processed, summary.skipped);
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(skip(self), fields(root_dir = %self.config.root_dir.display()))]
    pub fn run(self) -> Result<RunSummary> {
        let start_time = Instant::now();

        let root = self.resolve_root()?;
        let mut concat = Concatenator::create(&self.config.output_file)?;

        let mut walker = Walker::new(&root, &self.config);
        if let Ok(output) = fs::canonicalize(&self.config.output_file) {
            walker = walker.ignore_file(output);
        }

        info!(
            "Converting {} into {}",
            root.display(),
            self.config.output_file.display()
        );

        let mut reporter = Reporter::new();
        self.convert(walker.files(), &mut concat, &mut reporter)?;

        let output_bytes = concat.bytes_written();
        concat.finish()?;

        debug!(
            "Finalized output: {} processed, {} skipped, {} bytes",
            reporter.processed(),
            reporter.skipped(),
            output_bytes
        );

        Ok(reporter.finish(&self.config.output_file, output_bytes, start_time.elapsed()))
    }

    /// Checks the root before the output file is touched.
    fn resolve_root(&self) -> Result<PathBuf> {
        let root = &self.config.root_dir;
        let resolved =
            fs::canonicalize(root).map_err(|e| Error::invalid_root(root, e.to_string()))?;

        if !resolved.is_dir() {
            return Err(Error::invalid_root(root, "is not a directory"));
        }

        fs::read_dir(&resolved)
            .map_err(|e| Error::invalid_root(root, format!("cannot be listed: {e}")))?;

        Ok(resolved)
    }

    /// Feeds discovered files through the pipeline in order.
    ///
    /// The first enumeration error stops the run and is returned as is.
    fn convert<I, W>(
        &self,
        files: I,
        concat: &mut Concatenator<W>,
        reporter: &mut Reporter,
    ) -> Result<()>
    where
        I: IntoIterator<Item = Result<DiscoveredFile>>,
        W: Write,
    {
        for discovered in files {
            let discovered = discovered.inspect_err(|e| error!("Aborting run: {e}"))?;

            match self.process(discovered, concat)? {
                Outcome::Processed(size) => reporter.record_processed(size),
                Outcome::Skipped(reason) => reporter.record_skipped(reason),
            }
        }

        Ok(())
    }

    /// Runs one file through filter, reader and concatenator.
    ///
    /// Only output write failures escape as errors.
    fn process<W: Write>(
        &self,
        discovered: DiscoveredFile,
        concat: &mut Concatenator<W>,
    ) -> Result<Outcome> {
        let relative = discovered.relative_path.clone();

        let candidate = match FileCandidate::from_discovered(discovered) {
            Ok(candidate) => candidate,
            Err(e) => return Ok(unreadable(&relative, &e)),
        };

        match self.filter.evaluate(&candidate) {
            Ok(Decision::Include) => {}
            Ok(Decision::Skip(reason)) => return Ok(Outcome::Skipped(reason)),
            Err(e) if e.is_per_file() => return Ok(unreadable(&relative, &e)),
            Err(e) => return Err(e),
        }

        let content = match reader::read_text(&candidate) {
            Ok(content) => content,
            Err(Error::InvalidUtf8 { .. }) => {
                warn!(
                    "Skipping file due to UTF-8 decode error: {}",
                    relative.display()
                );
                return Ok(Outcome::Skipped(SkipReason::InvalidUtf8));
            }
            Err(e) => return Ok(unreadable(&relative, &e)),
        };

        concat.append(&candidate, &content)?;
        debug!("Processed file: {}", relative.display());

        Ok(Outcome::Processed(candidate.size_bytes))
    }
}

fn unreadable(relative: &Path, err: &Error) -> Outcome {
    error!("Error processing {}: {}", relative.display(), err);
    Outcome::Skipped(SkipReason::Unreadable)
}
