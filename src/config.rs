use crate::classifier::ClassifierKind;
use crate::error::{Error, Result};
use crate::walker::ExclusionMode;
use std::path::PathBuf;

/// Default size threshold in megabytes.
pub const DEFAULT_THRESHOLD_MB: f64 = 0.1;

/// Directory marker excluded when none are configured.
pub const DEFAULT_EXCLUDED_MARKER: &str = "node_modules";

const DEFAULT_OUTPUT_FILE: &str = "output.txt";
const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Converts a threshold in megabytes to whole bytes.
///
/// The fractional byte is dropped. For integer file sizes `size > floor(t)`
/// holds exactly when `size > t`, so the strict comparison is unchanged.
///
/// # Errors
///
/// Returns a configuration error for negative or non-finite values.
pub fn threshold_mb_to_bytes(mb: f64) -> Result<u64> {
    if !mb.is_finite() || mb < 0.0 {
        return Err(Error::config(format!(
            "size threshold must be a non-negative number of MB, got {mb}"
        )));
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let bytes = (mb * BYTES_PER_MB).floor() as u64;
    Ok(bytes)
}

/// Configuration for one conversion run.
///
/// Use [`Config::builder()`] to construct a new configuration. A `Config`
/// is never mutated once a run has started.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Config {
    /// Repository root to convert
    pub root_dir: PathBuf,

    /// Path of the concatenated output file (truncated if it exists)
    pub output_file: PathBuf,

    /// Files larger than this many bytes are skipped unless `include_all`
    pub size_threshold_bytes: u64,

    /// Include every file regardless of size or type
    pub include_all: bool,

    /// Directory markers whose subtrees are not traversed
    pub excluded_dir_markers: Vec<String>,

    /// How markers are matched against directory paths
    pub exclusion_mode: ExclusionMode,

    /// Text/binary classification strategy
    pub classifier: ClassifierKind,
}

impl Config {
    /// Creates a new configuration builder.
    ///
    /// # Examples
    ///
    /// ```
    /// use git2txt::Config;
    ///
    /// let config = Config::builder()
    ///     .root_dir(".")
    ///     .output_file("repo.txt")
    ///     .threshold_mb(0.5)
    ///     .build()
    ///     .expect("valid configuration");
    ///
    /// assert_eq!(config.size_threshold_bytes, 524_288);
    /// ```
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Root directory doesn't exist or is not a directory
    /// - Output path is empty
    /// - An exclusion marker is empty
    pub fn validate(&self) -> Result<()> {
        if !self.root_dir.exists() {
            return Err(Error::invalid_root(&self.root_dir, "does not exist"));
        }

        if !self.root_dir.is_dir() {
            return Err(Error::invalid_root(&self.root_dir, "is not a directory"));
        }

        if self.output_file.as_os_str().is_empty() {
            return Err(Error::config("output file path must not be empty"));
        }

        if self.excluded_dir_markers.iter().any(String::is_empty) {
            return Err(Error::config(
                "excluded directory markers must not be empty strings",
            ));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("."),
            output_file: PathBuf::from(DEFAULT_OUTPUT_FILE),
            size_threshold_bytes: 104_857,
            include_all: false,
            excluded_dir_markers: vec![DEFAULT_EXCLUDED_MARKER.to_string()],
            exclusion_mode: ExclusionMode::default(),
            classifier: ClassifierKind::default(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum SizeThreshold {
    Megabytes(f64),
    Bytes(u64),
}

/// Builder for creating a [`Config`].
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    root_dir: Option<PathBuf>,
    output_file: Option<PathBuf>,
    size_threshold: Option<SizeThreshold>,
    include_all: bool,
    excluded_dir_markers: Option<Vec<String>>,
    exclusion_mode: Option<ExclusionMode>,
    classifier: Option<ClassifierKind>,
}

impl ConfigBuilder {
    /// Sets the repository root.
    #[must_use]
    pub fn root_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.root_dir = Some(path.into());
        self
    }

    /// Sets the output file path.
    #[must_use]
    pub fn output_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_file = Some(path.into());
        self
    }

    /// Sets the size threshold in megabytes (1 MB = 1024 * 1024 bytes).
    #[must_use]
    pub fn threshold_mb(mut self, mb: f64) -> Self {
        self.size_threshold = Some(SizeThreshold::Megabytes(mb));
        self
    }

    /// Sets the size threshold in bytes.
    #[must_use]
    pub fn size_threshold_bytes(mut self, bytes: u64) -> Self {
        self.size_threshold = Some(SizeThreshold::Bytes(bytes));
        self
    }

    /// Includes every file regardless of size or type.
    #[must_use]
    pub fn include_all(mut self, enabled: bool) -> Self {
        self.include_all = enabled;
        self
    }

    /// Replaces the excluded directory markers.
    ///
    /// An empty list disables directory exclusion.
    #[must_use]
    pub fn excluded_dir_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_dir_markers = Some(markers.into_iter().map(Into::into).collect());
        self
    }

    /// Sets how markers are matched.
    #[must_use]
    pub fn exclusion_mode(mut self, mode: ExclusionMode) -> Self {
        self.exclusion_mode = Some(mode);
        self
    }

    /// Sets the classification strategy.
    #[must_use]
    pub fn classifier(mut self, kind: ClassifierKind) -> Self {
        self.classifier = Some(kind);
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the threshold is invalid or validation fails.
    pub fn build(self) -> Result<Config> {
        let size_threshold_bytes = match self.size_threshold {
            Some(SizeThreshold::Bytes(bytes)) => bytes,
            Some(SizeThreshold::Megabytes(mb)) => threshold_mb_to_bytes(mb)?,
            None => threshold_mb_to_bytes(DEFAULT_THRESHOLD_MB)?,
        };

        let config = Config {
            root_dir: self.root_dir.unwrap_or_else(|| PathBuf::from(".")),
            output_file: self
                .output_file
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_FILE)),
            size_threshold_bytes,
            include_all: self.include_all,
            excluded_dir_markers: self
                .excluded_dir_markers
                .unwrap_or_else(|| vec![DEFAULT_EXCLUDED_MARKER.to_string()]),
            exclusion_mode: self.exclusion_mode.unwrap_or_default(),
            classifier: self.classifier.unwrap_or_default(),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let temp = assert_fs::TempDir::new().unwrap();
        let config = Config::builder().root_dir(temp.path()).build().unwrap();

        assert_eq!(config.size_threshold_bytes, 104_857);
        assert!(!config.include_all);
        assert_eq!(config.excluded_dir_markers, vec!["node_modules".to_string()]);
        assert_eq!(config.exclusion_mode, ExclusionMode::Segment);
        assert_eq!(config.classifier, ClassifierKind::Name);
    }

    #[test]
    fn test_default_matches_builder_default() {
        let builder_default = threshold_mb_to_bytes(DEFAULT_THRESHOLD_MB).unwrap();
        assert_eq!(Config::default().size_threshold_bytes, builder_default);
    }

    #[test]
    fn test_invalid_root_dir() {
        let result = Config::builder()
            .root_dir("/nonexistent/path/that/should/not/exist")
            .build();

        assert!(matches!(result, Err(Error::InvalidRoot { .. })));
    }

    #[test]
    fn test_root_must_be_directory() {
        let temp = assert_fs::TempDir::new().unwrap();
        let file = temp.path().join("file.txt");
        std::fs::write(&file, "x").unwrap();

        let result = Config::builder().root_dir(&file).build();
        assert!(matches!(result, Err(Error::InvalidRoot { .. })));
    }

    #[test]
    fn test_threshold_conversion() {
        assert_eq!(threshold_mb_to_bytes(0.0).unwrap(), 0);
        assert_eq!(threshold_mb_to_bytes(1.0).unwrap(), 1_048_576);
        assert_eq!(threshold_mb_to_bytes(2.5).unwrap(), 2_621_440);
        assert_eq!(threshold_mb_to_bytes(0.1).unwrap(), 104_857);
    }

    #[test]
    fn test_negative_threshold_rejected() {
        let temp = assert_fs::TempDir::new().unwrap();
        let result = Config::builder()
            .root_dir(temp.path())
            .threshold_mb(-1.0)
            .build();

        assert!(result.unwrap_err().is_config());
        assert!(threshold_mb_to_bytes(f64::NAN).is_err());
    }

    #[test]
    fn test_last_threshold_setter_wins() {
        let temp = assert_fs::TempDir::new().unwrap();
        let config = Config::builder()
            .root_dir(temp.path())
            .threshold_mb(1.0)
            .size_threshold_bytes(10)
            .build()
            .unwrap();

        assert_eq!(config.size_threshold_bytes, 10);
    }

    #[test]
    fn test_empty_marker_rejected() {
        let temp = assert_fs::TempDir::new().unwrap();
        let result = Config::builder()
            .root_dir(temp.path())
            .excluded_dir_markers(["node_modules", ""])
            .build();

        assert!(result.unwrap_err().is_config());
    }

    #[test]
    fn test_no_markers_allowed() {
        let temp = assert_fs::TempDir::new().unwrap();
        let config = Config::builder()
            .root_dir(temp.path())
            .excluded_dir_markers(Vec::<String>::new())
            .build()
            .unwrap();

        assert!(config.excluded_dir_markers.is_empty());
    }
}
