use crate::filter::SkipReason;
use serde::Serialize;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Per-reason breakdown of skipped files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SkipBreakdown {
    /// Larger than the size threshold
    pub oversized: usize,
    /// Classified as binary
    pub binary: usize,
    /// Not valid UTF-8
    pub invalid_utf8: usize,
    /// Could not be sized, opened or read
    pub unreadable: usize,
}

impl SkipBreakdown {
    /// Sum of all reasons.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.oversized + self.binary + self.invalid_utf8 + self.unreadable
    }
}

/// Final counters of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Files written to the output
    pub processed: usize,

    /// Files left out, for any reason
    pub skipped: usize,

    /// Why files were left out
    pub skip_reasons: SkipBreakdown,

    /// Total size in bytes of the processed files
    pub processed_bytes: u64,

    /// Bytes written to the output file
    pub output_bytes: u64,

    /// Output file path
    pub output_file: String,

    /// Wall-clock time of the run
    pub duration: Duration,

    /// Completion timestamp
    pub finished_at: String,
}

impl RunSummary {
    /// Number of files discovered outside excluded directories.
    #[must_use]
    pub const fn discovered(&self) -> usize {
        self.processed + self.skipped
    }

    /// Renders the summary as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Prints a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!("\n╔═══════════════════════════════════════════════════════╗");
        println!("║                   Conversion Summary                  ║");
        println!("╠═══════════════════════════════════════════════════════╣");
        println!(
            "║ Files Processed:      {:>8}                        ║",
            self.processed
        );
        println!(
            "║ Files Skipped:        {:>8}                        ║",
            self.skipped
        );
        println!(
            "║   - Too large:        {:>8}                        ║",
            self.skip_reasons.oversized
        );
        println!(
            "║   - Binary:           {:>8}                        ║",
            self.skip_reasons.binary
        );
        println!(
            "║   - Invalid UTF-8:    {:>8}                        ║",
            self.skip_reasons.invalid_utf8
        );
        println!(
            "║   - Unreadable:       {:>8}                        ║",
            self.skip_reasons.unreadable
        );
        println!("║                                                       ║");
        println!("║ Output File:                                          ║");
        println!("║   {}", self.output_file);
        println!(
            "║ Output Size:          {:>8} bytes                  ║",
            self.output_bytes
        );
        println!(
            "║ Total Time:           {:>8.2}s                     ║",
            self.duration.as_secs_f64()
        );
        println!("╚═══════════════════════════════════════════════════════╝\n");
    }
}

/// Tallies candidate outcomes during a run.
///
/// Each candidate must be recorded exactly once, as processed or skipped.
#[derive(Debug, Default)]
pub(crate) struct Reporter {
    processed: usize,
    processed_bytes: u64,
    skips: SkipBreakdown,
}

impl Reporter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_processed(&mut self, size_bytes: u64) {
        self.processed += 1;
        self.processed_bytes += size_bytes;
    }

    pub(crate) fn record_skipped(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::Oversized => self.skips.oversized += 1,
            SkipReason::Binary => self.skips.binary += 1,
            SkipReason::InvalidUtf8 => self.skips.invalid_utf8 += 1,
            SkipReason::Unreadable => self.skips.unreadable += 1,
        }
    }

    pub(crate) const fn processed(&self) -> usize {
        self.processed
    }

    pub(crate) const fn skipped(&self) -> usize {
        self.skips.total()
    }

    /// Logs the final counts and produces the summary.
    pub(crate) fn finish(self, output_file: &Path, output_bytes: u64, duration: Duration) -> RunSummary {
        let skipped = self.skipped();

        info!(
            "Processed {} files successfully ({} skipped)",
            self.processed, skipped
        );

        RunSummary {
            processed: self.processed,
            skipped,
            skip_reasons: self.skips,
            processed_bytes: self.processed_bytes,
            output_bytes,
            output_file: output_file.display().to_string(),
            duration,
            finished_at: chrono::Local::now()
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reporter_counts() {
        let mut reporter = Reporter::new();
        reporter.record_processed(100);
        reporter.record_processed(50);
        reporter.record_skipped(SkipReason::Binary);
        reporter.record_skipped(SkipReason::Oversized);
        reporter.record_skipped(SkipReason::InvalidUtf8);

        assert_eq!(reporter.processed(), 2);
        assert_eq!(reporter.skipped(), 3);

        let summary = reporter.finish(Path::new("out.txt"), 10, Duration::from_millis(5));
        assert_eq!(summary.processed, 2);
        assert_eq!(summary.skipped, 3);
        assert_eq!(summary.discovered(), 5);
        assert_eq!(summary.processed_bytes, 150);
        assert_eq!(
            summary.skip_reasons,
            SkipBreakdown {
                oversized: 1,
                binary: 1,
                invalid_utf8: 1,
                unreadable: 0,
            }
        );
    }

    #[test]
    fn test_empty_run() {
        let summary = Reporter::new().finish(Path::new("out.txt"), 0, Duration::ZERO);
        assert_eq!(summary.processed, 0);
        assert_eq!(summary.skipped, 0);
    }

    #[test]
    fn test_summary_json() {
        let mut reporter = Reporter::new();
        reporter.record_processed(1);
        reporter.record_skipped(SkipReason::Unreadable);

        let json = reporter
            .finish(Path::new("repo.txt"), 1, Duration::from_secs(1))
            .to_json()
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["processed"], 1);
        assert_eq!(value["skipped"], 1);
        assert_eq!(value["skip_reasons"]["unreadable"], 1);
        assert_eq!(value["output_file"], "repo.txt");
    }
}
