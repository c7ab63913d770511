//! Basic example of using git2txt as a library
//!
//! Converts a local checkout into a single text file and prints the summary.
//!
//! Run with: `cargo run --example basic -- <path-to-repo>`

use git2txt::{logging, Config, GitClient, Pipeline, RepositorySource, Verbosity};
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    let path = std::env::args_os()
        .nth(1)
        .map_or_else(|| PathBuf::from("."), PathBuf::from);

    logging::scoped(Verbosity::Normal, || {
        let repository = RepositorySource::Local(path).acquire(&GitClient::default())?;

        let config = Config::builder()
            .root_dir(repository.root())
            .output_file(repository.default_output_file())
            .threshold_mb(0.5)
            .build()?;

        let summary = Pipeline::new(config)?.run()?;
        summary.print_summary();

        println!(
            "✓ Wrote {} of {} files to {}",
            summary.processed,
            summary.discovered(),
            summary.output_file
        );

        Ok(())
    })
}
