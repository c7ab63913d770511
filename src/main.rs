use anyhow::{bail, Context};
use clap::{ArgGroup, Parser};
use git2txt::{
    logging, ClassifierKind, Config, ExclusionMode, GitClient, Pipeline, RepositorySource,
    Verbosity, DEFAULT_EXCLUDED_MARKER, DEFAULT_THRESHOLD_MB,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(
    name = "git2txt",
    version,
    author,
    about = "Convert a git repository into a single text file",
    long_about = "Convert a git repository into a single plain-text file.\n\n\
    Every text file under the repository root is appended to the output with a \
    short header naming its path and size. Binary files, oversized files and \
    excluded directories are skipped.\n\n\
    USAGE EXAMPLES:\n  \
      # Convert a GitHub repository\n  \
      git2txt owner/repo\n\n  \
      # Convert a local checkout\n  \
      git2txt --local-path ./my-project --output project.txt\n\n  \
      # Include everything that decodes as UTF-8\n  \
      git2txt owner/repo --include-all",
    group(ArgGroup::new("source").required(true).args(["repo_url", "local_path"]))
)]
struct Cli {
    /// GitHub repository URL or owner/repo shorthand
    #[arg(value_name = "REPO_URL")]
    repo_url: Option<String>,

    /// Path to a local git repository
    #[arg(short, long, value_name = "PATH")]
    local_path: Option<PathBuf>,

    /// Output file (defaults to <repository name>.txt)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// File size threshold in MB
    #[arg(short, long, default_value_t = DEFAULT_THRESHOLD_MB, value_name = "MB")]
    threshold: f64,

    /// Include all files regardless of size or type
    #[arg(long)]
    include_all: bool,

    /// Enable debug output
    #[arg(long)]
    debug: bool,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, conflicts_with_all = ["debug", "verbose"])]
    quiet: bool,

    /// Directory marker to exclude (can be used multiple times)
    ///
    /// Any value given here replaces the default `node_modules` marker.
    /// Pass it again explicitly to keep it excluded.
    #[arg(
        long = "exclude-dir",
        value_name = "MARKER",
        value_delimiter = ',',
        default_value = DEFAULT_EXCLUDED_MARKER
    )]
    exclude_dir: Vec<String>,

    /// Exclude any directory whose relative path contains a marker
    #[arg(long)]
    substring_exclusion: bool,

    /// Text/binary classification strategy
    #[arg(long, value_enum, default_value = "name")]
    classifier: CliClassifier,

    /// Git executable used for cloning
    #[arg(long, env = "GIT2TXT_GIT", default_value = "git", value_name = "PATH")]
    git_binary: PathBuf,

    /// Print the run summary as JSON
    #[arg(long)]
    json_summary: bool,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliClassifier {
    /// MIME type guessed from the file name
    Name,
    /// Inspect the first bytes of each file
    Content,
}

impl From<CliClassifier> for ClassifierKind {
    fn from(c: CliClassifier) -> Self {
        match c {
            CliClassifier::Name => Self::Name,
            CliClassifier::Content => Self::Content,
        }
    }
}

impl Cli {
    fn source(&self) -> anyhow::Result<RepositorySource> {
        match (&self.repo_url, &self.local_path) {
            (Some(url), None) => Ok(RepositorySource::Remote(url.clone())),
            (None, Some(path)) => Ok(RepositorySource::Local(path.clone())),
            _ => bail!("exactly one of REPO_URL or --local-path is required"),
        }
    }

    const fn exclusion_mode(&self) -> ExclusionMode {
        if self.substring_exclusion {
            ExclusionMode::Substring
        } else {
            ExclusionMode::Segment
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbosity = Verbosity::from_flags(cli.quiet, cli.debug, cli.verbose);

    logging::scoped(verbosity, || match execute(cli, verbosity) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("An error occurred: {e:#}");
            ExitCode::FAILURE
        }
    })
}

fn execute(cli: Cli, verbosity: Verbosity) -> anyhow::Result<()> {
    let source = cli.source()?;
    let git = GitClient::new(cli.git_binary.clone());

    let repository = source
        .acquire(&git)
        .context("Failed to acquire repository")?;

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| repository.default_output_file());

    let config = Config::builder()
        .root_dir(repository.root())
        .output_file(output.clone())
        .threshold_mb(cli.threshold)
        .include_all(cli.include_all)
        .excluded_dir_markers(cli.exclude_dir.clone())
        .exclusion_mode(cli.exclusion_mode())
        .classifier(cli.classifier.into())
        .build()
        .context("Failed to build configuration")?;

    let summary = Pipeline::new(config)
        .context("Failed to create pipeline")?
        .run()
        .context("Conversion failed")?;

    if cli.json_summary {
        println!("{}", summary.to_json()?);
    } else if verbosity != Verbosity::Quiet {
        summary.print_summary();
    }

    info!("Output written to {}", output.display());

    repository
        .cleanup()
        .context("Failed to remove temporary clone")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exclude_dir_defaults_to_node_modules() {
        let cli = Cli::try_parse_from(["git2txt", "owner/repo"]).unwrap();
        assert_eq!(cli.exclude_dir, vec!["node_modules"]);
    }

    #[test]
    fn test_exclude_dir_replaces_default() {
        let cli = Cli::try_parse_from(["git2txt", "owner/repo", "--exclude-dir", "target,dist"])
            .unwrap();
        assert_eq!(cli.exclude_dir, vec!["target", "dist"]);

        let cli = Cli::try_parse_from([
            "git2txt",
            "owner/repo",
            "--exclude-dir",
            "target",
            "--exclude-dir",
            "node_modules",
        ])
        .unwrap();
        assert_eq!(cli.exclude_dir, vec!["target", "node_modules"]);
    }

    #[test]
    fn test_source_is_required_and_exclusive() {
        assert!(Cli::try_parse_from(["git2txt"]).is_err());
        assert!(Cli::try_parse_from(["git2txt", "owner/repo", "--local-path", "."]).is_err());
    }
}
