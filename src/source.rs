//! Acquisition front-ends that produce a repository root.
//!
//! Both front-ends feed the same [`Pipeline`](crate::Pipeline). They only
//! differ in where the root comes from and whether it is cleaned up.

use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;
use tracing::{debug, info};
use url::Url;

const GITHUB_HTTPS_PREFIX: &str = "https://github.com/";
const GITHUB_SSH_PREFIX: &str = "git@github.com:";

/// Where the repository to convert comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositorySource {
    /// An existing checkout on disk
    Local(PathBuf),
    /// A GitHub repository to clone
    Remote(String),
}

impl RepositorySource {
    /// Makes the repository available on disk.
    ///
    /// # Errors
    ///
    /// - Local: [`Error::InvalidRoot`] if the path is not an existing
    ///   directory, [`Error::NotARepository`] if it has no `.git` directory
    /// - Remote: [`Error::InvalidUrl`] or [`Error::Acquisition`]
    pub fn acquire(&self, git: &GitClient) -> Result<AcquiredRepository> {
        match self {
            Self::Local(path) => acquire_local(path),
            Self::Remote(url) => acquire_remote(url, git),
        }
    }
}

/// A repository root ready for conversion.
///
/// For remote sources the root is a temporary clone that is deleted when
/// this value is dropped.
#[derive(Debug)]
pub struct AcquiredRepository {
    root: PathBuf,
    name: String,
    temp: Option<TempDir>,
}

impl AcquiredRepository {
    /// Absolute path of the repository root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Repository name, used for the default output file name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Default output file: `<name>.txt` in the working directory.
    #[must_use]
    pub fn default_output_file(&self) -> PathBuf {
        PathBuf::from(format!("{}.txt", self.name))
    }

    /// Returns true if the root is a temporary clone.
    #[must_use]
    pub const fn is_temporary(&self) -> bool {
        self.temp.is_some()
    }

    /// Removes the temporary clone, if any, reporting failures.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary directory cannot be removed.
    pub fn cleanup(self) -> Result<()> {
        if let Some(temp) = self.temp {
            let path = temp.path().to_path_buf();
            temp.close().map_err(|e| Error::io(&path, e))?;
            debug!("Removed temporary clone {}", path.display());
        }
        Ok(())
    }
}

/// Thin wrapper around the external `git` executable.
#[derive(Debug, Clone)]
pub struct GitClient {
    program: PathBuf,
}

impl Default for GitClient {
    fn default() -> Self {
        Self::new("git")
    }
}

impl GitClient {
    /// Uses `program` as the git executable.
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Runs `git clone --depth 1 <url> <dest>`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Acquisition`] if git cannot be started or exits
    /// with a failure status. The message carries git's stderr.
    pub fn shallow_clone(&self, url: &str, dest: &Path) -> Result<()> {
        let output = Command::new(&self.program)
            .args(["clone", "--depth", "1", url])
            .arg(dest)
            .output()
            .map_err(|e| {
                Error::acquisition(url, format!("failed to run '{}': {e}", self.program.display()))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::acquisition(url, stderr.trim().to_string()));
        }

        Ok(())
    }
}

/// Normalizes the accepted GitHub URL forms.
///
/// `https://github.com/...` and `git@github.com:...` pass through, an
/// `owner/repo` shorthand is expanded to an HTTPS URL. Trailing slashes
/// are removed.
///
/// # Errors
///
/// Returns [`Error::InvalidUrl`] for anything else.
pub fn normalize_github_url(url: &str) -> Result<String> {
    let trimmed = url.trim_end_matches('/');

    if trimmed.starts_with(GITHUB_SSH_PREFIX) || trimmed.starts_with(GITHUB_HTTPS_PREFIX) {
        return Ok(trimmed.to_string());
    }

    let parts: Vec<&str> = trimmed.split('/').collect();
    if parts.len() == 2 && parts.iter().all(|p| !p.is_empty()) {
        return Ok(format!("{GITHUB_HTTPS_PREFIX}{trimmed}"));
    }

    Err(Error::invalid_url(url))
}

/// Extracts the repository name from a URL or `owner/repo` shorthand.
///
/// The last path segment is used, without a trailing `.git`.
///
/// # Errors
///
/// Returns [`Error::InvalidUrl`] if no name can be found.
pub fn repository_name(url: &str) -> Result<String> {
    let trimmed = url.trim_end_matches('/');

    let last_segment = match Url::parse(trimmed) {
        Ok(parsed) if parsed.has_host() => parsed
            .path_segments()
            .and_then(|mut segments| segments.rfind(|s| !s.is_empty()))
            .map(str::to_string),
        _ => trimmed
            .rsplit(['/', ':'])
            .next()
            .map(str::to_string),
    };

    last_segment
        .map(|name| name.strip_suffix(".git").unwrap_or(&name).to_string())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| Error::invalid_url(url))
}

fn acquire_local(path: &Path) -> Result<AcquiredRepository> {
    let root = fs::canonicalize(path)
        .ok()
        .filter(|resolved| resolved.is_dir())
        .ok_or_else(|| Error::invalid_root(path, "does not exist or is not a directory"))?;

    if !root.join(".git").is_dir() {
        return Err(Error::not_a_repository(path));
    }

    let name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "repository".to_string());

    debug!("Using local repository {}", root.display());

    Ok(AcquiredRepository {
        root,
        name,
        temp: None,
    })
}

fn acquire_remote(url: &str, git: &GitClient) -> Result<AcquiredRepository> {
    let normalized = normalize_github_url(url)?;
    let name = repository_name(url)?;

    let temp = tempfile::Builder::new()
        .prefix(&format!("git2txt_{name}_"))
        .tempdir()
        .map_err(|e| {
            Error::acquisition(&normalized, format!("cannot create temporary directory: {e}"))
        })?;

    info!(
        "Downloading repository from {} to {}",
        normalized,
        temp.path().display()
    );

    git.shallow_clone(&normalized, temp.path())?;

    let is_empty = fs::read_dir(temp.path())
        .map_err(|e| Error::io(temp.path(), e))?
        .next()
        .is_none();
    if is_empty {
        return Err(Error::acquisition(&normalized, "Repository appears to be empty"));
    }

    info!("Repository downloaded successfully.");

    Ok(AcquiredRepository {
        root: temp.path().to_path_buf(),
        name,
        temp: Some(temp),
    })
}
