//! Directory traversal with directory exclusion.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::file::DiscoveredFile;
use std::cmp::Ordering;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, trace};
use walkdir::{DirEntry, WalkDir};

/// How excluded directory markers are matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExclusionMode {
    /// A path component must equal the marker
    #[default]
    Segment,
    /// The directory path must contain the marker anywhere
    Substring,
}

impl fmt::Display for ExclusionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Segment => f.write_str("segment"),
            Self::Substring => f.write_str("substring"),
        }
    }
}

impl ExclusionMode {
    /// Returns true if `relative_dir` matches one of `markers`.
    #[must_use]
    pub fn matches(self, relative_dir: &Path, markers: &[String]) -> bool {
        match self {
            Self::Segment => relative_dir.components().any(|component| match component {
                Component::Normal(name) => markers.iter().any(|m| name == m.as_str()),
                _ => false,
            }),
            Self::Substring => {
                let path = relative_dir.to_string_lossy();
                markers.iter().any(|m| path.contains(m.as_str()))
            }
        }
    }
}

/// Enumerates regular files under a repository root.
///
/// Within a directory, files come before subdirectories and each group is
/// sorted by name, so the order is stable for an unchanged tree.
#[derive(Debug, Clone)]
pub(crate) struct Walker {
    root: PathBuf,
    markers: Vec<String>,
    mode: ExclusionMode,
    ignored_file: Option<PathBuf>,
}

impl Walker {
    /// Creates a walker rooted at `root`, which should be absolute.
    pub(crate) fn new(root: impl Into<PathBuf>, config: &Config) -> Self {
        Self {
            root: root.into(),
            markers: config.excluded_dir_markers.clone(),
            mode: config.exclusion_mode,
            ignored_file: None,
        }
    }

    /// Never yields `path`. Used to keep the output file out of its own run.
    pub(crate) fn ignore_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.ignored_file = Some(path.into());
        self
    }

    /// Returns a lazy iterator over the files under the root.
    ///
    /// An `Err` item means the walk primitive could not list a directory.
    /// The caller should treat it as fatal.
    pub(crate) fn files(&self) -> impl Iterator<Item = Result<DiscoveredFile>> + '_ {
        WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by(files_first)
            .into_iter()
            .filter_entry(move |entry| !self.is_excluded_dir(entry))
            .filter_map(move |result| match result {
                Ok(entry) => self.to_file(&entry).map(Ok),
                Err(err) => Some(Err(walk_error(&self.root, &err))),
            })
    }

    fn is_excluded_dir(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return false;
        }

        let relative = entry.path().strip_prefix(&self.root).unwrap_or(entry.path());
        let excluded = self.mode.matches(relative, &self.markers);
        if excluded {
            debug!("Skipping excluded directory: {}", relative.display());
        }
        excluded
    }

    fn to_file(&self, entry: &DirEntry) -> Option<DiscoveredFile> {
        let file_type = entry.file_type();
        if file_type.is_dir() {
            return None;
        }

        // Symlinks are not followed, but one pointing at a directory is still
        // not a file.
        if file_type.is_symlink() && entry.path().is_dir() {
            trace!("Not descending into symlinked directory: {}", entry.path().display());
            return None;
        }

        if self.ignored_file.as_deref() == Some(entry.path()) {
            trace!("Not including output file: {}", entry.path().display());
            return None;
        }

        Some(DiscoveredFile::new(entry.path().to_path_buf(), &self.root))
    }
}

fn files_first(a: &DirEntry, b: &DirEntry) -> Ordering {
    a.file_type()
        .is_dir()
        .cmp(&b.file_type().is_dir())
        .then_with(|| a.file_name().cmp(b.file_name()))
}

fn walk_error(root: &Path, err: &walkdir::Error) -> Error {
    let path = err.path().unwrap_or(root);
    Error::walk(path, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    fn config(root: &Path, mode: ExclusionMode) -> Config {
        Config::builder()
            .root_dir(root)
            .exclusion_mode(mode)
            .build()
            .unwrap()
    }

    fn relative_paths(walker: &Walker) -> Vec<String> {
        walker
            .files()
            .map(|f| f.unwrap().relative_path.to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn test_walker_finds_nested_files() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("src/main.rs").write_str("fn main() {}").unwrap();
        temp.child("src/lib.rs").write_str("pub fn test() {}").unwrap();
        temp.child("README.md").write_str("# hi").unwrap();

        let walker = Walker::new(temp.path(), &config(temp.path(), ExclusionMode::Segment));
        let files = relative_paths(&walker);

        assert_eq!(files, vec!["README.md", "src/lib.rs", "src/main.rs"]);
    }

    #[test]
    fn test_files_before_subdirectories() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("a/inner.txt").write_str("x").unwrap();
        temp.child("z.txt").write_str("x").unwrap();

        let walker = Walker::new(temp.path(), &config(temp.path(), ExclusionMode::Segment));

        assert_eq!(relative_paths(&walker), vec!["z.txt", "a/inner.txt"]);
    }

    #[test]
    fn test_walker_order_is_stable() {
        let temp = assert_fs::TempDir::new().unwrap();
        for name in ["c.txt", "a.txt", "b/x.txt", "b/a.txt", "d/e/f.txt"] {
            temp.child(name).write_str("x").unwrap();
        }

        let walker = Walker::new(temp.path(), &config(temp.path(), ExclusionMode::Segment));
        assert_eq!(relative_paths(&walker), relative_paths(&walker));
    }

    #[test]
    fn test_node_modules_excluded() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("index.js").write_str("x").unwrap();
        temp.child("node_modules/pkg/index.js").write_str("x").unwrap();
        temp.child("web/node_modules/deep.js").write_str("x").unwrap();

        for mode in [ExclusionMode::Segment, ExclusionMode::Substring] {
            let walker = Walker::new(temp.path(), &config(temp.path(), mode));
            assert_eq!(relative_paths(&walker), vec!["index.js"]);
        }
    }

    #[test]
    fn test_segment_mode_keeps_lookalike_directories() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("my-node_modules-notes/readme.txt").write_str("x").unwrap();

        let segment = Walker::new(temp.path(), &config(temp.path(), ExclusionMode::Segment));
        assert_eq!(relative_paths(&segment), vec!["my-node_modules-notes/readme.txt"]);

        let substring = Walker::new(temp.path(), &config(temp.path(), ExclusionMode::Substring));
        assert!(relative_paths(&substring).is_empty());
    }

    #[test]
    fn test_files_never_excluded_by_name() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("node_modules.txt").write_str("x").unwrap();

        let walker = Walker::new(temp.path(), &config(temp.path(), ExclusionMode::Substring));
        assert_eq!(relative_paths(&walker), vec!["node_modules.txt"]);
    }

    #[test]
    fn test_root_is_never_excluded() {
        let temp = assert_fs::TempDir::new().unwrap();
        let root = temp.child("node_modules");
        root.child("a.txt").write_str("x").unwrap();

        let walker = Walker::new(root.path(), &config(root.path(), ExclusionMode::Segment));
        assert_eq!(relative_paths(&walker), vec!["a.txt"]);
    }

    #[test]
    fn test_ignored_file_not_yielded() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("a.txt").write_str("x").unwrap();
        temp.child("out.txt").write_str("x").unwrap();

        let walker = Walker::new(temp.path(), &config(temp.path(), ExclusionMode::Segment))
            .ignore_file(temp.path().join("out.txt"));
        assert_eq!(relative_paths(&walker), vec!["a.txt"]);
    }

    #[test]
    fn test_empty_directory() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("empty").create_dir_all().unwrap();

        let walker = Walker::new(temp.path(), &config(temp.path(), ExclusionMode::Segment));
        assert!(relative_paths(&walker).is_empty());
    }

    #[test]
    fn test_missing_root_yields_walk_error() {
        let temp = assert_fs::TempDir::new().unwrap();
        let root = temp.path().join("repo");
        std::fs::create_dir(&root).unwrap();
        let walker = Walker::new(&root, &config(&root, ExclusionMode::Segment));
        std::fs::remove_dir(&root).unwrap();

        let mut files = walker.files();
        let err = files.next().unwrap().unwrap_err();

        assert!(matches!(err, Error::Walk { .. }));
        assert!(err.to_string().contains("repo"));
    }

    #[test]
    fn test_exclusion_mode_matching() {
        let markers = vec!["node_modules".to_string()];
        assert!(ExclusionMode::Segment.matches(Path::new("a/node_modules"), &markers));
        assert!(!ExclusionMode::Segment.matches(Path::new("a/node_modules_old"), &markers));
        assert!(ExclusionMode::Substring.matches(Path::new("a/node_modules_old"), &markers));
        assert!(!ExclusionMode::Substring.matches(Path::new("src"), &markers));
        assert!(!ExclusionMode::Segment.matches(Path::new("src"), &[]));
    }
}
