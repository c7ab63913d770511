//! Output artifact writer.

use crate::error::{Error, Result};
use crate::file::FileCandidate;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

const SEPARATOR_WIDTH: usize = 80;

/// Renders the header block that precedes a file's content.
///
/// ```text
/// ================================================================================
/// File: src/main.rs
/// Size: 0.05 KB
/// ================================================================================
///
/// ```
#[must_use]
pub fn record_header(candidate: &FileCandidate) -> String {
    let separator = "=".repeat(SEPARATOR_WIDTH);
    format!(
        "{separator}\nFile: {}\nSize: {:.2} KB\n{separator}\n\n",
        candidate.relative_path.display(),
        candidate.size_kb()
    )
}

/// Appends one record per included file to the output artifact.
///
/// The file is truncated on creation and written sequentially through a
/// buffer. Dropping the concatenator without calling [`finish`] still
/// releases the handle, leaving a partial artifact.
///
/// [`finish`]: Concatenator::finish
#[derive(Debug)]
pub(crate) struct Concatenator<W: Write = BufWriter<File>> {
    path: PathBuf,
    out: W,
    bytes_written: u64,
}

impl Concatenator {
    /// Creates (or truncates) the output file.
    pub(crate) fn create(path: &Path) -> Result<Self> {
        let file = File::create(path).map_err(|e| Error::output(path, e))?;
        Ok(Self::from_writer(path, BufWriter::new(file)))
    }
}

impl<W: Write> Concatenator<W> {
    pub(crate) fn from_writer(path: impl Into<PathBuf>, out: W) -> Self {
        Self {
            path: path.into(),
            out,
            bytes_written: 0,
        }
    }

    /// Appends a record for `candidate` with the given content.
    pub(crate) fn append(&mut self, candidate: &FileCandidate, content: &str) -> Result<()> {
        let header = record_header(candidate);

        self.write(header.as_bytes())?;
        self.write(content.as_bytes())?;
        self.write(b"\n")?;

        Ok(())
    }

    /// Number of bytes appended so far.
    pub(crate) const fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Flushes buffered output and returns the underlying writer.
    pub(crate) fn finish(mut self) -> Result<W> {
        self.out.flush().map_err(|e| Error::output(&self.path, e))?;
        Ok(self.out)
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.out
            .write_all(bytes)
            .map_err(|e| Error::output(&self.path, e))?;
        self.bytes_written += bytes.len() as u64;
        Ok(())
    }
}
