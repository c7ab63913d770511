use crate::error::{Error, Result};
use crate::file::FileCandidate;
use std::fs;
use std::io::ErrorKind;

/// Reads a candidate's full content as UTF-8.
///
/// The file handle is opened and closed within this call, also on failure.
/// Content is returned byte for byte; line endings are not translated.
///
/// # Errors
///
/// - [`Error::InvalidUtf8`] if the bytes are not valid UTF-8
/// - [`Error::Io`] for any other failure to open or read the file
pub(crate) fn read_text(candidate: &FileCandidate) -> Result<String> {
    let path = &candidate.absolute_path;

    fs::read_to_string(path).map_err(|e| {
        if e.kind() == ErrorKind::InvalidData {
            Error::invalid_utf8(path)
        } else {
            Error::io(path, e)
        }
    })
}
