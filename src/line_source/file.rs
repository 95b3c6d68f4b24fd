// File-backed line sources with construction-time checks.

use crate::error::{MonitorError, Result};
use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::Path;

/// A buffered handle on a telemetry file. Seeking discards the buffer, so a
/// rewind to 0 on a `/proc` file sees freshly generated content.
pub type FileLineSource = BufReader<File>;

/// Opens `path` for line reading, failing fast with `NotFound` or
/// `Unreadable` before any read is attempted.
pub fn open_checked(path: &Path) -> Result<FileLineSource> {
    if !path.exists() {
        return Err(MonitorError::NotFound(path.to_path_buf()));
    }
    let unreadable = |source: std::io::Error| MonitorError::Unreadable {
        path: path.to_path_buf(),
        source,
    };
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(MonitorError::NotFound(path.to_path_buf()));
        }
        Err(e) => return Err(unreadable(e)),
    };
    // Directories open fine on Linux but fail on the first read.
    if file.metadata().map_err(unreadable)?.is_dir() {
        return Err(unreadable(std::io::Error::from(ErrorKind::IsADirectory)));
    }
    Ok(BufReader::new(file))
}
