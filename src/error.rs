// Error taxonomy for the telemetry core

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while opening telemetry sources or parsing their contents.
///
/// `NotFound` and `Unreadable` are construction-time failures and are fatal to
/// the monitor that raised them. `IncompleteData` and `MalformedRecord` are
/// per-read failures; callers may retry on their next poll.
#[derive(Error, Debug)]
pub enum MonitorError {
    /// A backing file or command does not exist
    #[error("{} was not found", .0.display())]
    NotFound(PathBuf),

    /// A backing file exists but cannot be opened for reading
    #[error("can't read {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source ran out before every required field was located
    #[error("could not find necessary data: {0}")]
    IncompleteData(String),

    /// A located field failed numeric or format validation
    #[error("invalid format: {0}")]
    MalformedRecord(String),

    /// Underlying read/seek failure
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl MonitorError {
    pub(crate) fn incomplete(msg: impl Into<String>) -> Self {
        Self::IncompleteData(msg.into())
    }

    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedRecord(msg.into())
    }

    /// True for the per-read failures a polling caller can retry.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::IncompleteData(_) | Self::MalformedRecord(_))
    }
}

pub type Result<T> = std::result::Result<T, MonitorError>;
