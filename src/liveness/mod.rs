// Process liveness check over `ps xau`-style listings

mod command;

pub use command::{CommandLister, DEFAULT_LISTING_COMMAND};

use crate::error::{MonitorError, Result};
use std::io::BufRead;

/// 1-based column holding the command in `ps xau` output.
pub const PROCESS_NAME_COLUMN: usize = 11;

/// Produces the current process list as lines of text.
pub trait ProcessLister {
    fn list_processes(&self) -> Result<Box<dyn BufRead>>;
}

impl<L: ProcessLister + ?Sized> ProcessLister for Box<L> {
    fn list_processes(&self) -> Result<Box<dyn BufRead>> {
        (**self).list_processes()
    }
}

/// Answers "is a process with this name running?" from one fresh listing per
/// call. Polling, if wanted, belongs to the caller.
pub struct ProcessLivenessScanner<L> {
    lister: L,
}

impl Default for ProcessLivenessScanner<CommandLister> {
    fn default() -> Self {
        Self::new(CommandLister::default())
    }
}

impl<L: ProcessLister> ProcessLivenessScanner<L> {
    pub fn new(lister: L) -> Self {
        Self { lister }
    }

    /// True when some listing line's command column contains `name`.
    ///
    /// An empty listing is `false`; a line with too few columns (including a
    /// blank one) is `MalformedRecord`, even if a later line would match.
    #[tracing::instrument(skip(self), fields(operation = "is_running"))]
    pub fn is_running(&self, name: &str) -> Result<bool> {
        let listing = self.lister.list_processes()?;
        let running = scan_listing(listing, name)?;
        tracing::debug!(running, "process listing scanned");
        Ok(running)
    }
}

/// Scans `listing` line by line, stopping at the first match.
pub fn scan_listing<R: BufRead>(mut listing: R, name: &str) -> Result<bool> {
    let mut buf = Vec::new();
    let mut line_number = 0usize;
    loop {
        buf.clear();
        if listing.read_until(b'\n', &mut buf)? == 0 {
            return Ok(false);
        }
        line_number += 1;
        let line = String::from_utf8_lossy(&buf);
        let columns: Vec<&str> = line.split_whitespace().collect();
        let Some(command) = columns.get(PROCESS_NAME_COLUMN - 1) else {
            return Err(MonitorError::malformed(format!(
                "process listing line {line_number} has {} columns, expected at least {PROCESS_NAME_COLUMN}",
                columns.len()
            )));
        };
        if command.contains(name) {
            return Ok(true);
        }
    }
}
