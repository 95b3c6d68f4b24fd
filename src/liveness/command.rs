// Process listings from a spawned command

use super::ProcessLister;
use crate::error::{MonitorError, Result};
use std::io::{self, BufRead, BufReader, ErrorKind, Read};
use std::path::PathBuf;
use std::process::{Child, ChildStdout, Command, Stdio};

pub const DEFAULT_LISTING_COMMAND: &str = "ps xau";

/// Spawns a listing command per call and streams its stdout.
#[derive(Debug, Clone)]
pub struct CommandLister {
    program: String,
    args: Vec<String>,
}

impl Default for CommandLister {
    fn default() -> Self {
        Self::new("ps", ["xau"])
    }
}

impl CommandLister {
    pub fn new<I, A>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Splits a command line such as `"ps xau"` on whitespace. No shell
    /// quoting is interpreted. `None` when the line is blank.
    pub fn from_command_line(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let program = words.next()?;
        Some(Self::new(program, words))
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl ProcessLister for CommandLister {
    fn list_processes(&self) -> Result<Box<dyn BufRead>> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => MonitorError::NotFound(PathBuf::from(&self.program)),
                _ => MonitorError::Io(e),
            })?;
        let Some(stdout) = child.stdout.take() else {
            // Unreachable with Stdio::piped, but reap the child either way.
            let _ = child.kill();
            let _ = child.wait();
            return Err(io::Error::other("listing command has no stdout").into());
        };
        Ok(Box::new(ChildListing {
            reader: BufReader::new(stdout),
            child,
        }))
    }
}

/// Stdout of a running listing command. Dropping it reaps the child, killing
/// it first if the scan stopped before the output ended.
struct ChildListing {
    reader: BufReader<ChildStdout>,
    child: Child,
}

impl Read for ChildListing {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}

impl BufRead for ChildListing {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.reader.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.reader.consume(amt)
    }
}

impl Drop for ChildListing {
    fn drop(&mut self) {
        if let Ok(None) = self.child.try_wait() {
            let _ = self.child.kill();
        }
        if let Err(e) = self.child.wait() {
            tracing::debug!(error = %e, "failed to reap listing command");
        }
    }
}
